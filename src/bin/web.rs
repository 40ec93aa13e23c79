//! Single binary web server: REST API over the fixture engine with in-memory storage.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT. Log level via RUST_LOG.
//!
//! Authentication happens upstream; the proxy forwards the verified identity as
//! `X-User-Id` (uuid) and `X-User-Roles` (comma-separated, e.g. "admin,player").

use actix_web::{
    get, post,
    http::StatusCode,
    web::{Bytes, Data, Json, Path, Query},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use racket_fixtures_web::{
    fixtures_csv, Caller, Category, FixtureError, FixtureRequest, FixtureService, Format,
    InMemoryStore, MatchId, Participant, ParticipantId, PartitionSummary, Partner, Role, SkillLevel,
    SkippedPartition, Team, Tournament, TournamentId, TournamentStore,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

type Store = Arc<InMemoryStore>;

struct AppData {
    store: Store,
    fixtures: FixtureService<Store, Store, Store>,
}

type AppState = Data<AppData>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    format: Format,
    #[serde(default = "default_categories")]
    categories: Vec<Category>,
    #[serde(default)]
    age_groups: Vec<String>,
    #[serde(default)]
    allow_multiple_age_groups: bool,
}

fn default_categories() -> Vec<Category> {
    vec![Category::Singles, Category::Doubles, Category::Mixed]
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    category: Category,
    #[serde(default)]
    age_groups: Vec<String>,
    #[serde(default)]
    skill_level: Option<SkillLevel>,
    #[serde(default)]
    partner: Option<Partner>,
}

#[derive(Deserialize)]
struct CompleteMatchBody {
    winner: Team,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    success: bool,
    matches_created: usize,
    partitions: Vec<PartitionSummary>,
    skipped: Vec<SkippedPartition>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: Uuid,
}

/// Optional filter: only matches involving this registration.
#[derive(Deserialize)]
struct MatchFilter {
    participant_id: Option<ParticipantId>,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

fn error_response(e: &FixtureError) -> HttpResponse {
    let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        log::error!("{}", e);
    }
    HttpResponse::build(status).json(serde_json::json!({ "success": false, "error": e.to_string() }))
}

fn unauthenticated() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({ "success": false, "error": "Not signed in" }))
}

/// Identity forwarded by the authentication layer; None when absent or malformed.
fn caller_from(req: &HttpRequest) -> Option<Caller> {
    let user_id = req
        .headers()
        .get("X-User-Id")?
        .to_str()
        .ok()?
        .parse::<Uuid>()
        .ok()?;
    let roles = req
        .headers()
        .get("X-User-Roles")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .split(',')
        .filter_map(|r| match r.trim() {
            "admin" => Some(Role::Admin),
            "player" => Some(Role::Player),
            _ => None,
        })
        .collect();
    Some(Caller { user_id, roles })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "racket-fixtures-web",
    })
}

/// Create a tournament (admin).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, req: HttpRequest, body: Json<CreateTournamentBody>) -> HttpResponse {
    let Some(caller) = caller_from(&req) else {
        return unauthenticated();
    };
    if let Err(e) = caller.require_admin() {
        return error_response(&e);
    }
    let body = body.into_inner();
    let name = body.name.trim();
    if name.is_empty() {
        return error_response(&FixtureError::validation("Tournament name is required"));
    }
    let tournament = Tournament::new(name, body.format)
        .with_categories(body.categories)
        .with_age_groups(body.age_groups, body.allow_multiple_age_groups);
    match state.store.insert_tournament(tournament.clone()) {
        Ok(()) => HttpResponse::Ok().json(&tournament),
        Err(e) => error_response(&e.into()),
    }
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.get_tournament(path.id) {
        Ok(Some(t)) => HttpResponse::Ok().json(&t),
        Ok(None) => error_response(&FixtureError::TournamentNotFound(path.id)),
        Err(e) => error_response(&e.into()),
    }
}

/// Register the caller for a category. Registrations start unapproved.
#[post("/api/tournaments/{id}/participants")]
async fn api_register(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
    body: Json<RegisterBody>,
) -> HttpResponse {
    let Some(caller) = caller_from(&req) else {
        return unauthenticated();
    };
    let body = body.into_inner();
    let mut participant = Participant::new(body.name.trim(), body.category);
    participant.user_id = caller.user_id;
    participant.age_groups = body.age_groups;
    participant.skill_level = body.skill_level;
    participant.partner = body.partner;
    match state.store.add_participant(path.id, participant) {
        Ok(p) => HttpResponse::Ok().json(&p),
        Err(e) => error_response(&e),
    }
}

/// Approve a registration (admin).
#[post("/api/tournaments/{id}/participants/{participant_id}/approve")]
async fn api_approve(state: AppState, req: HttpRequest, path: Path<TournamentParticipantPath>) -> HttpResponse {
    let Some(caller) = caller_from(&req) else {
        return unauthenticated();
    };
    if let Err(e) = caller.require_admin() {
        return error_response(&e);
    }
    match state.store.approve_participant(path.id, path.participant_id) {
        Ok(p) => HttpResponse::Ok().json(&p),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/participants")]
async fn api_list_participants(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.list_participants(path.id) {
        Ok(list) => HttpResponse::Ok().json(&list),
        Err(e) => error_response(&e.into()),
    }
}

/// Show what generation would build (bracket sizes, byes, skipped groups) without saving.
#[post("/api/tournaments/{id}/fixtures/preview")]
async fn api_preview_fixtures(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
    body: Bytes,
) -> HttpResponse {
    let Some(caller) = caller_from(&req) else {
        return unauthenticated();
    };
    let request = match FixtureRequest::from_body(&body) {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };
    let mut rng = StdRng::from_entropy();
    match state.fixtures.preview_fixtures(&caller, path.id, &request, &mut rng) {
        Ok(report) => HttpResponse::Ok().json(&report),
        Err(e) => error_response(&e),
    }
}

/// Generate fixtures for all partitions (admin, once per tournament).
#[post("/api/tournaments/{id}/fixtures/generate")]
async fn api_generate_fixtures(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
    body: Bytes,
) -> HttpResponse {
    let Some(caller) = caller_from(&req) else {
        return unauthenticated();
    };
    let request = match FixtureRequest::from_body(&body) {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };
    let mut rng = StdRng::from_entropy();
    match state.fixtures.generate_fixtures(&caller, path.id, &request, &mut rng) {
        Ok(report) => HttpResponse::Ok().json(GenerateResponse {
            success: true,
            matches_created: report.matches_created,
            partitions: report.partitions,
            skipped: report.skipped,
        }),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>, filter: Query<MatchFilter>) -> HttpResponse {
    match state.fixtures.list_matches(path.id) {
        Ok(mut matches) => {
            if let Some(pid) = filter.participant_id {
                matches.retain(|m| m.involves(pid));
            }
            HttpResponse::Ok().json(&matches)
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/fixtures/export.csv")]
async fn api_export_fixtures(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let matches = match state.fixtures.list_matches(path.id) {
        Ok(m) => m,
        Err(e) => return error_response(&e),
    };
    match fixtures_csv(&matches) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"fixtures-{}.csv\"", path.id),
            ))
            .body(csv),
        Err(e) => {
            log::error!("CSV export failed for {}: {}", path.id, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": "Export failed" }))
        }
    }
}

#[post("/api/matches/{match_id}/start")]
async fn api_start_match(state: AppState, req: HttpRequest, path: Path<MatchPath>) -> HttpResponse {
    let Some(caller) = caller_from(&req) else {
        return unauthenticated();
    };
    match state.fixtures.start_match(&caller, path.match_id) {
        Ok(m) => HttpResponse::Ok().json(&m),
        Err(e) => error_response(&e),
    }
}

#[post("/api/matches/{match_id}/cancel")]
async fn api_cancel_match(state: AppState, req: HttpRequest, path: Path<MatchPath>) -> HttpResponse {
    let Some(caller) = caller_from(&req) else {
        return unauthenticated();
    };
    match state.fixtures.cancel_match(&caller, path.match_id) {
        Ok(m) => HttpResponse::Ok().json(&m),
        Err(e) => error_response(&e),
    }
}

/// Record the winner and advance them in the bracket. Re-sending the same result is harmless.
#[post("/api/matches/{match_id}/complete")]
async fn api_complete_match(
    state: AppState,
    req: HttpRequest,
    path: Path<MatchPath>,
    body: Json<CompleteMatchBody>,
) -> HttpResponse {
    let Some(caller) = caller_from(&req) else {
        return unauthenticated();
    };
    match state.fixtures.complete_match(&caller, path.match_id, body.winner) {
        Ok(completion) => HttpResponse::Ok().json(&completion),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let store = Arc::new(InMemoryStore::new());
    let state = Data::new(AppData {
        fixtures: FixtureService::new(store.clone(), store.clone(), store.clone()),
        store,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_register)
            .service(api_approve)
            .service(api_list_participants)
            .service(api_preview_fixtures)
            .service(api_generate_fixtures)
            .service(api_list_matches)
            .service(api_export_fixtures)
            .service(api_start_match)
            .service(api_cancel_match)
            .service(api_complete_match)
    })
    .bind(bind)?
    .run()
    .await
}
