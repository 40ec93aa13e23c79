//! Integration tests for match progression: winner advancement, idempotency, terminal states.

use racket_fixtures_web::{
    Caller, Category, CompletionOutcome, FixtureError, FixtureRequest, FixtureService, Format,
    GameMatch, InMemoryStore, MatchStatus, Participant, SeedingMethod, SkillLevel, Slot, Team,
    Tournament, TournamentId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use uuid::Uuid;

type Service = FixtureService<Arc<InMemoryStore>, Arc<InMemoryStore>, Arc<InMemoryStore>>;

fn admin() -> Caller {
    Caller::admin(Uuid::new_v4())
}

/// Knockout with `n` singles seeded strictly by skill, so seed order is known.
fn knockout(n: usize) -> (Service, TournamentId) {
    let levels = [
        SkillLevel::Elite,
        SkillLevel::Expert,
        SkillLevel::Advanced,
        SkillLevel::Intermediate,
        SkillLevel::Beginner,
    ];
    let store = Arc::new(InMemoryStore::new());
    let tournament = Tournament::new("Cup", Format::Knockout);
    let id = tournament.id;
    store.insert_tournament(tournament).unwrap();
    for i in 0..n {
        let p = Participant::new(format!("S{}", i + 1), Category::Singles)
            .with_skill(levels[i])
            .approve();
        store.add_participant(id, p).unwrap();
    }
    let service = FixtureService::new(store.clone(), store.clone(), store);
    let request = FixtureRequest {
        seeding_method: SeedingMethod::SkillBased,
        ..FixtureRequest::default()
    };
    service
        .generate_fixtures(&admin(), id, &request, &mut StdRng::seed_from_u64(1))
        .unwrap();
    (service, id)
}

fn find(service: &Service, id: TournamentId, round: u32, number: u32) -> GameMatch {
    service
        .list_matches(id)
        .unwrap()
        .into_iter()
        .find(|m| m.round == round && m.match_number == number)
        .unwrap()
}

fn name(slot: &Slot) -> Option<&str> {
    slot.entrant().map(|e| e.name.as_str())
}

#[test]
fn winner_moves_into_the_downstream_slot() {
    let (service, id) = knockout(4);
    let semi_1 = find(&service, id, 1, 1);
    assert_eq!(semi_1.round_name, "Semi Final");

    let completion = service.complete_match(&admin(), semi_1.id, Team::Two).unwrap();
    assert_eq!(completion.outcome, CompletionOutcome::Applied);
    assert_eq!(completion.updated.len(), 2);

    let done = find(&service, id, 1, 1);
    assert_eq!(done.status, MatchStatus::Completed);
    assert_eq!(done.winner, Some(Team::Two));

    let final_match = find(&service, id, 2, 1);
    assert_eq!(name(&final_match.team_1), Some("S4"));
    assert_eq!(final_match.team_2, Slot::Pending);
    assert!(!final_match.is_ready());

    let semi_2 = find(&service, id, 1, 2);
    service.complete_match(&admin(), semi_2.id, Team::One).unwrap();
    let final_match = find(&service, id, 2, 1);
    assert_eq!(name(&final_match.team_2), Some("S2"));
    assert!(final_match.is_ready());
}

#[test]
fn redelivered_completion_is_a_no_op() {
    let (service, id) = knockout(4);
    let semi = find(&service, id, 1, 1);
    service.complete_match(&admin(), semi.id, Team::One).unwrap();
    let once = service.list_matches(id).unwrap();

    let again = service.complete_match(&admin(), semi.id, Team::One).unwrap();
    assert_eq!(again.outcome, CompletionOutcome::AlreadyApplied);
    assert!(again.updated.is_empty());
    assert_eq!(service.list_matches(id).unwrap(), once);
}

#[test]
fn completed_match_cannot_change_winner() {
    let (service, id) = knockout(4);
    let semi = find(&service, id, 1, 1);
    service.complete_match(&admin(), semi.id, Team::One).unwrap();
    let result = service.complete_match(&admin(), semi.id, Team::Two);
    assert!(matches!(result, Err(FixtureError::Conflict(_))));
    assert_eq!(result.unwrap_err().status_code(), 409);
}

#[test]
fn match_with_unknown_side_cannot_be_completed_or_started() {
    let (service, id) = knockout(4);
    let final_match = find(&service, id, 2, 1);
    assert!(matches!(
        service.complete_match(&admin(), final_match.id, Team::One),
        Err(FixtureError::Validation(_))
    ));
    assert!(matches!(
        service.start_match(&admin(), final_match.id),
        Err(FixtureError::Validation(_))
    ));
}

#[test]
fn bye_fed_semi_final_is_playable_immediately() {
    // 5 entrants: seeds 2 and 3 both have byes and meet in the second semi final.
    let (service, id) = knockout(5);
    let semi = find(&service, id, 2, 2);
    assert_eq!(name(&semi.team_1), Some("S2"));
    assert_eq!(name(&semi.team_2), Some("S3"));

    let started = service.start_match(&admin(), semi.id).unwrap();
    assert_eq!(started.status, MatchStatus::InProgress);
    service.complete_match(&admin(), semi.id, Team::One).unwrap();

    let final_match = find(&service, id, 3, 1);
    assert_eq!(final_match.team_1, Slot::Pending);
    assert_eq!(name(&final_match.team_2), Some("S2"));
}

#[test]
fn bye_records_are_terminal() {
    let (service, id) = knockout(5);
    let bye = service
        .list_matches(id)
        .unwrap()
        .into_iter()
        .find(|m| m.is_bye)
        .unwrap();
    assert!(matches!(
        service.start_match(&admin(), bye.id),
        Err(FixtureError::Conflict(_))
    ));
    let redelivered = service.complete_match(&admin(), bye.id, Team::One).unwrap();
    assert_eq!(redelivered.outcome, CompletionOutcome::AlreadyApplied);
}

#[test]
fn full_bracket_plays_through_to_a_champion() {
    let (service, id) = knockout(5);
    for round in 1..=3 {
        let playable: Vec<GameMatch> = service
            .list_matches(id)
            .unwrap()
            .into_iter()
            .filter(|m| m.round == round && m.status == MatchStatus::Scheduled)
            .collect();
        for m in playable {
            service.complete_match(&admin(), m.id, Team::One).unwrap();
        }
    }
    let final_match = find(&service, id, 3, 1);
    assert_eq!(final_match.status, MatchStatus::Completed);
    assert_eq!(
        final_match.winning_entrant().map(|e| e.name.as_str()),
        Some("S1")
    );
}

#[test]
fn cancelled_match_cannot_be_completed() {
    let (service, id) = knockout(4);
    let semi = find(&service, id, 1, 1);
    let cancelled = service.cancel_match(&admin(), semi.id).unwrap();
    assert_eq!(cancelled.status, MatchStatus::Cancelled);
    // Cancelling twice is harmless.
    service.cancel_match(&admin(), semi.id).unwrap();

    assert!(matches!(
        service.complete_match(&admin(), semi.id, Team::One),
        Err(FixtureError::Conflict(_))
    ));
}

#[test]
fn completed_match_cannot_be_cancelled() {
    let (service, id) = knockout(2);
    let final_match = find(&service, id, 1, 1);
    let completion = service.complete_match(&admin(), final_match.id, Team::Two).unwrap();
    // The final has no downstream match.
    assert_eq!(completion.updated.len(), 1);
    assert!(matches!(
        service.cancel_match(&admin(), final_match.id),
        Err(FixtureError::Conflict(_))
    ));
}

#[test]
fn unknown_match_and_non_admin_are_rejected() {
    let (service, id) = knockout(4);
    let missing = Uuid::new_v4();
    assert_eq!(
        service.complete_match(&admin(), missing, Team::One).unwrap_err(),
        FixtureError::MatchNotFound(missing)
    );
    let semi = find(&service, id, 1, 1);
    assert_eq!(
        service
            .complete_match(&Caller::player(Uuid::new_v4()), semi.id, Team::One)
            .unwrap_err(),
        FixtureError::Forbidden
    );
}
