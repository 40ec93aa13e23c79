//! Fixture generation: plan every partition, then persist the whole set at once.

use crate::logic::bracket::{build_knockout, BracketShape};
use crate::logic::partition::{
    partition_participants, split_eligible, validate_participants, PartitionKey, SkippedPartition,
};
use crate::logic::progression::{self, Completion};
use crate::logic::round_robin::{build_round_robin, round_robin_match_count};
use crate::logic::schedule::{assign_schedule, ScheduleOptions};
use crate::logic::seeding::{seed_entries, SeedingMethod};
use crate::models::{
    Caller, FixtureError, Format, GameMatch, MatchId, Participant, StoreError, Team, Tournament,
    TournamentId,
};
use crate::store::{MatchStore, ParticipantStore, TournamentStore};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn default_true() -> bool {
    true
}

/// Admin options for one generation run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureRequest {
    #[serde(default)]
    pub seeding_method: SeedingMethod,
    /// Always treated as true.
    #[serde(default = "default_true")]
    pub group_by_category: bool,
    #[serde(default)]
    pub group_by_age_group: bool,
    #[serde(default)]
    pub schedule: Option<ScheduleOptions>,
}

impl Default for FixtureRequest {
    fn default() -> Self {
        Self {
            seeding_method: SeedingMethod::Random,
            group_by_category: true,
            group_by_age_group: false,
            schedule: None,
        }
    }
}

impl FixtureRequest {
    /// Parse a JSON request body. An empty body means the defaults; anything else must parse.
    pub fn from_body(body: &[u8]) -> Result<Self, FixtureError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| FixtureError::validation(format!("invalid fixture request: {}", e)))
    }
}

/// What was (or would be) built for one partition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub key: PartitionKey,
    pub format: Format,
    pub entrants: usize,
    /// Knockout only.
    pub bracket_size: Option<usize>,
    pub byes: usize,
    pub rounds: u32,
    pub matches: usize,
}

impl PartitionSummary {
    fn new(key: PartitionKey, format: Format, entrants: usize, matches: usize) -> Self {
        match (format, BracketShape::for_entrants(entrants)) {
            (Format::Knockout, Some(shape)) => Self {
                key,
                format,
                entrants,
                bracket_size: Some(shape.bracket_size),
                byes: shape.byes,
                rounds: shape.rounds,
                matches,
            },
            _ => Self {
                key,
                format,
                entrants,
                bracket_size: None,
                byes: 0,
                rounds: 1,
                matches,
            },
        }
    }
}

/// Result of a generation (or preview) shown to the admin.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FixtureReport {
    pub matches_created: usize,
    pub partitions: Vec<PartitionSummary>,
    pub skipped: Vec<SkippedPartition>,
}

/// Matches ready to persist, in partition order.
#[derive(Clone, Debug)]
pub struct FixturePlan {
    pub matches: Vec<GameMatch>,
    pub partitions: Vec<PartitionSummary>,
    pub skipped: Vec<SkippedPartition>,
}

impl FixturePlan {
    pub fn report(&self) -> FixtureReport {
        FixtureReport {
            matches_created: self.matches.len(),
            partitions: self.partitions.clone(),
            skipped: self.skipped.clone(),
        }
    }
}

/// Matches a partition of `entrants` produces: B - 1 for knockout, n(n-1)/2 for round robin.
pub fn expected_match_count(format: Format, entrants: usize) -> usize {
    match format {
        Format::Knockout => BracketShape::for_entrants(entrants).map_or(0, |s| s.matches),
        Format::RoundRobin => round_robin_match_count(entrants),
    }
}

/// Build the full fixture set for a tournament without touching storage.
///
/// 1. Validate registrations against the tournament configuration.
/// 2. Partition approved participants by category (and age group if requested).
/// 3. Skip partitions with fewer than two entrants; fail if none are left.
/// 4. Seed each partition and build its bracket or round robin.
/// 5. Assign courts and times when schedule options are given.
pub fn plan_fixtures<R: Rng + ?Sized>(
    tournament: &Tournament,
    participants: &[Participant],
    request: &FixtureRequest,
    rng: &mut R,
) -> Result<FixturePlan, FixtureError> {
    if !request.group_by_category {
        log::warn!(
            "Tournament {}: fixtures are always grouped by category; ignoring group_by_category=false",
            tournament.id
        );
    }
    if let Some(schedule) = &request.schedule {
        schedule.validate()?;
    }

    let approved: Vec<Participant> = participants.iter().filter(|p| p.approved).cloned().collect();
    validate_participants(tournament, &approved, request.group_by_age_group)?;

    let (eligible, skipped) =
        split_eligible(partition_participants(&approved, request.group_by_age_group));
    for s in &skipped {
        log::warn!(
            "Tournament {}: skipping {} ({} participant(s)): {}",
            tournament.id,
            s.key,
            s.participants,
            s.reason
        );
    }
    if eligible.is_empty() {
        return Err(FixtureError::validation(
            "need at least 2 eligible participants in a category/age group to generate fixtures",
        ));
    }

    let mut matches = Vec::new();
    let mut partitions = Vec::with_capacity(eligible.len());
    for (key, members) in eligible {
        let entrants = members.len();
        let seeded = seed_entries(members, request.seeding_method, &mut *rng);
        let built = match tournament.format {
            Format::Knockout => build_knockout(tournament.id, &key, &seeded),
            Format::RoundRobin => build_round_robin(tournament.id, &key, &seeded),
        };
        partitions.push(PartitionSummary::new(key, tournament.format, entrants, built.len()));
        matches.extend(built);
    }

    if let Some(schedule) = &request.schedule {
        assign_schedule(&mut matches, schedule)?;
    }

    Ok(FixturePlan {
        matches,
        partitions,
        skipped,
    })
}

/// Entry point for the admin UI: generation and match progression over injected stores.
///
/// Operations on the same tournament are serialized by a per-tournament lock.
pub struct FixtureService<T, P, M> {
    tournaments: T,
    participants: P,
    matches: M,
    /// One entry per existing tournament: ids are checked against the store before a
    /// lock is created, and tournaments are never deleted.
    locks: Mutex<HashMap<TournamentId, Arc<Mutex<()>>>>,
}

impl<T, P, M> FixtureService<T, P, M>
where
    T: TournamentStore,
    P: ParticipantStore,
    M: MatchStore,
{
    pub fn new(tournaments: T, participants: P, matches: M) -> Self {
        Self {
            tournaments,
            participants,
            matches,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn tournament_lock(&self, id: TournamentId) -> Result<Arc<Mutex<()>>, FixtureError> {
        let mut g = self.locks.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(g.entry(id).or_default().clone())
    }

    fn load_tournament(&self, id: TournamentId) -> Result<Tournament, FixtureError> {
        self.tournaments
            .get_tournament(id)?
            .ok_or(FixtureError::TournamentNotFound(id))
    }

    fn load_match(&self, id: MatchId) -> Result<GameMatch, FixtureError> {
        self.matches.get_match(id)?.ok_or(FixtureError::MatchNotFound(id))
    }

    /// Generate and persist fixtures for every eligible partition.
    ///
    /// Refused with a conflict once a tournament has fixtures. Either all matches are
    /// stored and the tournament is marked, or nothing is.
    pub fn generate_fixtures<R: Rng + ?Sized>(
        &self,
        caller: &Caller,
        tournament_id: TournamentId,
        request: &FixtureRequest,
        rng: &mut R,
    ) -> Result<FixtureReport, FixtureError> {
        caller.require_admin()?;
        self.load_tournament(tournament_id)?;
        let lock = self.tournament_lock(tournament_id)?;
        let _guard = lock.lock().map_err(|_| StoreError::Poisoned)?;

        // Re-read under the lock.
        let tournament = self.load_tournament(tournament_id)?;
        if tournament.has_fixtures {
            return Err(FixtureError::conflict(format!(
                "fixtures already generated for tournament {}",
                tournament_id
            )));
        }
        let participants = self.participants.list_approved_participants(tournament_id)?;
        let plan = plan_fixtures(&tournament, &participants, request, rng)?;
        let mut report = plan.report();

        report.matches_created = self.matches.create_matches(tournament_id, plan.matches)?;
        if let Err(e) = self.tournaments.mark_fixtures_generated(tournament_id) {
            if let Err(rollback) = self.matches.delete_matches(tournament_id) {
                log::error!(
                    "Tournament {}: rollback after failed generation also failed: {}",
                    tournament_id,
                    rollback
                );
            }
            return Err(e.into());
        }

        log::info!(
            "Tournament {}: generated {} matches across {} partition(s), {} skipped",
            tournament_id,
            report.matches_created,
            report.partitions.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Same planning as [`generate_fixtures`](Self::generate_fixtures), nothing stored.
    pub fn preview_fixtures<R: Rng + ?Sized>(
        &self,
        caller: &Caller,
        tournament_id: TournamentId,
        request: &FixtureRequest,
        rng: &mut R,
    ) -> Result<FixtureReport, FixtureError> {
        caller.require_admin()?;
        let tournament = self.load_tournament(tournament_id)?;
        let participants = self.participants.list_approved_participants(tournament_id)?;
        Ok(plan_fixtures(&tournament, &participants, request, rng)?.report())
    }

    pub fn list_matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, FixtureError> {
        self.load_tournament(tournament_id)?;
        Ok(self.matches.list_matches(tournament_id)?)
    }

    /// Record a result and advance the winner. Safe to deliver the same result twice.
    pub fn complete_match(
        &self,
        caller: &Caller,
        match_id: MatchId,
        winner: Team,
    ) -> Result<Completion, FixtureError> {
        caller.require_admin()?;
        let tournament_id = self.load_match(match_id)?.tournament_id;
        let lock = self.tournament_lock(tournament_id)?;
        let _guard = lock.lock().map_err(|_| StoreError::Poisoned)?;

        // Re-read under the lock.
        let game = self.load_match(match_id)?;
        let downstream = match self.matches.downstream_slot(match_id)? {
            Some(link) => Some(self.load_match(link.match_id)?),
            None => None,
        };
        let completion = progression::resolve_completion(&game, downstream.as_ref(), winner)?;
        if !completion.updated.is_empty() {
            self.matches.update_matches(completion.updated.clone())?;
            log::info!(
                "Match {} ({} {}) completed, winner {:?}",
                match_id,
                game.round_name,
                game.match_number,
                winner
            );
        }
        Ok(completion)
    }

    pub fn start_match(&self, caller: &Caller, match_id: MatchId) -> Result<GameMatch, FixtureError> {
        self.transition(caller, match_id, progression::start)
    }

    pub fn cancel_match(&self, caller: &Caller, match_id: MatchId) -> Result<GameMatch, FixtureError> {
        self.transition(caller, match_id, progression::cancel)
    }

    fn transition(
        &self,
        caller: &Caller,
        match_id: MatchId,
        apply: fn(&GameMatch) -> Result<GameMatch, FixtureError>,
    ) -> Result<GameMatch, FixtureError> {
        caller.require_admin()?;
        let tournament_id = self.load_match(match_id)?.tournament_id;
        let lock = self.tournament_lock(tournament_id)?;
        let _guard = lock.lock().map_err(|_| StoreError::Poisoned)?;

        let game = self.load_match(match_id)?;
        let next = apply(&game)?;
        if next != game {
            self.matches.update_matches(vec![next.clone()])?;
        }
        Ok(next)
    }
}
