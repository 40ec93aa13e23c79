//! Racket tournament fixtures: library with models, the fixture engine and storage.

pub mod export;
pub mod logic;
pub mod models;
pub mod store;

pub use export::{fixtures_csv, write_fixtures_csv};
pub use logic::{
    assign_schedule, build_knockout, build_round_robin, expected_match_count,
    partition_participants, plan_fixtures, resolve_completion, round_robin_match_count,
    seed_entries, seed_positions, split_eligible, validate_participant, validate_participants,
    BracketShape, Completion, CompletionOutcome, FixturePlan, FixtureReport, FixtureRequest,
    FixtureService, PartitionKey, PartitionSummary, ScheduleOptions, SeedingMethod, SkipReason,
    SkippedPartition,
};
pub use models::{
    round_name, skill_rank, Advancement, Caller, Category, Entrant, FixtureError, Format,
    GameMatch, MatchId, MatchStatus, Participant, ParticipantId, Partner, Role, SkillLevel, Slot,
    StoreError, Team, Tournament, TournamentId,
};
pub use store::{InMemoryStore, MatchStore, ParticipantStore, TournamentStore};
