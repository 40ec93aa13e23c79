//! Fixture engine: partitioning, seeding, bracket and round-robin building, progression.

mod bracket;
mod fixtures;
mod partition;
mod progression;
mod round_robin;
mod schedule;
mod seeding;

pub use bracket::{build_knockout, seed_positions, BracketShape};
pub use fixtures::{
    expected_match_count, plan_fixtures, FixturePlan, FixtureReport, FixtureRequest,
    FixtureService, PartitionSummary,
};
pub use partition::{
    partition_participants, split_eligible, validate_participant, validate_participants,
    PartitionKey, Partitions, SkipReason, SkippedPartition, MIN_PARTITION_SIZE,
};
pub use progression::{cancel, resolve_completion, start, Completion, CompletionOutcome};
pub use round_robin::{build_round_robin, round_robin_match_count, ROUND_ROBIN_ROUND_NAME};
pub use schedule::{assign_schedule, ScheduleOptions};
pub use seeding::{seed_entries, SeedingMethod};
