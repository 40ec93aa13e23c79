//! Data structures for the fixture engine: participants, matches, tournament configuration.

mod game;
mod participant;
mod tournament;

pub use game::{round_name, Advancement, GameMatch, MatchId, MatchStatus, Slot, Team};
pub use participant::{
    skill_rank, Category, Entrant, Participant, ParticipantId, Partner, SkillLevel,
};
pub use tournament::{
    Caller, FixtureError, Format, Role, StoreError, Tournament, TournamentId,
};
