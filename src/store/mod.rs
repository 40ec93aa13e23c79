//! Storage collaborators used by the fixture service, plus an in-memory implementation.

mod memory;

pub use memory::InMemoryStore;

use crate::models::{
    Advancement, GameMatch, MatchId, Participant, StoreError, Tournament, TournamentId,
};
use std::sync::Arc;

pub trait TournamentStore {
    fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError>;
    /// Record that fixtures exist, so a second generation is refused.
    fn mark_fixtures_generated(&self, id: TournamentId) -> Result<(), StoreError>;
}

pub trait ParticipantStore {
    fn list_approved_participants(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<Participant>, StoreError>;
}

pub trait MatchStore {
    /// Insert all matches or none. Returns how many were written.
    fn create_matches(
        &self,
        tournament_id: TournamentId,
        matches: Vec<GameMatch>,
    ) -> Result<usize, StoreError>;

    /// Remove every match of a tournament (rollback of a failed generation).
    fn delete_matches(&self, tournament_id: TournamentId) -> Result<(), StoreError>;

    fn get_match(&self, id: MatchId) -> Result<Option<GameMatch>, StoreError>;

    /// Replace existing records in one step; fails without changes if any id is unknown.
    fn update_matches(&self, matches: Vec<GameMatch>) -> Result<(), StoreError>;

    fn list_matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, StoreError>;

    /// Where the winner of `id` goes next, if anywhere.
    fn downstream_slot(&self, id: MatchId) -> Result<Option<Advancement>, StoreError> {
        Ok(self
            .get_match(id)?
            .ok_or(StoreError::UnknownMatch(id))?
            .advances_to)
    }
}

impl<S: TournamentStore + ?Sized> TournamentStore for Arc<S> {
    fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        (**self).get_tournament(id)
    }

    fn mark_fixtures_generated(&self, id: TournamentId) -> Result<(), StoreError> {
        (**self).mark_fixtures_generated(id)
    }
}

impl<S: ParticipantStore + ?Sized> ParticipantStore for Arc<S> {
    fn list_approved_participants(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<Participant>, StoreError> {
        (**self).list_approved_participants(tournament_id)
    }
}

impl<S: MatchStore + ?Sized> MatchStore for Arc<S> {
    fn create_matches(
        &self,
        tournament_id: TournamentId,
        matches: Vec<GameMatch>,
    ) -> Result<usize, StoreError> {
        (**self).create_matches(tournament_id, matches)
    }

    fn delete_matches(&self, tournament_id: TournamentId) -> Result<(), StoreError> {
        (**self).delete_matches(tournament_id)
    }

    fn get_match(&self, id: MatchId) -> Result<Option<GameMatch>, StoreError> {
        (**self).get_match(id)
    }

    fn update_matches(&self, matches: Vec<GameMatch>) -> Result<(), StoreError> {
        (**self).update_matches(matches)
    }

    fn list_matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, StoreError> {
        (**self).list_matches(tournament_id)
    }

    fn downstream_slot(&self, id: MatchId) -> Result<Option<Advancement>, StoreError> {
        (**self).downstream_slot(id)
    }
}
