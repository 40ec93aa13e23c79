//! In-memory store: tournaments, registrations and matches behind RwLocks.

use super::{MatchStore, ParticipantStore, TournamentStore};
use crate::logic::validate_participant;
use crate::models::{
    FixtureError, GameMatch, MatchId, Participant, ParticipantId, StoreError, Tournament,
    TournamentId,
};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
    participants: RwLock<HashMap<TournamentId, Vec<Participant>>>,
    matches: RwLock<HashMap<MatchId, GameMatch>>,
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read().map_err(|_| StoreError::Poisoned)
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write().map_err(|_| StoreError::Poisoned)
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_tournament(&self, tournament: Tournament) -> Result<(), StoreError> {
        write(&self.tournaments)?.insert(tournament.id, tournament);
        Ok(())
    }

    fn registered_tournament(&self, tournament_id: TournamentId) -> Result<Tournament, FixtureError> {
        read(&self.tournaments)?
            .get(&tournament_id)
            .cloned()
            .ok_or(FixtureError::TournamentNotFound(tournament_id))
    }

    /// Register a participant.
    ///
    /// The entry must fit the tournament's categories and age groups, and a user may
    /// hold only one registration per category.
    pub fn add_participant(
        &self,
        tournament_id: TournamentId,
        participant: Participant,
    ) -> Result<Participant, FixtureError> {
        let tournament = self.registered_tournament(tournament_id)?;
        validate_participant(&tournament, &participant, true)?;

        let mut g = write(&self.participants)?;
        let list = g.entry(tournament_id).or_default();
        if list
            .iter()
            .any(|p| p.user_id == participant.user_id && p.category == participant.category)
        {
            return Err(FixtureError::conflict(format!(
                "user {} is already registered for {}",
                participant.user_id, participant.category
            )));
        }
        list.push(participant.clone());
        Ok(participant)
    }

    /// Approve a registration, re-checking it against the tournament first.
    pub fn approve_participant(
        &self,
        tournament_id: TournamentId,
        participant_id: ParticipantId,
    ) -> Result<Participant, FixtureError> {
        let tournament = self.registered_tournament(tournament_id)?;
        let mut g = write(&self.participants)?;
        let p = g
            .get_mut(&tournament_id)
            .and_then(|list| list.iter_mut().find(|p| p.id == participant_id))
            .ok_or(FixtureError::ParticipantNotFound(participant_id))?;
        validate_participant(&tournament, p, true)?;
        p.approved = true;
        Ok(p.clone())
    }

    /// All registrations, approved or not.
    pub fn list_participants(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<Participant>, StoreError> {
        Ok(read(&self.participants)?
            .get(&tournament_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl TournamentStore for InMemoryStore {
    fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        Ok(read(&self.tournaments)?.get(&id).cloned())
    }

    fn mark_fixtures_generated(&self, id: TournamentId) -> Result<(), StoreError> {
        let mut g = write(&self.tournaments)?;
        let t = g
            .get_mut(&id)
            .ok_or_else(|| StoreError::Unavailable(format!("tournament {} vanished", id)))?;
        t.has_fixtures = true;
        Ok(())
    }
}

impl ParticipantStore for InMemoryStore {
    fn list_approved_participants(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<Participant>, StoreError> {
        Ok(read(&self.participants)?
            .get(&tournament_id)
            .map(|list| list.iter().filter(|p| p.approved).cloned().collect())
            .unwrap_or_default())
    }
}

impl MatchStore for InMemoryStore {
    fn create_matches(
        &self,
        tournament_id: TournamentId,
        matches: Vec<GameMatch>,
    ) -> Result<usize, StoreError> {
        let mut g = write(&self.matches)?;
        // Check everything before inserting anything.
        for m in &matches {
            if g.contains_key(&m.id) {
                return Err(StoreError::DuplicateMatch(m.id));
            }
            if m.tournament_id != tournament_id {
                return Err(StoreError::Unavailable(format!(
                    "match {} belongs to another tournament",
                    m.id
                )));
            }
        }
        let count = matches.len();
        g.extend(matches.into_iter().map(|m| (m.id, m)));
        Ok(count)
    }

    fn delete_matches(&self, tournament_id: TournamentId) -> Result<(), StoreError> {
        write(&self.matches)?.retain(|_, m| m.tournament_id != tournament_id);
        Ok(())
    }

    fn get_match(&self, id: MatchId) -> Result<Option<GameMatch>, StoreError> {
        Ok(read(&self.matches)?.get(&id).cloned())
    }

    fn update_matches(&self, matches: Vec<GameMatch>) -> Result<(), StoreError> {
        let mut g = write(&self.matches)?;
        if let Some(unknown) = matches.iter().find(|m| !g.contains_key(&m.id)) {
            return Err(StoreError::UnknownMatch(unknown.id));
        }
        g.extend(matches.into_iter().map(|m| (m.id, m)));
        Ok(())
    }

    fn list_matches(&self, tournament_id: TournamentId) -> Result<Vec<GameMatch>, StoreError> {
        let mut list: Vec<GameMatch> = read(&self.matches)?
            .values()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            (a.category, &a.age_group, a.round, a.match_number)
                .cmp(&(b.category, &b.age_group, b.round, b.match_number))
        });
        Ok(list)
    }
}
