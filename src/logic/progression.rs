//! Match progression: status transitions and winner advancement.
//!
//! Everything here works on match values and returns the records to write back,
//! so the caller can persist a completion and its downstream slot in one update.

use crate::models::{Entrant, FixtureError, GameMatch, MatchStatus, Slot, Team};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOutcome {
    Applied,
    /// Same result delivered again; nothing changed.
    AlreadyApplied,
}

/// Records changed by a completion event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub outcome: CompletionOutcome,
    /// Completed match first, then the downstream match if one was updated.
    pub updated: Vec<GameMatch>,
}

/// Apply `winner` to `game` and carry the winning entrant into `downstream`.
///
/// `downstream` must be the match named by `game.advances_to` (None when there is no link).
pub fn resolve_completion(
    game: &GameMatch,
    downstream: Option<&GameMatch>,
    winner: Team,
) -> Result<Completion, FixtureError> {
    match game.status {
        MatchStatus::Cancelled => {
            return Err(FixtureError::conflict(format!("match {} was cancelled", game.id)));
        }
        MatchStatus::Completed if game.winner == Some(winner) => {
            return Ok(Completion {
                outcome: CompletionOutcome::AlreadyApplied,
                updated: Vec::new(),
            });
        }
        MatchStatus::Completed => {
            return Err(FixtureError::conflict(format!(
                "match {} is already completed with a different winner",
                game.id
            )));
        }
        MatchStatus::Scheduled | MatchStatus::InProgress => {}
    }
    if !game.is_ready() {
        return Err(FixtureError::validation(format!(
            "match {} cannot be completed before both sides are known",
            game.id
        )));
    }

    let mut completed = game.clone();
    completed.status = MatchStatus::Completed;
    completed.winner = Some(winner);

    let mut updated = Vec::with_capacity(2);
    let next = match completed.advances_to {
        Some(link) => {
            let target = downstream
                .filter(|d| d.id == link.match_id)
                .ok_or(FixtureError::MatchNotFound(link.match_id))?;
            let entrant = completed
                .winning_entrant()
                .cloned()
                .ok_or_else(|| FixtureError::validation("winning side has no entrant"))?;
            fill_slot(target, link.team, entrant)?
        }
        None => None,
    };
    updated.push(completed);
    updated.extend(next);

    Ok(Completion {
        outcome: CompletionOutcome::Applied,
        updated,
    })
}

/// Put `entrant` into `team` of `target`. Returns None when it is already there.
fn fill_slot(
    target: &GameMatch,
    team: Team,
    entrant: Entrant,
) -> Result<Option<GameMatch>, FixtureError> {
    if target.status.is_terminal() {
        return Err(FixtureError::conflict(format!(
            "downstream match {} is {}",
            target.id,
            target.status.as_str()
        )));
    }
    match target.slot(team) {
        Slot::Pending => {
            let mut next = target.clone();
            *next.slot_mut(team) = Slot::Entrant(entrant);
            Ok(Some(next))
        }
        Slot::Entrant(existing) if existing.participant_id == entrant.participant_id => Ok(None),
        Slot::Entrant(_) | Slot::Bye => Err(FixtureError::conflict(format!(
            "slot in downstream match {} is already taken",
            target.id
        ))),
    }
}

/// Scheduled -> in progress. Starting a match that is already in progress is a no-op.
pub fn start(game: &GameMatch) -> Result<GameMatch, FixtureError> {
    match game.status {
        MatchStatus::InProgress => Ok(game.clone()),
        MatchStatus::Scheduled if game.is_ready() => {
            let mut started = game.clone();
            started.status = MatchStatus::InProgress;
            Ok(started)
        }
        MatchStatus::Scheduled => Err(FixtureError::validation(format!(
            "match {} cannot start before both sides are known",
            game.id
        ))),
        MatchStatus::Completed | MatchStatus::Cancelled => Err(FixtureError::conflict(format!(
            "match {} is already {}",
            game.id,
            game.status.as_str()
        ))),
    }
}

/// Scheduled or in progress -> cancelled. Cancelling twice is a no-op.
pub fn cancel(game: &GameMatch) -> Result<GameMatch, FixtureError> {
    match game.status {
        MatchStatus::Cancelled => Ok(game.clone()),
        MatchStatus::Completed => Err(FixtureError::conflict(format!(
            "match {} is already completed",
            game.id
        ))),
        MatchStatus::Scheduled | MatchStatus::InProgress => {
            let mut cancelled = game.clone();
            cancelled.status = MatchStatus::Cancelled;
            Ok(cancelled)
        }
    }
}
