//! Match (fixture unit), Slot, Team, MatchStatus and round naming.

use crate::models::participant::{Category, Entrant, ParticipantId};
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Side of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    One,
    Two,
}

impl Team {
    /// Side a match at `index` (0-based, within its round) feeds in the next round.
    pub fn for_feeder_index(index: usize) -> Self {
        if index % 2 == 0 {
            Team::One
        } else {
            Team::Two
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MatchStatus {
    /// Completed and cancelled matches never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

/// Contents of one side of a match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot {
    Entrant(Entrant),
    /// To be decided: filled by the winner of a feeder match.
    #[default]
    Pending,
    /// No opponent in round 1; the other side advances without playing.
    Bye,
}

impl Slot {
    pub fn entrant(&self) -> Option<&Entrant> {
        match self {
            Slot::Entrant(e) => Some(e),
            Slot::Pending | Slot::Bye => None,
        }
    }
}

/// Where the winner of a knockout match goes next.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Advancement {
    pub match_id: MatchId,
    pub team: Team,
}

/// A single fixture in a partition's bracket or round robin.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub category: Category,
    pub age_group: Option<String>,
    pub round: u32,
    pub round_name: String,
    /// Ordering key within the round (1-based).
    pub match_number: u32,
    pub team_1: Slot,
    pub team_2: Slot,
    pub status: MatchStatus,
    /// None until completed.
    pub winner: Option<Team>,
    /// Knockout only; None for the final and for round robin.
    pub advances_to: Option<Advancement>,
    /// Round-1 placeholder for a seed that skips the round.
    #[serde(default)]
    pub is_bye: bool,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub court: Option<u32>,
}

impl GameMatch {
    pub fn new(
        tournament_id: TournamentId,
        category: Category,
        age_group: Option<String>,
        round: u32,
        round_name: impl Into<String>,
        match_number: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            category,
            age_group,
            round,
            round_name: round_name.into(),
            match_number,
            team_1: Slot::Pending,
            team_2: Slot::Pending,
            status: MatchStatus::Scheduled,
            winner: None,
            advances_to: None,
            is_bye: false,
            scheduled_at: None,
            court: None,
        }
    }

    pub fn slot(&self, team: Team) -> &Slot {
        match team {
            Team::One => &self.team_1,
            Team::Two => &self.team_2,
        }
    }

    pub fn slot_mut(&mut self, team: Team) -> &mut Slot {
        match team {
            Team::One => &mut self.team_1,
            Team::Two => &mut self.team_2,
        }
    }

    /// Both sides are known, so the match can be played.
    pub fn is_ready(&self) -> bool {
        self.team_1.entrant().is_some() && self.team_2.entrant().is_some()
    }

    pub fn winning_entrant(&self) -> Option<&Entrant> {
        self.winner.and_then(|w| self.slot(w).entrant())
    }

    pub fn involves(&self, participant_id: ParticipantId) -> bool {
        [&self.team_1, &self.team_2]
            .into_iter()
            .filter_map(Slot::entrant)
            .any(|e| e.participant_id == participant_id)
    }

    /// player1..player4 as display names: team 1 fills 1 and 3, team 2 fills 2 and 4.
    /// Partner positions stay empty outside doubles/mixed.
    pub fn player_slots(&self) -> [Option<String>; 4] {
        let team = self.category.is_team();
        let lead = |slot: &Slot| slot.entrant().map(|e| e.name.clone());
        let partner = |slot: &Slot| {
            if team {
                slot.entrant().and_then(|e| e.partner_name.clone())
            } else {
                None
            }
        };
        [
            lead(&self.team_1),
            lead(&self.team_2),
            partner(&self.team_1),
            partner(&self.team_2),
        ]
    }
}

/// Knockout round label from how many rounds remain after this one.
pub fn round_name(round: u32, total_rounds: u32) -> String {
    match total_rounds.saturating_sub(round) {
        0 => "Final".to_string(),
        1 => "Semi Final".to_string(),
        2 => "Quarter Final".to_string(),
        _ => format!("Round {}", round),
    }
}
