//! Round robin: every pair of entrants in a partition meets exactly once.

use crate::logic::partition::PartitionKey;
use crate::models::{GameMatch, Participant, Slot, TournamentId};

pub const ROUND_ROBIN_ROUND_NAME: &str = "Round Robin";

/// n * (n - 1) / 2
pub fn round_robin_match_count(entrants: usize) -> usize {
    entrants * entrants.saturating_sub(1) / 2
}

/// Build all pairings for a partition, numbered 1..=n(n-1)/2.
///
/// Pairs come out in circle-method order, so consecutive match numbers
/// spread entrants across the list. No advancement links are created and
/// every match is in round 1. Returns an empty list for fewer than two entrants.
pub fn build_round_robin(
    tournament_id: TournamentId,
    key: &PartitionKey,
    seeded: &[Participant],
) -> Vec<GameMatch> {
    if seeded.len() < 2 {
        return Vec::new();
    }

    let mut matches = Vec::with_capacity(round_robin_match_count(seeded.len()));
    for (a, b) in circle_pairings(seeded.len()) {
        let mut m = GameMatch::new(
            tournament_id,
            key.category,
            key.age_group.clone(),
            1,
            ROUND_ROBIN_ROUND_NAME,
            matches.len() as u32 + 1,
        );
        m.team_1 = Slot::Entrant(seeded[a].entrant());
        m.team_2 = Slot::Entrant(seeded[b].entrant());
        matches.push(m);
    }

    log::debug!(
        "Built round robin for {}: {} entrants, {} matches",
        key,
        seeded.len(),
        matches.len()
    );
    matches
}

/// Index pairs for `n` entrants; an odd count gets a phantom entry whose pairings are dropped.
fn circle_pairings(n: usize) -> Vec<(usize, usize)> {
    let size = n + n % 2;
    // Position 0 stays fixed; the rest rotate one step per turn.
    let mut ring: Vec<usize> = (0..size).collect();
    let mut pairs = Vec::with_capacity(round_robin_match_count(n));
    for _ in 0..size - 1 {
        for i in 0..size / 2 {
            let (a, b) = (ring[i], ring[size - 1 - i]);
            if a < n && b < n {
                pairs.push((a.min(b), a.max(b)));
            }
        }
        ring[1..].rotate_right(1);
    }
    pairs
}
