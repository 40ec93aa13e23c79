//! Knockout brackets: bracket sizing, byes, seed placement and advancement links.

use crate::logic::partition::PartitionKey;
use crate::models::{
    round_name, Advancement, GameMatch, MatchId, MatchStatus, Participant, Slot, Team,
    TournamentId,
};
use serde::{Deserialize, Serialize};

/// Size of a knockout bracket for `entrants` entries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketShape {
    pub entrants: usize,
    /// Smallest power of two >= entrants.
    pub bracket_size: usize,
    /// Round-1 positions without an opponent; these go to the top seeds.
    pub byes: usize,
    pub rounds: u32,
    /// bracket_size - 1, bye records included.
    pub matches: usize,
}

impl BracketShape {
    /// None when there are fewer than two entrants.
    pub fn for_entrants(entrants: usize) -> Option<Self> {
        if entrants < 2 {
            return None;
        }
        let bracket_size = entrants.next_power_of_two();
        Some(Self {
            entrants,
            bracket_size,
            byes: bracket_size - entrants,
            rounds: bracket_size.trailing_zeros(),
            matches: bracket_size - 1,
        })
    }
}

/// Seed numbers (1-based) in bracket order; consecutive pairs meet in round 1.
///
/// Built by repeatedly pairing each seed `s` with `2k + 1 - s`, so seed 1 meets seed B,
/// seed 2 meets seed B - 1, and the top two seeds sit in opposite halves.
pub fn seed_positions(bracket_size: usize) -> Vec<usize> {
    let mut seeds = vec![1usize];
    while seeds.len() < bracket_size {
        let k = seeds.len();
        seeds = seeds.iter().flat_map(|&s| [s, 2 * k + 1 - s]).collect();
    }
    seeds
}

/// Build every match of a knockout bracket for a seeded partition.
///
/// Round 1 holds the seeded entrants; a seed without an opponent gets a completed bye
/// record and is carried straight into its round-2 slot. Later rounds start `Pending`
/// and are linked so each match's winner feeds exactly one downstream slot.
/// Returns an empty list for fewer than two entrants.
pub fn build_knockout(
    tournament_id: TournamentId,
    key: &PartitionKey,
    seeded: &[Participant],
) -> Vec<GameMatch> {
    let shape = match BracketShape::for_entrants(seeded.len()) {
        Some(shape) => shape,
        None => return Vec::new(),
    };

    let mut rounds: Vec<Vec<GameMatch>> = (1..=shape.rounds)
        .map(|round| {
            let count = shape.bracket_size >> round;
            (0..count)
                .map(|i| {
                    GameMatch::new(
                        tournament_id,
                        key.category,
                        key.age_group.clone(),
                        round,
                        round_name(round, shape.rounds),
                        i as u32 + 1,
                    )
                })
                .collect()
        })
        .collect();

    link_rounds(&mut rounds);
    place_seeds(&mut rounds[0], seeded, shape.bracket_size);
    carry_byes(&mut rounds);

    log::debug!(
        "Built knockout for {}: {} entrants, bracket {}, {} byes, {} rounds",
        key,
        shape.entrants,
        shape.bracket_size,
        shape.byes,
        shape.rounds
    );

    rounds.into_iter().flatten().collect()
}

/// Point match `i` of each round at match `i / 2` of the next.
fn link_rounds(rounds: &mut [Vec<GameMatch>]) {
    for r in 0..rounds.len().saturating_sub(1) {
        let next_ids: Vec<MatchId> = rounds[r + 1].iter().map(|m| m.id).collect();
        for (i, m) in rounds[r].iter_mut().enumerate() {
            m.advances_to = Some(Advancement {
                match_id: next_ids[i / 2],
                team: Team::for_feeder_index(i),
            });
        }
    }
}

fn place_seeds(first_round: &mut [GameMatch], seeded: &[Participant], bracket_size: usize) {
    let slot_for = |seed: usize| match seeded.get(seed - 1) {
        Some(p) => Slot::Entrant(p.entrant()),
        None => Slot::Bye,
    };
    let positions = seed_positions(bracket_size);
    for (m, pair) in first_round.iter_mut().zip(positions.chunks_exact(2)) {
        m.team_1 = slot_for(pair[0]);
        m.team_2 = slot_for(pair[1]);
        // The lower seed is always team 1, so a bye only ever lands in team 2.
        if m.team_2 == Slot::Bye {
            m.is_bye = true;
            m.status = MatchStatus::Completed;
            m.winner = Some(Team::One);
        }
    }
}

fn carry_byes(rounds: &mut [Vec<GameMatch>]) {
    if rounds.len() < 2 {
        return;
    }
    let (first, rest) = rounds.split_at_mut(1);
    let second = &mut rest[0];
    for m in first[0].iter().filter(|m| m.is_bye) {
        let (Some(link), Some(entrant)) = (m.advances_to, m.winning_entrant()) else {
            continue;
        };
        if let Some(target) = second.iter_mut().find(|t| t.id == link.match_id) {
            *target.slot_mut(link.team) = Slot::Entrant(entrant.clone());
        }
    }
}
