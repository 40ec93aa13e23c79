//! Seeding: order a partition's entries before they are placed into a fixture.

use crate::models::{skill_rank, Participant};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingMethod {
    #[default]
    Random,
    /// Strongest first (elite down to beginner, unspecified last); ties in random order.
    SkillBased,
}

/// Return `entries` in seed order (index 0 is seed 1).
///
/// Output is always a permutation of the input.
pub fn seed_entries<R: Rng + ?Sized>(
    mut entries: Vec<Participant>,
    method: SeedingMethod,
    rng: &mut R,
) -> Vec<Participant> {
    entries.shuffle(rng);
    match method {
        SeedingMethod::Random => {}
        // Stable sort keeps the shuffled order among equal ranks.
        SeedingMethod::SkillBased => entries.sort_by_key(|p| Reverse(skill_rank(p.skill_level))),
    }
    entries
}
