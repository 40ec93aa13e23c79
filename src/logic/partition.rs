//! Partitioning: split approved participants into independent (category, age group) fixtures.

use crate::models::{Category, FixtureError, Participant, Tournament};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Fewest entrants that can form a fixture.
pub const MIN_PARTITION_SIZE: usize = 2;

/// Identifies one independent fixture: matches never cross partitions.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PartitionKey {
    pub category: Category,
    pub age_group: Option<String>,
}

impl PartitionKey {
    pub fn new(category: Category, age_group: Option<String>) -> Self {
        Self {
            category,
            age_group,
        }
    }
}

impl std::fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.age_group {
            Some(group) => write!(f, "{} ({})", self.category, group),
            None => write!(f, "{}", self.category),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    InsufficientParticipants,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::InsufficientParticipants => write!(f, "insufficient participants"),
        }
    }
}

/// A partition that produced no fixture, with the reason shown to the admin.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SkippedPartition {
    pub key: PartitionKey,
    pub participants: usize,
    pub reason: SkipReason,
}

/// Partitions ordered by key, so generation output is stable across runs.
pub type Partitions = BTreeMap<PartitionKey, Vec<Participant>>;

/// Reject registrations the tournament configuration cannot place.
///
/// Age groups are only checked when they take part in partitioning.
pub fn validate_participants(
    tournament: &Tournament,
    participants: &[Participant],
    group_by_age_group: bool,
) -> Result<(), FixtureError> {
    participants
        .iter()
        .try_for_each(|p| validate_participant(tournament, p, group_by_age_group))
}

/// Checks for a single registration, run at sign-up and approval as well as generation.
pub fn validate_participant(
    tournament: &Tournament,
    p: &Participant,
    group_by_age_group: bool,
) -> Result<(), FixtureError> {
    if !tournament.offers(p.category) {
        return Err(FixtureError::validation(format!(
            "invalid category {} for participant {}",
            p.category, p.name
        )));
    }
    if p.category.is_team() && p.partner.is_none() {
        return Err(FixtureError::validation(format!(
            "{} entry for {} has no partner",
            p.category, p.name
        )));
    }
    if !group_by_age_group {
        return Ok(());
    }
    if !tournament.allow_multiple_age_groups && distinct_age_groups(p).len() > 1 {
        return Err(FixtureError::validation(format!(
            "participant {} lists several age groups but the tournament allows one",
            p.name
        )));
    }
    if !tournament.age_groups.is_empty() {
        if let Some(unknown) = p.age_groups.iter().find(|g| !tournament.knows_age_group(g)) {
            return Err(FixtureError::validation(format!(
                "unknown age group {} for participant {}",
                unknown, p.name
            )));
        }
    }
    Ok(())
}

fn distinct_age_groups(p: &Participant) -> Vec<&String> {
    let mut seen = HashSet::new();
    p.age_groups.iter().filter(|g| seen.insert(*g)).collect()
}

/// Group approved participants by category, and by age group when requested.
///
/// A participant registered for several age groups lands in each of those partitions,
/// but never twice in the same one: a second registration by the same user for the
/// same category is dropped. Unapproved participants are ignored.
pub fn partition_participants(participants: &[Participant], group_by_age_group: bool) -> Partitions {
    let mut partitions = Partitions::new();
    for p in participants.iter().filter(|p| p.approved) {
        let keys: Vec<PartitionKey> = if group_by_age_group && !p.age_groups.is_empty() {
            distinct_age_groups(p)
                .into_iter()
                .map(|g| PartitionKey::new(p.category, Some(g.clone())))
                .collect()
        } else {
            vec![PartitionKey::new(p.category, None)]
        };
        for key in keys {
            let members = partitions.entry(key.clone()).or_default();
            if members.iter().any(|m| m.user_id == p.user_id) {
                log::warn!("Dropping repeat entry {} for user {} in {}", p.id, p.user_id, key);
                continue;
            }
            members.push(p.clone());
        }
    }
    partitions
}

/// Separate partitions big enough for a fixture from those that must be skipped.
pub fn split_eligible(partitions: Partitions) -> (Partitions, Vec<SkippedPartition>) {
    let mut eligible = Partitions::new();
    let mut skipped = Vec::new();
    for (key, members) in partitions {
        if members.len() < MIN_PARTITION_SIZE {
            skipped.push(SkippedPartition {
                key,
                participants: members.len(),
                reason: SkipReason::InsufficientParticipants,
            });
        } else {
            eligible.insert(key, members);
        }
    }
    (eligible, skipped)
}
