//! Integration tests for round-robin fixtures.

use racket_fixtures_web::{
    build_round_robin, round_robin_match_count, Category, Participant, PartitionKey,
};
use std::collections::HashSet;
use uuid::Uuid;

fn entrants(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| Participant::new(format!("R{i}"), Category::Singles).approve())
        .collect()
}

fn pair_of(m: &racket_fixtures_web::GameMatch) -> (Uuid, Uuid) {
    let a = m.team_1.entrant().unwrap().participant_id;
    let b = m.team_2.entrant().unwrap().participant_id;
    (a.min(b), a.max(b))
}

#[test]
fn every_pair_meets_exactly_once() {
    let key = PartitionKey::new(Category::Singles, None);
    for n in 2..=12 {
        let list = entrants(n);
        let matches = build_round_robin(Uuid::new_v4(), &key, &list);
        assert_eq!(matches.len(), n * (n - 1) / 2, "n = {n}");
        assert_eq!(matches.len(), round_robin_match_count(n));

        let pairs: HashSet<_> = matches.iter().map(pair_of).collect();
        assert_eq!(pairs.len(), matches.len(), "duplicate pairing for n = {n}");
        for m in &matches {
            assert_ne!(m.team_1, m.team_2);
        }
    }
}

#[test]
fn matches_are_untiered_and_unlinked() {
    let key = PartitionKey::new(Category::Singles, Some("U17".into()));
    let matches = build_round_robin(Uuid::new_v4(), &key, &entrants(5));
    for (i, m) in matches.iter().enumerate() {
        assert_eq!(m.round, 1);
        assert_eq!(m.round_name, "Round Robin");
        assert_eq!(m.match_number, i as u32 + 1);
        assert_eq!(m.advances_to, None);
        assert!(m.is_ready());
        assert_eq!(m.age_group.as_deref(), Some("U17"));
    }
}

#[test]
fn consecutive_matches_spread_entrants() {
    // With four entrants the first two matches use all four players.
    let key = PartitionKey::new(Category::Singles, None);
    let matches = build_round_robin(Uuid::new_v4(), &key, &entrants(4));
    let first_turn: HashSet<Uuid> = matches[..2]
        .iter()
        .flat_map(|m| {
            let (a, b) = pair_of(m);
            [a, b]
        })
        .collect();
    assert_eq!(first_turn.len(), 4);
}

#[test]
fn fewer_than_two_entrants_builds_nothing() {
    let key = PartitionKey::new(Category::Singles, None);
    assert!(build_round_robin(Uuid::new_v4(), &key, &entrants(1)).is_empty());
    assert!(build_round_robin(Uuid::new_v4(), &key, &entrants(0)).is_empty());
}
