//! Integration tests for partitioning and registration validation.

use racket_fixtures_web::{
    partition_participants, split_eligible, validate_participants, Category, FixtureError, Format,
    Participant, PartitionKey, SkipReason, Tournament,
};

fn singles(name: &str) -> Participant {
    Participant::new(name, Category::Singles).approve()
}

#[test]
fn groups_by_category_only_when_age_groups_are_off() {
    let list = vec![
        singles("A").with_age_groups(["U15"]),
        singles("B").with_age_groups(["U17"]),
        Participant::new("C", Category::Doubles).with_partner("C2").approve(),
    ];
    let parts = partition_participants(&list, false);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[&PartitionKey::new(Category::Singles, None)].len(), 2);
    assert_eq!(parts[&PartitionKey::new(Category::Doubles, None)].len(), 1);
}

#[test]
fn multi_age_group_participant_lands_in_each_group_once() {
    let list = vec![
        singles("A").with_age_groups(["U15", "U17", "U15"]),
        singles("B").with_age_groups(["U15"]),
        singles("C"),
    ];
    let parts = partition_participants(&list, true);
    let u15 = &parts[&PartitionKey::new(Category::Singles, Some("U15".into()))];
    let u17 = &parts[&PartitionKey::new(Category::Singles, Some("U17".into()))];
    assert_eq!(u15.len(), 2);
    assert_eq!(u17.len(), 1);
    assert_eq!(parts[&PartitionKey::new(Category::Singles, None)].len(), 1);
}

#[test]
fn one_entry_per_user_in_each_partition() {
    let first = singles("Alice").with_age_groups(["U15"]);
    let mut second = singles("Alice").with_age_groups(["U15", "U17"]);
    second.user_id = first.user_id;
    let list = vec![first.clone(), second.clone(), singles("Bob").with_age_groups(["U15"])];

    let parts = partition_participants(&list, true);
    let u15 = &parts[&PartitionKey::new(Category::Singles, Some("U15".into()))];
    assert_eq!(u15.len(), 2);
    assert_eq!(u15.iter().filter(|p| p.user_id == first.user_id).count(), 1);
    assert_eq!(u15[0].id, first.id);
    // The repeat registration still counts where the first one is absent.
    let u17 = &parts[&PartitionKey::new(Category::Singles, Some("U17".into()))];
    assert_eq!(u17[0].id, second.id);

    // A different category is a separate entry.
    let mut doubles = Participant::new("Alice", Category::Doubles).with_partner("Bea").approve();
    doubles.user_id = first.user_id;
    let parts = partition_participants(&[first, doubles], false);
    assert_eq!(parts.len(), 2);
}

#[test]
fn unapproved_participants_are_ignored() {
    let list = vec![singles("A"), Participant::new("B", Category::Singles)];
    let parts = partition_participants(&list, false);
    assert_eq!(parts[&PartitionKey::new(Category::Singles, None)].len(), 1);
}

#[test]
fn small_partitions_are_reported_not_dropped() {
    let list = vec![
        singles("A"),
        singles("B"),
        Participant::new("M", Category::Mixed).with_partner("M2").approve(),
    ];
    let (eligible, skipped) = split_eligible(partition_participants(&list, false));
    assert_eq!(eligible.len(), 1);
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].key, PartitionKey::new(Category::Mixed, None));
    assert_eq!(skipped[0].participants, 1);
    assert_eq!(skipped[0].reason, SkipReason::InsufficientParticipants);
    assert_eq!(skipped[0].reason.to_string(), "insufficient participants");
}

#[test]
fn rejects_category_the_tournament_does_not_offer() {
    let t = Tournament::new("Open", Format::Knockout).with_categories(vec![Category::Singles]);
    let list = vec![Participant::new("D", Category::Doubles).with_partner("E").approve()];
    assert!(matches!(
        validate_participants(&t, &list, false),
        Err(FixtureError::Validation(_))
    ));
}

#[test]
fn rejects_team_entry_without_partner() {
    let t = Tournament::new("Open", Format::Knockout);
    let list = vec![Participant::new("D", Category::Doubles).approve()];
    assert!(matches!(
        validate_participants(&t, &list, false),
        Err(FixtureError::Validation(_))
    ));
}

#[test]
fn age_group_rules_apply_only_when_grouping_by_age() {
    let t = Tournament::new("Juniors", Format::Knockout).with_age_groups(["U15", "U17"], false);
    let multi = vec![singles("A").with_age_groups(["U15", "U17"])];
    let unknown = vec![singles("B").with_age_groups(["U21"])];

    assert!(validate_participants(&t, &multi, false).is_ok());
    assert!(matches!(
        validate_participants(&t, &multi, true),
        Err(FixtureError::Validation(_))
    ));
    assert!(matches!(
        validate_participants(&t, &unknown, true),
        Err(FixtureError::Validation(_))
    ));

    let relaxed = t.clone().with_age_groups(["U15", "U17"], true);
    assert!(validate_participants(&relaxed, &multi, true).is_ok());
}
