//! CSV export of a tournament's fixture list.

use crate::models::GameMatch;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct FixtureRow<'a> {
    category: &'a str,
    age_group: &'a str,
    round: u32,
    round_name: &'a str,
    match_number: u32,
    player1: String,
    player2: String,
    player3: String,
    player4: String,
    status: &'a str,
    winner: String,
    scheduled_at: String,
    court: String,
}

fn row(m: &GameMatch) -> FixtureRow<'_> {
    let [player1, player2, player3, player4] = m.player_slots().map(Option::unwrap_or_default);
    let player2 = if m.is_bye { "BYE".to_string() } else { player2 };
    FixtureRow {
        category: m.category.as_str(),
        age_group: m.age_group.as_deref().unwrap_or(""),
        round: m.round,
        round_name: &m.round_name,
        match_number: m.match_number,
        player1,
        player2,
        player3,
        player4,
        status: m.status.as_str(),
        winner: m
            .winning_entrant()
            .map(|e| e.display_name())
            .unwrap_or_default(),
        scheduled_at: m.scheduled_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        court: m.court.map(|c| c.to_string()).unwrap_or_default(),
    }
}

/// Write one CSV row per match, in the order given, with a header line.
pub fn write_fixtures_csv<W: Write>(writer: W, matches: &[GameMatch]) -> csv::Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    for m in matches {
        w.serialize(row(m))?;
    }
    w.flush()?;
    Ok(())
}

/// CSV as a string (for HTTP responses).
pub fn fixtures_csv(matches: &[GameMatch]) -> csv::Result<String> {
    let mut buf = Vec::new();
    write_fixtures_csv(&mut buf, matches)?;
    String::from_utf8(buf)
        .map_err(|e| csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

