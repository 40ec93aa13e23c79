//! Court and time assignment for generated fixtures.

use crate::models::{FixtureError, GameMatch};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// When and where play happens. Optional part of a fixture request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOptions {
    pub start_at: DateTime<Utc>,
    pub match_duration_minutes: u32,
    pub courts: u32,
}

impl ScheduleOptions {
    pub fn validate(&self) -> Result<(), FixtureError> {
        if self.courts == 0 {
            return Err(FixtureError::validation("schedule needs at least one court"));
        }
        if self.match_duration_minutes == 0 {
            return Err(FixtureError::validation("match duration must be positive"));
        }
        Ok(())
    }
}

fn out_of_range() -> FixtureError {
    FixtureError::validation("schedule runs past the supported date range")
}

/// Give every playable match a start time and court.
///
/// Matches are taken in (round, input order, match number) order; `matches` is
/// expected partition by partition, as the planner produces it. Each round starts on
/// a new time row so a later round never overlaps the one before it. Bye records are
/// left unscheduled. A schedule running past the supported date range is a validation error.
pub fn assign_schedule(matches: &mut [GameMatch], options: &ScheduleOptions) -> Result<(), FixtureError> {
    options.validate()?;

    let mut order: Vec<usize> = (0..matches.len()).filter(|&i| !matches[i].is_bye).collect();
    // Stable: keeps partition order within a round.
    order.sort_by_key(|&i| matches[i].round);

    let courts = options.courts as usize;
    let slot =
        Duration::try_minutes(i64::from(options.match_duration_minutes)).ok_or_else(out_of_range)?;
    let mut row = 0i32;
    let mut used_in_row = 0usize;
    let mut current_round = None;

    for i in order {
        let round = matches[i].round;
        if current_round.is_some_and(|r| r != round) && used_in_row > 0 {
            row += 1;
            used_in_row = 0;
        }
        current_round = Some(round);
        if used_in_row == courts {
            row += 1;
            used_in_row = 0;
        }
        let offset = slot.checked_mul(row).ok_or_else(out_of_range)?;
        let at = options.start_at.checked_add_signed(offset).ok_or_else(out_of_range)?;
        matches[i].scheduled_at = Some(at);
        matches[i].court = Some(used_in_row as u32 + 1);
        used_in_row += 1;
    }
    Ok(())
}
