//! Consecutive-day streak bookkeeping.
//!
//! These rules run in the request layer before a leaderboard update: a
//! check-in on the day after the previous one extends the streak, any
//! longer gap restarts it at 1, and a second check-in on the same day is
//! rejected.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::StreakError;

/// Outcome of logging one day of activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakAdvance {
    pub streak: u32,
    pub last_activity_day: NaiveDate,
    /// `true` when the previous streak was broken and restarted at 1.
    pub restarted: bool,
}

/// Apply a check-in for `today` to a participant's streak.
///
/// # Errors
///
/// Returns [`StreakError::AlreadyLogged`] if `last_activity_day` is `today`.
pub fn advance_streak(
    current_streak: u32,
    last_activity_day: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<StreakAdvance, StreakError> {
    if last_activity_day == Some(today) {
        return Err(StreakError::AlreadyLogged(today));
    }

    let continues = last_activity_day.is_some() && last_activity_day == today.pred_opt();
    let streak = if continues {
        current_streak.saturating_add(1)
    } else {
        1
    };

    Ok(StreakAdvance {
        streak,
        last_activity_day: today,
        restarted: !continues,
    })
}

/// Whole days elapsed since `last_activity`, rounded down.
///
/// Participants that never logged activity get `missing_default`.
/// Timestamps in the future count as zero days.
pub fn days_since(last_activity: Option<DateTime<Utc>>, now: DateTime<Utc>, missing_default: u32) -> u32 {
    match last_activity {
        None => missing_default,
        Some(last) => {
            let days = now.signed_duration_since(last).num_days().max(0);
            u32::try_from(days).unwrap_or(u32::MAX)
        }
    }
}
