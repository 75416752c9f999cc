//! Ranking views handed back to callers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use streak_core::{ChallengeId, RankEntry, UserId};

/// Where a user stands in one challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// Dense 1-based position (tied streaks share a position).
    pub position: usize,
    pub total_participants: usize,
}

impl Standing {
    /// Share of participants at or below this position, rounded to a whole percent.
    pub fn percentile(&self) -> u32 {
        if self.total_participants == 0 {
            return 0;
        }
        let behind = 1.0 - (self.position as f64 - 1.0) / self.total_participants as f64;
        (behind * 100.0).round() as u32
    }
}

/// One row of a rendered leaderboard.
///
/// `rank` is sequential (1, 2, 3, ...) even across tied streaks, unlike
/// [`Standing::position`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub rank: usize,
    pub user_id: UserId,
    pub display_name: String,
    pub streak: u32,
    pub total_active_days: u32,
    pub last_activity: Option<DateTime<Utc>>,
}

impl LeaderboardRow {
    pub(crate) fn from_entry(rank: usize, entry: RankEntry) -> Self {
        Self {
            rank,
            user_id: entry.key,
            display_name: entry.display_name,
            streak: entry.rank_value,
            total_active_days: entry.details.total_active_days,
            last_activity: entry.details.last_activity,
        }
    }
}

/// Top performers of one challenge, as shown in the cross-challenge overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOverview {
    pub challenge_id: ChallengeId,
    pub participant_count: usize,
    pub top_performers: Vec<LeaderboardRow>,
}
