use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque challenge identifier (storage object id).
pub type ChallengeId = String;

/// Opaque user identifier (storage object id).
pub type UserId = String;

/// Extra display fields carried alongside a leaderboard entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetails {
    pub total_active_days: u32,
    pub last_activity: Option<DateTime<Utc>>,
}

/// One participant's slot in a challenge leaderboard.
///
/// `rank_value` is the current streak length and drives heap order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry<K = UserId> {
    pub key: K,
    pub display_name: String,
    pub rank_value: u32,
    pub details: ActivityDetails,
}

/// Streak data handed to the leaderboard on every progress-logging event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantProgress {
    pub user_id: UserId,
    pub display_name: String,
    pub streak: u32,
    #[serde(default)]
    pub total_active_days: u32,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
}

impl ParticipantProgress {
    pub fn into_rank_entry(self) -> RankEntry {
        RankEntry {
            key: self.user_id,
            display_name: self.display_name,
            rank_value: self.streak,
            details: ActivityDetails {
                total_active_days: self.total_active_days,
                last_activity: self.last_activity,
            },
        }
    }
}

/// A challenge and its participants as supplied by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRoster {
    pub challenge_id: ChallengeId,
    pub title: String,
    #[serde(default)]
    pub participants: Vec<ParticipantProgress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    /// Streak about to lapse.
    Emergency,
    /// Long streak (7+ days).
    Motivation,
    /// Regular streak (3-6 days).
    Reminder,
    /// New participant (0-2 days).
    Encouragement,
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationCategory::Emergency => write!(f, "EMERGENCY"),
            NotificationCategory::Motivation => write!(f, "MOTIVATION"),
            NotificationCategory::Reminder => write!(f, "REMINDER"),
            NotificationCategory::Encouragement => write!(f, "ENCOURAGEMENT"),
        }
    }
}

/// A pending engagement notification. Lower `priority` = dispatch sooner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    pub recipient: UserId,
    pub priority: u32,
    pub message: String,
    pub category: NotificationCategory,
    pub source_streak: u32,
    pub days_since_activity: u32,
    pub challenge_title: String,
    pub created_at: DateTime<Utc>,
}
