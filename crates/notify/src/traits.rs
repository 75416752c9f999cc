//! Notifier trait definition and shared error types.

use chrono::Utc;
use streak_core::{NotificationCategory, NotificationItem};

/// Errors that can occur while rendering or delivering notifications.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// A delivery channel for scheduled notifications (push, email, ...).
///
/// The scheduler only orders pending items; implementations of this trait
/// do the actual sending.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel.
    async fn send(&self, item: &NotificationItem) -> Result<(), NotifyError>;

    /// Test connectivity with a sample notification.
    async fn test(&self) -> Result<(), NotifyError> {
        let sample = NotificationItem {
            recipient: "test-user".to_string(),
            priority: 1,
            message: "[TEST] Streak notification test".to_string(),
            category: NotificationCategory::Emergency,
            source_streak: 0,
            days_since_activity: 0,
            challenge_title: "test".to_string(),
            created_at: Utc::now(),
        };
        self.send(&sample).await
    }

    /// Human-readable name for this channel (e.g., "log", "push").
    fn channel_name(&self) -> &str;
}

/// Result of handing one notification to one channel.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub channel: String,
    pub recipient: String,
    pub priority: u32,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
