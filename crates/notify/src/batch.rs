//! Batch job that scores every participant and queues their notification.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use streak_core::streak::days_since;
use streak_core::{ChallengeRoster, NotificationCategory};

use crate::scheduler::PriorityScheduler;
use crate::urgency::UrgencyCalculator;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_notifications: usize,
    pub emergency_alerts: usize,
    pub motivation_messages: usize,
    /// Scheduler size after the batch was enqueued.
    pub queue_size: usize,
}

/// Create one notification per participant of every roster and enqueue it.
///
/// `missing_activity_days` stands in for days-since-activity when a
/// participant has never checked in.
pub fn generate_notifications(
    calculator: &UrgencyCalculator,
    scheduler: &PriorityScheduler,
    rosters: &[ChallengeRoster],
    now: DateTime<Utc>,
    missing_activity_days: u32,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for roster in rosters {
        for participant in &roster.participants {
            let days = days_since(participant.last_activity, now, missing_activity_days);
            let item = calculator.create_notification_at(
                &participant.user_id,
                participant.streak,
                days,
                &roster.title,
                now,
            );

            match item.category {
                NotificationCategory::Emergency => summary.emergency_alerts += 1,
                NotificationCategory::Motivation => summary.motivation_messages += 1,
                _ => {}
            }
            summary.total_notifications += 1;
            scheduler.enqueue(item);
        }
    }

    summary.queue_size = scheduler.size();
    info!(
        total = summary.total_notifications,
        emergency = summary.emergency_alerts,
        motivation = summary.motivation_messages,
        queue_size = summary.queue_size,
        "Notification batch generated"
    );
    summary
}
