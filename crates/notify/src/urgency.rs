//! Urgency scoring for engagement notifications.
//!
//! Lower scores are dispatched first. The bands, most urgent first:
//!
//! | condition                      | category        | priority |
//! |--------------------------------|-----------------|----------|
//! | 1+ days since last activity    | `EMERGENCY`     | 1        |
//! | streak ≥ 7                     | `MOTIVATION`    | 2..=3    |
//! | streak 3..=6                   | `REMINDER`      | 11..=14  |
//! | streak 0..=2                   | `ENCOURAGEMENT` | 16..=18  |

use chrono::{DateTime, Utc};
use tracing::warn;

use streak_core::{NotificationCategory, NotificationItem};

use crate::templating::{MessageContext, MessageTemplates, TemplateRenderer};

/// Priority score and the category of the band that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Urgency {
    pub priority: u32,
    pub category: NotificationCategory,
}

/// Scores participants and builds their notifications.
#[derive(Debug, Default)]
pub struct UrgencyCalculator {
    templates: MessageTemplates,
    renderer: TemplateRenderer,
}

impl UrgencyCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: MessageTemplates) -> Self {
        Self {
            templates,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Band a participant by streak and inactivity. Total over all inputs.
    pub fn classify(streak: u32, days_since_last_activity: u32) -> Urgency {
        let (priority, category) = if days_since_last_activity >= 1 {
            (1, NotificationCategory::Emergency)
        } else if streak >= 7 {
            (10u32.saturating_sub(streak).max(2), NotificationCategory::Motivation)
        } else if streak >= 3 {
            (10 + (7 - streak), NotificationCategory::Reminder)
        } else {
            (15 + (3 - streak), NotificationCategory::Encouragement)
        };
        Urgency { priority, category }
    }

    pub fn calculate_priority(streak: u32, days_since_last_activity: u32) -> u32 {
        Self::classify(streak, days_since_last_activity).priority
    }

    /// Build a notification stamped with the current time.
    pub fn create_notification(
        &self,
        user_id: &str,
        streak: u32,
        days_since_last_activity: u32,
        challenge_title: &str,
    ) -> NotificationItem {
        self.create_notification_at(user_id, streak, days_since_last_activity, challenge_title, Utc::now())
    }

    pub fn create_notification_at(
        &self,
        user_id: &str,
        streak: u32,
        days_since_last_activity: u32,
        challenge_title: &str,
        created_at: DateTime<Utc>,
    ) -> NotificationItem {
        let urgency = Self::classify(streak, days_since_last_activity);
        let ctx = MessageContext::new(
            user_id,
            streak,
            days_since_last_activity,
            challenge_title,
            urgency.category,
        );

        let message = self
            .renderer
            .render(self.templates.get(urgency.category), &ctx)
            .unwrap_or_else(|e| {
                warn!(user_id, category = %urgency.category, error = %e, "Message template failed, using plain text");
                format!("{}: {}-day streak in \"{}\"", urgency.category, streak, challenge_title)
            });

        NotificationItem {
            recipient: user_id.to_string(),
            priority: urgency.priority,
            message,
            category: urgency.category,
            source_streak: streak,
            days_since_activity: days_since_last_activity,
            challenge_title: challenge_title.to_string(),
            created_at,
        }
    }
}
