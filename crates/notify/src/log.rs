//! Notifier that records deliveries as tracing events.
//!
//! Stands in for a real push/email channel in the worker and in tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use streak_core::NotificationItem;
use tracing::info;

use crate::traits::{Notifier, NotifyError};

#[derive(Debug, Default)]
pub struct LogNotifier {
    delivered: AtomicUsize,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, item: &NotificationItem) -> Result<(), NotifyError> {
        info!(
            recipient = %item.recipient,
            priority = item.priority,
            category = %item.category,
            challenge = %item.challenge_title,
            message = %item.message,
            "Notification sent"
        );
        self.delivered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_deliveries() {
        let notifier = LogNotifier::new();
        notifier.test().await.unwrap();
        notifier.test().await.unwrap();
        assert_eq!(notifier.delivered(), 2);
        assert_eq!(notifier.channel_name(), "log");
    }
}
