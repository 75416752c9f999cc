//! Hands scheduled notifications to delivery channels.
//!
//! The dispatcher pulls items from a [`PriorityScheduler`] in urgency order
//! and delivers each one to every configured channel. Individual channel
//! failures don't block other channels, and failed items are reported but
//! not re-queued.

use streak_core::NotificationItem;

use crate::scheduler::PriorityScheduler;
use crate::traits::{DispatchResult, Notifier};

pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    pub fn empty() -> Self {
        Self { channels: Vec::new() }
    }

    pub fn add_channel(&mut self, channel: Box<dyn Notifier>) {
        self.channels.push(channel);
    }

    /// Deliver one notification to every channel.
    pub async fn dispatch(&self, item: &NotificationItem) -> Vec<DispatchResult> {
        if self.channels.is_empty() {
            tracing::debug!(recipient = %item.recipient, "No notification channels configured");
            return Vec::new();
        }

        let mut results = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let start = std::time::Instant::now();
            let result = channel.send(item).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let (success, error) = match result {
                Ok(()) => {
                    tracing::debug!(
                        recipient = %item.recipient,
                        channel = channel.channel_name(),
                        duration_ms,
                        "Notification delivered"
                    );
                    (true, None)
                }
                Err(e) => {
                    tracing::warn!(
                        recipient = %item.recipient,
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "Notification delivery failed"
                    );
                    (false, Some(e.to_string()))
                }
            };

            results.push(DispatchResult {
                channel: channel.channel_name().to_string(),
                recipient: item.recipient.clone(),
                priority: item.priority,
                success,
                error,
                duration_ms,
            });
        }

        results
    }

    /// Dequeue up to `max` notifications, most urgent first, and deliver them.
    pub async fn drain(&self, scheduler: &PriorityScheduler, max: usize) -> Vec<DispatchResult> {
        let mut results = Vec::new();
        let mut dispatched = 0;

        while dispatched < max {
            let Some(item) = scheduler.dequeue() else {
                break;
            };
            results.extend(self.dispatch(&item).await);
            dispatched += 1;
        }

        tracing::info!(
            dispatched,
            failures = results.iter().filter(|r| !r.success).count(),
            remaining = scheduler.size(),
            "Notification drain finished"
        );
        results
    }
}
