//! Urgency-ordered engagement notifications.
//!
//! This crate provides:
//! - `UrgencyCalculator` mapping (streak, days idle) to a priority and category
//! - Minijinja message templates per category
//! - `PriorityScheduler`, a shared min-heap of pending notifications
//! - The batch job that fills the scheduler from challenge rosters
//! - `Notifier` trait and `Dispatcher` that drains the scheduler into channels

pub mod batch;
pub mod dispatcher;
pub mod log;
pub mod scheduler;
pub mod templating;
pub mod traits;
pub mod urgency;

pub use batch::{generate_notifications, BatchSummary};
pub use dispatcher::Dispatcher;
pub use log::LogNotifier;
pub use scheduler::{GroupedNotifications, NotificationQueue, PriorityScheduler, SchedulerStats};
pub use templating::{MessageTemplates, TemplateRenderer};
pub use traits::{DispatchResult, Notifier, NotifyError};
pub use urgency::{Urgency, UrgencyCalculator};
