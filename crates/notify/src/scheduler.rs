//! Urgency-ordered queue of pending notifications.
//!
//! [`NotificationQueue`] is a plain binary min-heap on `priority`; equal
//! priorities leave in insertion order via a per-item sequence number.
//! [`PriorityScheduler`] wraps one queue behind a single mutex so it can
//! be shared by the batch job and the dispatcher.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, warn};

use streak_core::{NotificationCategory, NotificationItem};

#[derive(Debug, Clone)]
struct Pending {
    seq: u64,
    item: NotificationItem,
}

impl Pending {
    #[inline]
    fn order_key(&self) -> (u32, u64) {
        (self.item.priority, self.seq)
    }

    #[inline]
    fn precedes(&self, other: &Pending) -> bool {
        self.order_key() < other.order_key()
    }
}

/// Binary min-heap of notifications, most urgent at the root.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    heap: Vec<Pending>,
    next_seq: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, item: NotificationItem) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Pending { seq, item });

        let mut idx = self.heap.len() - 1;
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if !self.heap[idx].precedes(&self.heap[parent]) {
                break;
            }
            self.heap.swap(idx, parent);
            idx = parent;
        }
    }

    /// Remove and return the most urgent notification.
    pub fn dequeue(&mut self) -> Option<NotificationItem> {
        if self.heap.is_empty() {
            return None;
        }
        let root = self.heap.swap_remove(0);

        let len = self.heap.len();
        let mut idx = 0;
        loop {
            let left = 2 * idx + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smaller = if right < len && self.heap[right].precedes(&self.heap[left]) {
                right
            } else {
                left
            };
            if !self.heap[smaller].precedes(&self.heap[idx]) {
                break;
            }
            self.heap.swap(idx, smaller);
            idx = smaller;
        }
        Some(root.item)
    }

    pub fn peek(&self) -> Option<&NotificationItem> {
        self.heap.first().map(|p| &p.item)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// All pending items in dequeue order. Consumes the (copied) queue.
    pub fn into_sorted_vec(mut self) -> Vec<NotificationItem> {
        self.heap.sort_by_key(Pending::order_key);
        self.heap.into_iter().map(|p| p.item).collect()
    }

    /// Drop every pending item, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let n = self.heap.len();
        self.heap.clear();
        n
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        for i in 1..self.heap.len() {
            let parent = (i - 1) / 2;
            assert!(
                self.heap[parent].item.priority <= self.heap[i].item.priority,
                "min-heap order violated at {i}"
            );
        }
    }
}

/// Pending notifications split by category, each in dequeue order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedNotifications {
    pub emergency: Vec<NotificationItem>,
    pub motivation: Vec<NotificationItem>,
    pub reminder: Vec<NotificationItem>,
    pub encouragement: Vec<NotificationItem>,
}

impl GroupedNotifications {
    pub fn total(&self) -> usize {
        self.emergency.len() + self.motivation.len() + self.reminder.len() + self.encouragement.len()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStats {
    pub queue_size: usize,
    pub is_empty: bool,
    pub next: Option<NotificationItem>,
}

/// Process-wide notification scheduler. Every operation holds one lock.
#[derive(Debug, Default)]
pub struct PriorityScheduler {
    queue: Mutex<NotificationQueue>,
}

impl PriorityScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, item: NotificationItem) {
        let priority = item.priority;
        let recipient = item.recipient.clone();
        let mut queue = self.lock();
        queue.enqueue(item);
        debug!(priority, recipient = %recipient, pending = queue.len(), "Notification enqueued");
    }

    pub fn dequeue(&self) -> Option<NotificationItem> {
        let item = self.lock().dequeue()?;
        debug!(priority = item.priority, recipient = %item.recipient, "Notification dequeued");
        Some(item)
    }

    pub fn peek(&self) -> Option<NotificationItem> {
        self.lock().peek().cloned()
    }

    pub fn size(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Ascending-priority snapshot; the scheduler itself is left as is.
    pub fn get_all_notifications(&self) -> Vec<NotificationItem> {
        let snapshot = self.lock().clone();
        snapshot.into_sorted_vec()
    }

    pub fn grouped(&self) -> GroupedNotifications {
        let mut grouped = GroupedNotifications::default();
        for item in self.get_all_notifications() {
            let bucket = match item.category {
                NotificationCategory::Emergency => &mut grouped.emergency,
                NotificationCategory::Motivation => &mut grouped.motivation,
                NotificationCategory::Reminder => &mut grouped.reminder,
                NotificationCategory::Encouragement => &mut grouped.encouragement,
            };
            bucket.push(item);
        }
        grouped
    }

    pub fn stats(&self) -> SchedulerStats {
        let queue = self.lock();
        SchedulerStats {
            queue_size: queue.len(),
            is_empty: queue.is_empty(),
            next: queue.peek().cloned(),
        }
    }

    pub fn clear(&self) -> usize {
        let cleared = self.lock().clear();
        debug!(cleared, "Notification queue cleared");
        cleared
    }

    // Queue operations never panic part-way through, so a poisoned lock
    // still guards a valid heap.
    fn lock(&self) -> MutexGuard<'_, NotificationQueue> {
        self.queue.lock().unwrap_or_else(|poisoned| {
            warn!("Notification queue lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
