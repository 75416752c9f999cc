//! Parallel producers and consumers against one shared `PriorityScheduler`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use streak_core::{NotificationCategory, NotificationItem};
use streak_notify::PriorityScheduler;

const PRODUCERS: u32 = 4;
const PER_PRODUCER: u32 = 250;

fn item(recipient: String, priority: u32) -> NotificationItem {
    NotificationItem {
        recipient,
        priority,
        message: String::new(),
        category: NotificationCategory::Reminder,
        source_streak: 0,
        days_since_activity: 0,
        challenge_title: "c".to_string(),
        created_at: Utc::now(),
    }
}

fn spawn_producers(scheduler: &Arc<PriorityScheduler>) -> Vec<thread::JoinHandle<()>> {
    (0..PRODUCERS)
        .map(|t| {
            let scheduler = Arc::clone(scheduler);
            thread::spawn(move || {
                let mut seed = 0x9e37_79b9_u64 + u64::from(t);
                for n in 0..PER_PRODUCER {
                    seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    let priority = ((seed >> 33) % 19) as u32;
                    scheduler.enqueue(item(format!("p{t}-{n}"), priority));
                }
            })
        })
        .collect()
}

#[test]
fn nothing_lost_or_duplicated_under_contention() {
    let scheduler = Arc::new(PriorityScheduler::new());
    let producing = Arc::new(AtomicBool::new(true));

    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let scheduler = Arc::clone(&scheduler);
            let producing = Arc::clone(&producing);
            thread::spawn(move || {
                let mut taken = Vec::new();
                while producing.load(Ordering::SeqCst) {
                    if let Some(n) = scheduler.dequeue() {
                        taken.push(n.recipient);
                    }
                }
                taken
            })
        })
        .collect();

    let reader = {
        let scheduler = Arc::clone(&scheduler);
        let producing = Arc::clone(&producing);
        thread::spawn(move || {
            while producing.load(Ordering::SeqCst) {
                let all = scheduler.get_all_notifications();
                assert!(all.windows(2).all(|w| w[0].priority <= w[1].priority));
            }
        })
    };

    for handle in spawn_producers(&scheduler) {
        handle.join().unwrap();
    }
    producing.store(false, Ordering::SeqCst);
    reader.join().unwrap();

    let mut seen = HashSet::new();
    let mut total = 0;
    for consumer in consumers {
        for recipient in consumer.join().unwrap() {
            assert!(seen.insert(recipient), "notification dequeued twice");
            total += 1;
        }
    }
    for n in scheduler.get_all_notifications() {
        assert!(seen.insert(n.recipient), "dequeued notification still pending");
        total += 1;
    }
    assert_eq!(total, (PRODUCERS * PER_PRODUCER) as usize);
}

#[test]
fn consumers_see_non_decreasing_priorities_after_producers_finish() {
    let scheduler = Arc::new(PriorityScheduler::new());
    for handle in spawn_producers(&scheduler) {
        handle.join().unwrap();
    }
    assert_eq!(scheduler.size(), (PRODUCERS * PER_PRODUCER) as usize);

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let scheduler = Arc::clone(&scheduler);
            thread::spawn(move || std::iter::from_fn(|| scheduler.dequeue()).map(|n| n.priority).collect::<Vec<_>>())
        })
        .collect();

    let mut total = 0;
    for consumer in consumers {
        let priorities = consumer.join().unwrap();
        assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
        total += priorities.len();
    }
    assert_eq!(total, (PRODUCERS * PER_PRODUCER) as usize);
    assert!(scheduler.is_empty());
}
