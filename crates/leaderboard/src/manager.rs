//! Per-challenge leaderboards.
//!
//! Each challenge owns its own [`IndexedMaxHeap`] behind its own mutex, so
//! updates to different challenges never contend. The outer map is only
//! locked long enough to look up or create a heap handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use streak_core::{ChallengeId, ParticipantProgress};

use crate::heap::IndexedMaxHeap;
use crate::types::{ChallengeOverview, LeaderboardRow, Standing};

type SharedHeap = Arc<Mutex<IndexedMaxHeap>>;

/// Registry of live leaderboards, one per challenge, created on first use.
#[derive(Debug, Default)]
pub struct LeaderboardManager {
    challenges: RwLock<HashMap<ChallengeId, SharedHeap>>,
}

impl LeaderboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or reposition a participant and report their new standing.
    ///
    /// An unknown challenge gets a fresh, empty leaderboard first.
    pub fn update_user_position(&self, challenge_id: &str, progress: ParticipantProgress) -> Standing {
        let heap = self.heap_or_create(challenge_id);
        let mut heap = lock_heap(&heap, challenge_id);

        let entry = progress.into_rank_entry();
        let user_id = entry.key.clone();
        let streak = entry.rank_value;
        let inserted = heap.upsert(entry);

        let standing = Standing {
            position: heap.position(&user_id).unwrap_or(1),
            total_participants: heap.len(),
        };
        debug!(
            challenge_id,
            user_id = %user_id,
            streak,
            inserted,
            position = standing.position,
            total = standing.total_participants,
            "Leaderboard position updated"
        );
        standing
    }

    /// Top `limit` participants, ranked 1..=n in descending streak order.
    ///
    /// Unknown challenges yield an empty board without creating one.
    pub fn get_leaderboard(&self, challenge_id: &str, limit: usize) -> Vec<LeaderboardRow> {
        match self.heap(challenge_id) {
            Some(heap) => rank_rows(snapshot(&heap, challenge_id), limit),
            None => Vec::new(),
        }
    }

    /// Position and participant count, or `None` if the user has no entry.
    pub fn get_user_stats(&self, challenge_id: &str, user_id: &str) -> Option<Standing> {
        let heap = self.heap(challenge_id)?;
        let heap = lock_heap(&heap, challenge_id);
        let position = heap.position(&user_id.to_string())?;
        Some(Standing {
            position,
            total_participants: heap.len(),
        })
    }

    /// Drop a challenge's leaderboard. Returns `true` if one existed.
    pub fn remove_challenge(&self, challenge_id: &str) -> bool {
        let removed = write_map(&self.challenges).remove(challenge_id).is_some();
        if removed {
            info!(challenge_id, "Leaderboard removed");
        }
        removed
    }

    /// Bulk-load participants, e.g. when rebuilding from storage after a
    /// restart. Returns the number of participants applied.
    pub fn seed<I>(&self, challenge_id: &str, participants: I) -> usize
    where
        I: IntoIterator<Item = ParticipantProgress>,
    {
        let heap = self.heap_or_create(challenge_id);
        let mut heap = lock_heap(&heap, challenge_id);
        let mut applied = 0;
        for progress in participants {
            heap.upsert(progress.into_rank_entry());
            applied += 1;
        }
        info!(challenge_id, applied, total = heap.len(), "Leaderboard seeded");
        applied
    }

    /// Top performers of every known challenge, ordered by challenge id.
    pub fn overview(&self, limit: usize) -> Vec<ChallengeOverview> {
        let mut handles: Vec<(ChallengeId, SharedHeap)> = read_map(&self.challenges)
            .iter()
            .map(|(id, heap)| (id.clone(), Arc::clone(heap)))
            .collect();
        handles.sort_by(|a, b| a.0.cmp(&b.0));

        handles
            .into_iter()
            .map(|(challenge_id, heap)| {
                let snapshot = snapshot(&heap, &challenge_id);
                let participant_count = snapshot.len();
                let top_performers = rank_rows(snapshot, limit);
                ChallengeOverview {
                    challenge_id,
                    participant_count,
                    top_performers,
                }
            })
            .collect()
    }

    /// Entries in a challenge's leaderboard, `None` if it has none.
    pub fn participant_count(&self, challenge_id: &str) -> Option<usize> {
        let heap = self.heap(challenge_id)?;
        let count = lock_heap(&heap, challenge_id).len();
        Some(count)
    }

    pub fn has_challenge(&self, challenge_id: &str) -> bool {
        read_map(&self.challenges).contains_key(challenge_id)
    }

    pub fn challenge_count(&self) -> usize {
        read_map(&self.challenges).len()
    }

    fn heap(&self, challenge_id: &str) -> Option<SharedHeap> {
        read_map(&self.challenges).get(challenge_id).cloned()
    }

    fn heap_or_create(&self, challenge_id: &str) -> SharedHeap {
        if let Some(heap) = self.heap(challenge_id) {
            return heap;
        }

        let mut map = write_map(&self.challenges);
        let heap = map.entry(challenge_id.to_string()).or_insert_with(|| {
            info!(challenge_id, "Leaderboard created");
            Arc::new(Mutex::new(IndexedMaxHeap::new()))
        });
        Arc::clone(heap)
    }
}

/// Copy a heap while holding its lock; ranking then runs on the copy.
fn snapshot(heap: &Mutex<IndexedMaxHeap>, challenge_id: &str) -> IndexedMaxHeap {
    lock_heap(heap, challenge_id).clone()
}

fn rank_rows(snapshot: IndexedMaxHeap, limit: usize) -> Vec<LeaderboardRow> {
    snapshot
        .into_top_n(limit)
        .enumerate()
        .map(|(i, entry)| LeaderboardRow::from_entry(i + 1, entry))
        .collect()
}

// Heap operations never panic part-way through a mutation, so a poisoned
// lock still guards a consistent heap.
fn lock_heap<'a>(heap: &'a Mutex<IndexedMaxHeap>, challenge_id: &str) -> MutexGuard<'a, IndexedMaxHeap> {
    heap.lock().unwrap_or_else(|poisoned| {
        warn!(challenge_id, "Leaderboard lock poisoned, recovering");
        poisoned.into_inner()
    })
}

fn read_map<T>(map: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    map.read().unwrap_or_else(|poisoned| {
        warn!("Leaderboard registry lock poisoned, recovering");
        poisoned.into_inner()
    })
}

fn write_map<T>(map: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    map.write().unwrap_or_else(|poisoned| {
        warn!("Leaderboard registry lock poisoned, recovering");
        poisoned.into_inner()
    })
}
