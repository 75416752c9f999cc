//! Array-backed max-heap with a key → index side table.
//!
//! The side table makes `insert_or_update` O(log n) for keys that are
//! already present: the entry is rewritten where it sits and sifted in
//! whichever direction its value moved. Every swap goes through
//! [`IndexedMaxHeap::swap`], which rewrites both array slots and both
//! index entries together, so no public method can leave them out of step.

use std::collections::HashMap;
use std::hash::Hash;

use streak_core::{ActivityDetails, RankEntry, UserId};

#[derive(Debug, Clone)]
pub struct IndexedMaxHeap<K = UserId> {
    heap: Vec<RankEntry<K>>,
    index: HashMap<K, usize>,
}

impl<K> Default for IndexedMaxHeap<K> {
    fn default() -> Self {
        Self {
            heap: Vec::new(),
            index: HashMap::new(),
        }
    }
}

#[inline]
fn parent_of(i: usize) -> usize {
    (i - 1) / 2
}

#[inline]
fn left_of(i: usize) -> usize {
    2 * i + 1
}

impl<K: Eq + Hash + Clone> IndexedMaxHeap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert `key`, or overwrite its value and details in place.
    ///
    /// Returns `true` if the key was new.
    pub fn insert_or_update(
        &mut self,
        key: K,
        display_name: impl Into<String>,
        rank_value: u32,
        details: ActivityDetails,
    ) -> bool {
        let display_name = display_name.into();

        if let Some(&idx) = self.index.get(&key) {
            let slot = &mut self.heap[idx];
            let old_value = slot.rank_value;
            slot.display_name = display_name;
            slot.rank_value = rank_value;
            slot.details = details;

            if rank_value > old_value {
                self.sift_up(idx);
            } else if rank_value < old_value {
                self.sift_down(idx);
            }
            return false;
        }

        let idx = self.heap.len();
        self.index.insert(key.clone(), idx);
        self.heap.push(RankEntry {
            key,
            display_name,
            rank_value,
            details,
        });
        self.sift_up(idx);
        true
    }

    /// Same as [`insert_or_update`](Self::insert_or_update) for a prebuilt entry.
    pub fn upsert(&mut self, entry: RankEntry<K>) -> bool {
        let RankEntry {
            key,
            display_name,
            rank_value,
            details,
        } = entry;
        self.insert_or_update(key, display_name, rank_value, details)
    }

    /// Remove and return the entry with the largest rank value.
    pub fn extract_max(&mut self) -> Option<RankEntry<K>> {
        if self.heap.is_empty() {
            return None;
        }

        let max = self.heap.swap_remove(0);
        self.index.remove(&max.key);

        if let Some(moved) = self.heap.first() {
            self.index.insert(moved.key.clone(), 0);
            self.sift_down(0);
        }
        Some(max)
    }

    pub fn peek_max(&self) -> Option<&RankEntry<K>> {
        self.heap.first()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&RankEntry<K>> {
        self.index.get(key).map(|&idx| &self.heap[idx])
    }

    /// 1-based position of `key` under dense tie handling: one plus the
    /// number of entries with a strictly greater rank value. Tied entries
    /// share a position and the following position skips past them.
    ///
    /// Full scan, O(n).
    pub fn position(&self, key: &K) -> Option<usize> {
        let value = self.get(key)?.rank_value;
        let ahead = self.heap.iter().filter(|e| e.rank_value > value).count();
        Some(ahead + 1)
    }

    /// Largest `n` entries in descending rank order, drawn from a private
    /// copy so the live heap is untouched.
    ///
    /// Equal rank values come out in extraction order, which depends on the
    /// heap layout and is not insertion order in general.
    pub fn top_n(&self, n: usize) -> TopN<K> {
        self.clone().into_top_n(n)
    }

    /// Like [`top_n`](Self::top_n) but consumes an already-taken snapshot.
    pub fn into_top_n(self, n: usize) -> TopN<K> {
        let remaining = n.min(self.len());
        TopN {
            heap: self,
            remaining,
        }
    }

    /// Entries in heap-array order.
    pub fn entries(&self) -> &[RankEntry<K>] {
        &self.heap
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        if let Some(slot) = self.index.get_mut(&self.heap[a].key) {
            *slot = a;
        }
        if let Some(slot) = self.index.get_mut(&self.heap[b].key) {
            *slot = b;
        }
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = parent_of(idx);
            if self.heap[idx].rank_value <= self.heap[parent].rank_value {
                break;
            }
            self.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = left_of(idx);
            if left >= len {
                break;
            }
            let right = left + 1;

            let mut largest = idx;
            if self.heap[left].rank_value > self.heap[largest].rank_value {
                largest = left;
            }
            if right < len && self.heap[right].rank_value > self.heap[largest].rank_value {
                largest = right;
            }
            if largest == idx {
                break;
            }
            self.swap(idx, largest);
            idx = largest;
        }
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert_eq!(self.heap.len(), self.index.len(), "index size drifted");
        for (i, entry) in self.heap.iter().enumerate() {
            assert_eq!(self.index.get(&entry.key), Some(&i), "index out of step at {i}");
            if i > 0 {
                assert!(
                    self.heap[parent_of(i)].rank_value >= entry.rank_value,
                    "max-heap order violated at {i}"
                );
            }
        }
    }
}

/// Draining iterator over a private heap copy, largest first.
///
/// Single pass: once consumed, take a fresh one with
/// [`IndexedMaxHeap::top_n`].
#[derive(Debug)]
pub struct TopN<K = UserId> {
    heap: IndexedMaxHeap<K>,
    remaining: usize,
}

impl<K: Eq + Hash + Clone> Iterator for TopN<K> {
    type Item = RankEntry<K>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.heap.extract_max()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Eq + Hash + Clone> ExactSizeIterator for TopN<K> {}
