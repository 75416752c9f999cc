//! Live per-challenge streak leaderboards.
//!
//! This crate provides:
//! - `IndexedMaxHeap`: a max-heap with a key → slot index for in-place updates
//! - `LeaderboardManager`: one heap per challenge, each behind its own lock
//! - Ranking views (`Standing`, `LeaderboardRow`, `ChallengeOverview`)

pub mod heap;
pub mod manager;
pub mod types;

pub use heap::{IndexedMaxHeap, TopN};
pub use manager::LeaderboardManager;
pub use types::{ChallengeOverview, LeaderboardRow, Standing};
