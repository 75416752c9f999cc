use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Streak worker. Rebuilds challenge leaderboards from a participant
/// snapshot and schedules engagement notifications.
#[derive(Parser, Debug)]
#[command(name = "streak-worker", version, about)]
pub struct CliArgs {
    /// Participant snapshot exported from storage (JSON).
    #[arg(long, env = "STREAK_SNAPSHOT", default_value = "data/snapshot.json")]
    pub snapshot: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one challenge's leaderboard, or the top performers of all challenges.
    Leaderboard {
        /// Challenge to show. Omit for the cross-challenge overview.
        #[arg(long)]
        challenge: Option<String>,

        /// Rows to show (clamped to LEADERBOARD_MAX_LIMIT).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print a user's position within a challenge.
    Stats {
        #[arg(long)]
        challenge: String,

        #[arg(long)]
        user: String,
    },

    /// Log a day of activity for a user and print their new standing.
    CheckIn {
        #[arg(long)]
        challenge: String,

        #[arg(long)]
        user: String,

        /// Day of the check-in (YYYY-MM-DD). Defaults to today (UTC).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Generate notifications and print the pending queue without dispatching.
    Queue,

    /// Generate notifications for every participant and dispatch them in urgency order.
    Notify {
        /// Max notifications to dispatch (defaults to SCHEDULER_DRAIN_BATCH).
        #[arg(long)]
        drain: Option<usize>,
    },
}
