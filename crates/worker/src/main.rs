mod app;
mod cli;
mod snapshot;

use anyhow::{Context, Result};
use chrono::{NaiveTime, TimeZone, Utc};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use streak_core::config::{self, Config};
use streak_notify::{Dispatcher, LogNotifier};

use crate::app::App;
use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = Config::from_env();
    config.log_summary();

    let rosters = snapshot::load_snapshot(&args.snapshot)
        .with_context(|| format!("failed to load snapshot {}", args.snapshot.display()))?;
    info!(
        path = %args.snapshot.display(),
        challenges = rosters.len(),
        participants = rosters.iter().map(|r| r.participants.len()).sum::<usize>(),
        "Snapshot loaded"
    );

    let app = App::new(config, rosters).context("invalid message template override")?;

    match args.command {
        Command::Leaderboard { challenge: Some(id), limit } => print_json(&app.leaderboard(&id, limit)?),
        Command::Leaderboard { challenge: None, limit } => print_json(&app.overview(limit)),
        Command::Stats { challenge, user } => print_json(&app.user_stats(&challenge, &user)?),
        Command::CheckIn { challenge, user, date } => {
            let at = date
                .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::default())))
                .unwrap_or_else(Utc::now);
            print_json(&app.check_in(&challenge, &user, at)?)
        }
        Command::Queue => print_json(&app.queue(Utc::now())),
        Command::Notify { drain } => {
            let dispatcher = Dispatcher::new(vec![Box::new(LogNotifier::new())]);
            let report = app.notify(&dispatcher, drain, Utc::now()).await;
            print_json(&report)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
