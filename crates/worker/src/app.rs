//! Composition root: owns the leaderboards, the scheduler and the urgency
//! calculator for one worker run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use streak_core::streak::advance_streak;
use streak_core::{ChallengeRoster, Config, ParticipantProgress, StreakError};
use streak_leaderboard::{ChallengeOverview, LeaderboardManager, LeaderboardRow, Standing};
use streak_notify::{
    generate_notifications, BatchSummary, DispatchResult, Dispatcher, GroupedNotifications,
    MessageTemplates, NotifyError, PriorityScheduler, SchedulerStats, UrgencyCalculator,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeBoard {
    pub challenge_id: String,
    pub title: String,
    pub participant_count: usize,
    pub rows: Vec<LeaderboardRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub challenge_id: String,
    pub user_id: String,
    pub position: usize,
    pub total_participants: usize,
    pub percentile: u32,
}

impl UserStats {
    fn new(challenge_id: &str, user_id: &str, standing: Standing) -> Self {
        Self {
            challenge_id: challenge_id.to_string(),
            user_id: user_id.to_string(),
            position: standing.position,
            total_participants: standing.total_participants,
            percentile: standing.percentile(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub streak: u32,
    pub restarted: bool,
    #[serde(flatten)]
    pub stats: UserStats,
}

/// Pending notifications after a batch, nothing dispatched.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueReport {
    pub summary: BatchSummary,
    pub stats: SchedulerStats,
    pub grouped: GroupedNotifications,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyReport {
    pub summary: BatchSummary,
    pub dispatched: usize,
    pub failures: usize,
    pub remaining: usize,
}

pub struct App {
    config: Config,
    rosters: Vec<ChallengeRoster>,
    leaderboards: LeaderboardManager,
    scheduler: PriorityScheduler,
    calculator: UrgencyCalculator,
}

impl App {
    pub fn new(config: Config, rosters: Vec<ChallengeRoster>) -> Result<Self, NotifyError> {
        let templates = MessageTemplates::from_config(&config.templates)?;
        let leaderboards = LeaderboardManager::new();
        for roster in &rosters {
            leaderboards.seed(&roster.challenge_id, roster.participants.iter().cloned());
        }
        info!(challenges = leaderboards.challenge_count(), "Leaderboards rebuilt from snapshot");

        Ok(Self {
            config,
            rosters,
            leaderboards,
            scheduler: PriorityScheduler::new(),
            calculator: UrgencyCalculator::with_templates(templates),
        })
    }

    fn roster(&self, challenge_id: &str) -> Result<&ChallengeRoster, StreakError> {
        self.rosters
            .iter()
            .find(|r| r.challenge_id == challenge_id)
            .ok_or_else(|| StreakError::ChallengeNotFound(challenge_id.to_string()))
    }

    pub fn leaderboard(&self, challenge_id: &str, limit: Option<usize>) -> Result<ChallengeBoard, StreakError> {
        let roster = self.roster(challenge_id)?;
        let limit = self.config.leaderboard.resolve_limit(limit);

        Ok(ChallengeBoard {
            challenge_id: roster.challenge_id.clone(),
            title: roster.title.clone(),
            participant_count: self.leaderboards.participant_count(challenge_id).unwrap_or(0),
            rows: self.leaderboards.get_leaderboard(challenge_id, limit),
        })
    }

    pub fn overview(&self, limit: Option<usize>) -> Vec<ChallengeOverview> {
        let limit = match limit {
            Some(_) => self.config.leaderboard.resolve_limit(limit),
            None => self.config.leaderboard.overview_limit,
        };
        self.leaderboards.overview(limit)
    }

    pub fn user_stats(&self, challenge_id: &str, user_id: &str) -> Result<UserStats, StreakError> {
        if !self.leaderboards.has_challenge(challenge_id) {
            return Err(StreakError::ChallengeNotFound(challenge_id.to_string()));
        }
        let standing = self
            .leaderboards
            .get_user_stats(challenge_id, user_id)
            .ok_or_else(|| StreakError::UserNotFound {
                challenge_id: challenge_id.to_string(),
                user_id: user_id.to_string(),
            })?;

        Ok(UserStats::new(challenge_id, user_id, standing))
    }

    /// Log one day of activity on top of the snapshot record and reposition
    /// the user.
    pub fn check_in(&self, challenge_id: &str, user_id: &str, at: DateTime<Utc>) -> Result<CheckIn, StreakError> {
        let participant = self
            .roster(challenge_id)?
            .participants
            .iter()
            .find(|p| p.user_id == user_id)
            .ok_or_else(|| StreakError::UserNotFound {
                challenge_id: challenge_id.to_string(),
                user_id: user_id.to_string(),
            })?;

        let last_day = participant.last_activity.map(|t| t.date_naive());
        let advance = advance_streak(participant.streak, last_day, at.date_naive())?;

        let standing = self.leaderboards.update_user_position(
            challenge_id,
            ParticipantProgress {
                user_id: participant.user_id.clone(),
                display_name: participant.display_name.clone(),
                streak: advance.streak,
                total_active_days: participant.total_active_days.saturating_add(1),
                last_activity: Some(at),
            },
        );
        info!(challenge_id, user_id, streak = advance.streak, restarted = advance.restarted, "Check-in recorded");

        Ok(CheckIn {
            streak: advance.streak,
            restarted: advance.restarted,
            stats: UserStats::new(challenge_id, user_id, standing),
        })
    }

    fn generate(&self, now: DateTime<Utc>) -> BatchSummary {
        generate_notifications(
            &self.calculator,
            &self.scheduler,
            &self.rosters,
            now,
            self.config.scheduler.missing_activity_days,
        )
    }

    /// Score every participant and report the pending queue.
    pub fn queue(&self, now: DateTime<Utc>) -> QueueReport {
        let summary = self.generate(now);
        QueueReport {
            summary,
            stats: self.scheduler.stats(),
            grouped: self.scheduler.grouped(),
        }
    }

    /// Score every participant, then dispatch up to `drain` notifications.
    pub async fn notify(
        &self,
        dispatcher: &Dispatcher,
        drain: Option<usize>,
        now: DateTime<Utc>,
    ) -> NotifyReport {
        let summary = self.generate(now);
        let max = drain.unwrap_or(self.config.scheduler.drain_batch);
        let results: Vec<DispatchResult> = dispatcher.drain(&self.scheduler, max).await;

        let dispatched = summary.queue_size.saturating_sub(self.scheduler.size());
        NotifyReport {
            summary,
            dispatched,
            failures: results.iter().filter(|r| !r.success).count(),
            remaining: self.scheduler.size(),
        }
    }
}
