//! Participant snapshot exported by the storage layer.
//!
//! Numbers arrive as signed JSON integers; anything negative or too large
//! is rejected here so the leaderboard and urgency code only ever see
//! valid streak counts.
//!
//! A challenge id may appear only once. A user listed twice in one
//! challenge keeps their last record.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use streak_core::{ChallengeRoster, ParticipantProgress, StreakError};

const UNKNOWN_USER: &str = "Unknown User";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    challenges: Vec<RawChallenge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChallenge {
    challenge_id: String,
    title: String,
    #[serde(default)]
    participants: Vec<RawParticipant>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParticipant {
    user_id: String,
    display_name: Option<String>,
    #[serde(default)]
    streak: i64,
    total_active_days: Option<i64>,
    last_activity: Option<DateTime<Utc>>,
}

fn count(field: &str, user_id: &str, value: i64) -> Result<u32, StreakError> {
    u32::try_from(value).map_err(|_| {
        StreakError::InvalidInput(format!("{field} for user {user_id} out of range: {value}"))
    })
}

impl RawParticipant {
    fn validate(self) -> Result<ParticipantProgress, StreakError> {
        if self.user_id.trim().is_empty() {
            return Err(StreakError::InvalidInput("participant without userId".to_string()));
        }
        let streak = count("streak", &self.user_id, self.streak)?;
        // storage only tracks the streak for older records
        let total_active_days = match self.total_active_days {
            Some(days) => count("totalActiveDays", &self.user_id, days)?,
            None => streak,
        };
        Ok(ParticipantProgress {
            display_name: self.display_name.unwrap_or_else(|| UNKNOWN_USER.to_string()),
            user_id: self.user_id,
            streak,
            total_active_days,
            last_activity: self.last_activity,
        })
    }
}

impl RawChallenge {
    fn validate(self) -> Result<ChallengeRoster, StreakError> {
        let mut participants: Vec<ParticipantProgress> = Vec::with_capacity(self.participants.len());
        let mut slots: HashMap<String, usize> = HashMap::new();

        for raw in self.participants {
            let progress = raw.validate()?;
            match slots.get(&progress.user_id) {
                Some(&slot) => {
                    warn!(
                        challenge_id = %self.challenge_id,
                        user_id = %progress.user_id,
                        "Duplicate participant in snapshot, keeping last record"
                    );
                    participants[slot] = progress;
                }
                None => {
                    slots.insert(progress.user_id.clone(), participants.len());
                    participants.push(progress);
                }
            }
        }

        Ok(ChallengeRoster {
            challenge_id: self.challenge_id,
            title: self.title,
            participants,
        })
    }
}

pub fn parse_snapshot(json: &str) -> Result<Vec<ChallengeRoster>, StreakError> {
    let raw: RawSnapshot = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    raw.challenges
        .into_iter()
        .map(|c| {
            if !seen.insert(c.challenge_id.clone()) {
                return Err(StreakError::InvalidInput(format!(
                    "challenge {} listed more than once",
                    c.challenge_id
                )));
            }
            c.validate()
        })
        .collect()
}

pub fn load_snapshot(path: &Path) -> Result<Vec<ChallengeRoster>, StreakError> {
    let json = std::fs::read_to_string(path)?;
    parse_snapshot(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record() {
        let rosters = parse_snapshot(
            r#"{"challenges":[{"challengeId":"c1","title":"Run","participants":[
                {"userId":"u1","displayName":"Ada","streak":5,"totalActiveDays":9,
                 "lastActivity":"2026-03-09T00:00:00Z"}]}]}"#,
        )
        .unwrap();
        assert_eq!(rosters.len(), 1);
        let p = &rosters[0].participants[0];
        assert_eq!(p.display_name, "Ada");
        assert_eq!(p.streak, 5);
        assert_eq!(p.total_active_days, 9);
        assert!(p.last_activity.is_some());
    }

    #[test]
    fn fills_defaults() {
        let rosters = parse_snapshot(
            r#"{"challenges":[{"challengeId":"c1","title":"Run","participants":[{"userId":"u1","streak":3}]}]}"#,
        )
        .unwrap();
        let p = &rosters[0].participants[0];
        assert_eq!(p.display_name, UNKNOWN_USER);
        assert_eq!(p.total_active_days, 3);
        assert!(p.last_activity.is_none());
    }

    #[test]
    fn rejects_negative_streak() {
        let err = parse_snapshot(
            r#"{"challenges":[{"challengeId":"c1","title":"Run","participants":[{"userId":"u1","streak":-2}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StreakError::InvalidInput(msg) if msg.contains("streak")));
    }

    #[test]
    fn rejects_blank_user() {
        let err = parse_snapshot(
            r#"{"challenges":[{"challengeId":"c1","title":"Run","participants":[{"userId":" ","streak":1}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StreakError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_user_keeps_last_record() {
        let rosters = parse_snapshot(
            r#"{"challenges":[{"challengeId":"c1","title":"Run","participants":[
                {"userId":"u","streak":3},{"userId":"v","streak":1},{"userId":"u","streak":5}]}]}"#,
        )
        .unwrap();
        let users: Vec<_> = rosters[0]
            .participants
            .iter()
            .map(|p| (p.user_id.as_str(), p.streak))
            .collect();
        assert_eq!(users, vec![("u", 5), ("v", 1)]);
    }

    #[test]
    fn duplicate_challenge_is_rejected() {
        let err = parse_snapshot(
            r#"{"challenges":[{"challengeId":"c1","title":"Run"},{"challengeId":"c1","title":"Again"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StreakError::InvalidInput(msg) if msg.contains("c1")));
    }

    #[test]
    fn malformed_json_is_a_serialize_error() {
        assert!(matches!(parse_snapshot("{not json"), Err(StreakError::Serialize(_))));
    }

    #[test]
    fn empty_snapshot() {
        assert!(parse_snapshot("{}").unwrap().is_empty());
    }
}
