use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub leaderboard: LeaderboardConfig,
    pub scheduler: SchedulerConfig,
    pub templates: TemplateConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `STREAK_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("STREAK_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            leaderboard: LeaderboardConfig::from_env_profiled(p),
            scheduler: SchedulerConfig::from_env_profiled(p),
            templates: TemplateConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  leaderboard: default_limit={}, max_limit={}, overview_limit={}",
            self.leaderboard.default_limit,
            self.leaderboard.max_limit,
            self.leaderboard.overview_limit
        );
        tracing::info!(
            "  scheduler:   drain_batch={}, missing_activity_days={}",
            self.scheduler.drain_batch,
            self.scheduler.missing_activity_days
        );
        tracing::info!("  templates:   overrides={}", self.templates.override_count());
    }

    /// Return a view safe for API responses. Template bodies are omitted.
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "leaderboard": self.leaderboard,
            "scheduler": self.scheduler,
            "templates": { "overrides": self.templates.override_count() },
        })
    }
}

// ── Leaderboard ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Rows returned when the caller gives no limit.
    pub default_limit: usize,
    /// Upper bound applied to caller-supplied limits.
    pub max_limit: usize,
    /// Rows per challenge in the cross-challenge overview.
    pub overview_limit: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
            overview_limit: 3,
        }
    }
}

impl LeaderboardConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            default_limit: profiled_env_usize(p, "LEADERBOARD_DEFAULT_LIMIT", d.default_limit),
            max_limit: profiled_env_usize(p, "LEADERBOARD_MAX_LIMIT", d.max_limit),
            overview_limit: profiled_env_usize(p, "LEADERBOARD_OVERVIEW_LIMIT", d.overview_limit),
        }
    }

    /// Resolve a requested limit: `None` means the default, anything above
    /// `max_limit` is clamped.
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

// ── Notification scheduler ────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Max notifications handed to the notifier per drain call.
    pub drain_batch: usize,
    /// Days-since-activity assumed for participants with no activity yet.
    pub missing_activity_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            drain_batch: 50,
            missing_activity_days: 1,
        }
    }
}

impl SchedulerConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            drain_batch: profiled_env_usize(p, "SCHEDULER_DRAIN_BATCH", d.drain_batch),
            missing_activity_days: profiled_env_u32(
                p,
                "SCHEDULER_MISSING_ACTIVITY_DAYS",
                d.missing_activity_days,
            ),
        }
    }
}

// ── Message templates ─────────────────────────────────────────

/// Optional per-category overrides for notification message templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub emergency: Option<String>,
    pub motivation: Option<String>,
    pub reminder: Option<String>,
    pub encouragement: Option<String>,
}

impl TemplateConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            emergency: profiled_env_opt(p, "TEMPLATE_EMERGENCY"),
            motivation: profiled_env_opt(p, "TEMPLATE_MOTIVATION"),
            reminder: profiled_env_opt(p, "TEMPLATE_REMINDER"),
            encouragement: profiled_env_opt(p, "TEMPLATE_ENCOURAGEMENT"),
        }
    }

    pub fn override_count(&self) -> usize {
        [&self.emergency, &self.motivation, &self.reminder, &self.encouragement]
            .iter()
            .filter(|t| t.is_some())
            .count()
    }
}
