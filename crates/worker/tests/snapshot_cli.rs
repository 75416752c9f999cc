//! Runs the built worker binary against snapshot files on disk.

use std::io::Write;
use std::process::Command;

fn snapshot_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn worker(snapshot: &std::path::Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_streak-worker"))
        .arg("--snapshot")
        .arg(snapshot)
        .args(args)
        .env("RUST_LOG", "warn")
        .env_remove("STREAK_PROFILE")
        .output()
        .unwrap()
}

const SNAPSHOT: &str = r#"{
  "challenges": [
    {
      "challengeId": "run",
      "title": "Run Daily",
      "participants": [
        {"userId": "ada", "displayName": "Ada", "streak": 12, "lastActivity": "2026-03-10T08:00:00Z"},
        {"userId": "bob", "displayName": "Bob", "streak": 3},
        {"userId": "cy", "streak": 7, "totalActiveDays": 20}
      ]
    }
  ]
}"#;

#[test]
fn leaderboard_prints_ranked_rows() {
    let file = snapshot_file(SNAPSHOT);
    let out = worker(file.path(), &["leaderboard", "--challenge", "run", "--limit", "2"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let board: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(board["participantCount"], 3);
    let rows = board["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["userId"], "ada");
    assert_eq!(rows[1]["userId"], "cy");
    assert_eq!(rows[1]["displayName"], "Unknown User");
}

#[test]
fn stats_for_unknown_user_exits_non_zero() {
    let file = snapshot_file(SNAPSHOT);
    let out = worker(file.path(), &["stats", "--challenge", "run", "--user", "zed"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn stats_reports_percentile() {
    let file = snapshot_file(SNAPSHOT);
    let out = worker(file.path(), &["stats", "--challenge", "run", "--user", "bob"]);
    assert!(out.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(stats["position"], 3);
    assert_eq!(stats["totalParticipants"], 3);
    assert_eq!(stats["percentile"], 33);
}

#[test]
fn negative_streak_is_rejected() {
    let file = snapshot_file(
        r#"{"challenges":[{"challengeId":"c","title":"t","participants":[{"userId":"u","streak":-1}]}]}"#,
    );
    let out = worker(file.path(), &["leaderboard"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("out of range"));
}

#[test]
fn notify_drains_requested_count() {
    let file = snapshot_file(SNAPSHOT);
    let out = worker(file.path(), &["notify", "--drain", "1"]);
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["summary"]["totalNotifications"], 3);
    assert_eq!(report["dispatched"], 1);
    assert_eq!(report["remaining"], 2);
}

#[test]
fn check_in_on_next_day_extends_streak() {
    let file = snapshot_file(SNAPSHOT);
    let out = worker(
        file.path(),
        &["check-in", "--challenge", "run", "--user", "ada", "--date", "2026-03-11"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let check_in: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(check_in["streak"], 13);
    assert_eq!(check_in["restarted"], false);
    assert_eq!(check_in["position"], 1);
    assert_eq!(check_in["totalParticipants"], 3);
}

#[test]
fn check_in_on_same_day_exits_non_zero() {
    let file = snapshot_file(SNAPSHOT);
    let out = worker(
        file.path(),
        &["check-in", "--challenge", "run", "--user", "ada", "--date", "2026-03-10"],
    );
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("already logged"));
}

#[test]
fn queue_lists_pending_without_dispatching() {
    let file = snapshot_file(SNAPSHOT);
    let out = worker(file.path(), &["queue"]);
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["stats"]["queueSize"], 3);
    let grouped = &report["grouped"];
    let total: usize = ["emergency", "motivation", "reminder", "encouragement"]
        .iter()
        .map(|k| grouped[*k].as_array().unwrap().len())
        .sum();
    assert_eq!(total, 3);
}
