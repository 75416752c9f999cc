//! Parallel writers against a shared `LeaderboardManager`.

use std::sync::Arc;
use std::thread;

use streak_core::ParticipantProgress;
use streak_leaderboard::LeaderboardManager;

fn progress(user: String, streak: u32) -> ParticipantProgress {
    ParticipantProgress {
        display_name: user.clone(),
        user_id: user,
        streak,
        total_active_days: streak,
        last_activity: None,
    }
}

#[test]
fn parallel_updates_across_challenges() {
    let manager = Arc::new(LeaderboardManager::new());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let challenge = format!("challenge-{}", t % 4);
                for round in 0..50u32 {
                    for user in 0..20u32 {
                        let streak = (user * 7 + round + t) % 31;
                        manager.update_user_position(&challenge, progress(format!("user-{user}"), streak));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(manager.challenge_count(), 4);
    for c in 0..4 {
        let challenge = format!("challenge-{c}");
        let board = manager.get_leaderboard(&challenge, 100);
        assert_eq!(board.len(), 20, "every user appears exactly once");

        let ranks: Vec<_> = board.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=20).collect::<Vec<_>>());
        assert!(board.windows(2).all(|w| w[0].streak >= w[1].streak));

        for row in &board {
            let stats = manager.get_user_stats(&challenge, &row.user_id).unwrap();
            let ahead = board.iter().filter(|r| r.streak > row.streak).count();
            assert_eq!(stats.position, ahead + 1);
            assert_eq!(stats.total_participants, 20);
        }
    }
}

#[test]
fn readers_see_consistent_snapshots_while_writers_run() {
    let manager = Arc::new(LeaderboardManager::new());
    manager.seed("c", (0..32).map(|u| progress(format!("user-{u}"), u)));

    let writer = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || {
            for round in 0..200u32 {
                let user = round % 32;
                manager.update_user_position("c", progress(format!("user-{user}"), (round * 13) % 97));
            }
        })
    };

    for _ in 0..200 {
        let board = manager.get_leaderboard("c", 10);
        assert_eq!(board.len(), 10);
        assert!(board.windows(2).all(|w| w[0].streak >= w[1].streak));
    }

    writer.join().unwrap();
    assert_eq!(manager.get_leaderboard("c", 100).len(), 32);
}
