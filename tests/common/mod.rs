//! Shared test utilities for rewards integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use guru_rewards::rewards::{ProgressStore, ProgressUpdate};
use guru_rewards::{RewardConfig, RewardsDb, RewardsManager};

/// A Tuesday in the middle of September
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 10, 9, 0, 0).unwrap()
}

/// Creates a manager over a throwaway SQLite file.
///
/// Keep the `TempDir` alive for as long as the manager is used.
pub fn temp_manager() -> (TempDir, RewardsManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db = RewardsDb::open(&temp_dir.path().join("rewards.db")).expect("Failed to open db");
    (temp_dir, RewardsManager::new(db, RewardConfig::default()))
}

/// Creates a user and overwrites their counters
pub fn seed_user(
    manager: &RewardsManager,
    user_id: &str,
    total_points: u64,
    weekly_points: u64,
    streak: u32,
    last_active_date: Option<DateTime<Utc>>,
) {
    manager.ensure_user(user_id).expect("Failed to create user");
    manager
        .store()
        .update_progress(
            user_id,
            &ProgressUpdate {
                total_points: Some(total_points),
                weekly_points: Some(weekly_points),
                streak: Some(streak),
                last_active_date,
            },
        )
        .expect("Failed to seed progress");
}
