//! Progress and rewards tracking
//!
//! Turns learning activity into points, streaks, weekly/monthly bonuses and
//! badges, persisted in a SQLite database (`~/.guru/rewards.db`).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │  pure rules     │     │  ProgressStore  │
//! │ (achievements)  │     │   (RewardsDb)   │
//! └────────┬────────┘     └────────┬────────┘
//!          │                       │
//!          └───────────┬───────────┘
//!                      ▼
//!               RewardsManager
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let manager = RewardsManager::new(RewardsDb::open_default()?, RewardConfig::default());
//!
//! let event = RewardEvent::new(ActivityKind::LessonComplete, &manager.config().points, Utc::now());
//! if let Some(outcome) = manager.record_activity("user-1", &event) {
//!     println!("+{} points", outcome.earned_points);
//! }
//! ```

pub mod achievements;
mod db;
mod models;
mod store;
pub mod time_bucket;

pub use achievements::{
    ActivityOutcome, BADGES, Badge, BadgeId, Cadence, GamificationEvent, NextMilestone,
    ProgressSummary, RewardsManager, ThresholdReward,
};
pub use db::RewardsDb;
pub use models::{
    ActivityKind, LeaderboardEntry, LedgerEntry, PointSource, ProgressUpdate, RewardEvent,
    UserProgress,
};
pub use store::{ProgressStore, StoreError, StoreResult};
