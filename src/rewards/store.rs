//! Storage contract for progress, badges and the points ledger
//!
//! The rewards engine never talks to a database directly. It goes through
//! [`ProgressStore`], which [`RewardsDb`](super::RewardsDb) implements on SQLite.

use chrono::{DateTime, Utc};

use super::models::{LeaderboardEntry, LedgerEntry, PointSource, ProgressUpdate, UserProgress};

/// Errors raised by a progress store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("No progress record for user: {0}")]
    UserNotFound(String),

    #[error("No flashcard with id: {0}")]
    CardNotFound(String),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Corrupt stored value: {0}")]
    Corrupt(String),

    #[error("Failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read/write access to per-user progress
pub trait ProgressStore {
    /// Read a user's progress record, badges included
    fn load_progress(&self, user_id: &str) -> StoreResult<UserProgress>;

    /// Create a zeroed record. Returns the existing record if there is one.
    fn create_progress(&self, user_id: &str) -> StoreResult<UserProgress>;

    /// Write only the fields set in `update`
    fn update_progress(&self, user_id: &str, update: &ProgressUpdate) -> StoreResult<()>;

    /// Append badge ids to the user's collection. Ids already held are ignored.
    fn append_badges(&self, user_id: &str, badge_ids: &[&str], at: DateTime<Utc>)
    -> StoreResult<()>;

    /// Append one credit to the points ledger
    fn record_points(&self, entry: &LedgerEntry) -> StoreResult<()>;

    /// Sum of activity (non-bonus) credits in `[start, end)`
    fn activity_points_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<u64>;

    /// Whether a bonus of the given source was already credited in `[start, end)`
    fn bonus_paid_between(
        &self,
        user_id: &str,
        source: PointSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Users ordered by total points, highest first
    fn leaderboard(&self, limit: usize) -> StoreResult<Vec<LeaderboardEntry>>;
}
