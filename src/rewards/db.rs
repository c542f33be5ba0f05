//! SQLite database connection and schema management for rewards
//!
//! Manages the `~/.guru/rewards.db` database: progress records, the badge
//! collection, the append-only points ledger and scheduled flashcards.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::models::{LeaderboardEntry, LedgerEntry, PointSource, ProgressUpdate, UserProgress};
use super::store::{ProgressStore, StoreError, StoreResult};
use crate::config::RewardConfig;
use crate::flashcards::Flashcard;

const SCHEMA_VERSION: i32 = 1;

/// Database wrapper shared between the manager and the CLI
#[derive(Clone)]
pub struct RewardsDb {
    conn: Arc<Mutex<Connection>>,
}

impl RewardsDb {
    /// Open or create the rewards database at the default location (~/.guru/rewards.db)
    pub fn open_default() -> StoreResult<Self> {
        let db_path = RewardConfig::global_dir().join("rewards.db");
        Self::open(&db_path)
    }

    /// Open or create the rewards database at a specific path
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::from_connection(conn)
    }

    /// In-memory database, used by tests and dry runs
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);
        if version < SCHEMA_VERSION {
            conn.execute(
                "INSERT OR REPLACE INTO schema_version VALUES (?1)",
                [SCHEMA_VERSION],
            )?;
        }
        Ok(())
    }

    /// Administrative reset: zero the counters and streak of one user.
    ///
    /// Badges and ledger history are kept.
    pub fn reset_progress(&self, user_id: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE user_progress
             SET total_points = 0, weekly_points = 0, streak = 0, updated_at = ?2
             WHERE user_id = ?1",
            params![user_id, now_ms()],
        )?;
        if changed == 0 {
            return Err(StoreError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }

    fn load_badges(conn: &Connection, user_id: &str) -> StoreResult<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT badge_id FROM user_badges WHERE user_id = ?1 ORDER BY earned_at, rowid",
        )?;
        let badges = stmt
            .query_map([user_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(badges)
    }

    // ========================================
    // FLASHCARD OPERATIONS
    // ========================================

    /// Store freshly generated cards for a course, after any existing ones
    pub fn insert_flashcards(&self, course_id: &str, cards: &[Flashcard]) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let next_position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM flashcards WHERE course_id = ?1",
            [course_id],
            |r| r.get(0),
        )?;

        for (offset, card) in cards.iter().enumerate() {
            tx.execute(
                "INSERT INTO flashcards
                 (id, course_id, position, front, back, next_review_at, interval_days, ease_factor)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    card.id,
                    course_id,
                    next_position + offset as i64,
                    card.front,
                    card.back,
                    card.next_review_date.timestamp_millis(),
                    card.interval,
                    card.ease_factor,
                ],
            )?;
        }

        tx.commit()?;
        tracing::debug!("Stored {} flashcards for course {}", cards.len(), course_id);
        Ok(())
    }

    /// All cards of a course in creation order
    pub fn load_flashcards(&self, course_id: &str) -> StoreResult<Vec<Flashcard>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, front, back, next_review_at, interval_days, ease_factor
             FROM flashcards WHERE course_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map([course_id], flashcard_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(into_flashcard).collect()
    }

    /// A single card by id
    pub fn load_flashcard(&self, card_id: &str) -> StoreResult<Option<Flashcard>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, front, back, next_review_at, interval_days, ease_factor
                 FROM flashcards WHERE id = ?1",
                [card_id],
                flashcard_row,
            )
            .optional()?;
        row.map(into_flashcard).transpose()
    }

    /// Persist the scheduling fields of a reviewed card
    pub fn update_flashcard_schedule(&self, card: &Flashcard) -> StoreResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE flashcards
             SET next_review_at = ?1, interval_days = ?2, ease_factor = ?3
             WHERE id = ?4",
            params![
                card.next_review_date.timestamp_millis(),
                card.interval,
                card.ease_factor,
                card.id
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::CardNotFound(card.id.clone()));
        }
        Ok(())
    }

    /// Remove every card of a course. Returns how many were deleted.
    pub fn delete_course_flashcards(&self, course_id: &str) -> StoreResult<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM flashcards WHERE course_id = ?1", [course_id])?;
        Ok(deleted)
    }
}

impl ProgressStore for RewardsDb {
    fn load_progress(&self, user_id: &str) -> StoreResult<UserProgress> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT total_points, weekly_points, streak, last_active_at
                 FROM user_progress WHERE user_id = ?1",
                [user_id],
                |r| {
                    Ok((
                        r.get::<_, i64>(0)?,
                        r.get::<_, i64>(1)?,
                        r.get::<_, i64>(2)?,
                        r.get::<_, Option<i64>>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((total, weekly, streak, last_active)) = row else {
            return Err(StoreError::UserNotFound(user_id.to_string()));
        };

        Ok(UserProgress {
            user_id: user_id.to_string(),
            total_points: total.max(0) as u64,
            weekly_points: weekly.max(0) as u64,
            streak: streak.clamp(0, u32::MAX as i64) as u32,
            last_active_date: last_active.and_then(DateTime::from_timestamp_millis),
            badges: Self::load_badges(&conn, user_id)?,
        })
    }

    fn create_progress(&self, user_id: &str) -> StoreResult<UserProgress> {
        {
            let conn = self.conn()?;
            let now = now_ms();
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO user_progress (user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?2)",
                params![user_id, now],
            )?;
            if inserted > 0 {
                tracing::info!("Created progress record for {}", user_id);
            }
        }
        self.load_progress(user_id)
    }

    fn update_progress(&self, user_id: &str, update: &ProgressUpdate) -> StoreResult<()> {
        if update.is_empty() {
            return Ok(());
        }

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE user_progress SET
                total_points = COALESCE(?2, total_points),
                weekly_points = COALESCE(?3, weekly_points),
                streak = COALESCE(?4, streak),
                last_active_at = COALESCE(?5, last_active_at),
                updated_at = ?6
             WHERE user_id = ?1",
            params![
                user_id,
                update.total_points.map(|v| v as i64),
                update.weekly_points.map(|v| v as i64),
                update.streak,
                update.last_active_date.map(|d| d.timestamp_millis()),
                now_ms(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }

    fn append_badges(
        &self,
        user_id: &str,
        badge_ids: &[&str],
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for badge_id in badge_ids {
            tx.execute(
                "INSERT OR IGNORE INTO user_badges (user_id, badge_id, earned_at) VALUES (?1, ?2, ?3)",
                params![user_id, badge_id, at.timestamp_millis()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn record_points(&self, entry: &LedgerEntry) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO points_ledger (user_id, source, points, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.user_id,
                entry.source.as_str(),
                entry.points as i64,
                entry.at.timestamp_millis()
            ],
        )?;
        Ok(())
    }

    fn activity_points_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT source, points FROM points_ledger
             WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3",
        )?;
        let rows = stmt
            .query_map(
                params![user_id, start.timestamp_millis(), end.timestamp_millis()],
                |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let mut sum = 0u64;
        for (source, points) in rows {
            let source = PointSource::from_str(&source)
                .ok_or_else(|| StoreError::Corrupt(format!("ledger source {source}")))?;
            if !source.is_bonus() {
                sum = sum.saturating_add(points.max(0) as u64);
            }
        }
        Ok(sum)
    }

    fn bonus_paid_between(
        &self,
        user_id: &str,
        source: PointSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM points_ledger
             WHERE user_id = ?1 AND source = ?2 AND created_at >= ?3 AND created_at < ?4",
            params![
                user_id,
                source.as_str(),
                start.timestamp_millis(),
                end.timestamp_millis()
            ],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    fn leaderboard(&self, limit: usize) -> StoreResult<Vec<LeaderboardEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT p.user_id, p.total_points, p.weekly_points, p.streak,
                    (SELECT COUNT(*) FROM user_badges b WHERE b.user_id = p.user_id)
             FROM user_progress p
             ORDER BY p.total_points DESC, p.user_id ASC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map([limit as i64], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, i64>(1)?,
                    r.get::<_, i64>(2)?,
                    r.get::<_, i64>(3)?,
                    r.get::<_, i64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, (user_id, total, weekly, streak, badges))| LeaderboardEntry {
                rank: i as u32 + 1,
                user_id,
                total_points: total.max(0) as u64,
                weekly_points: weekly.max(0) as u64,
                streak: streak.max(0) as u32,
                badge_count: badges.max(0) as u32,
            })
            .collect())
    }
}

type FlashcardRow = (String, String, String, i64, i64, f64);

fn flashcard_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FlashcardRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn into_flashcard(row: FlashcardRow) -> StoreResult<Flashcard> {
    let (id, front, back, next_review_at, interval, ease_factor) = row;
    let next_review_date = DateTime::from_timestamp_millis(next_review_at)
        .ok_or_else(|| StoreError::Corrupt(format!("next_review_at of card {id}")))?;
    Ok(Flashcard {
        id,
        front,
        back,
        next_review_date,
        interval: interval.clamp(0, u32::MAX as i64) as u32,
        ease_factor,
    })
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// SQL schema for the rewards database
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- One row per user
CREATE TABLE IF NOT EXISTS user_progress (
    user_id TEXT PRIMARY KEY,
    total_points INTEGER NOT NULL DEFAULT 0,
    weekly_points INTEGER NOT NULL DEFAULT 0,
    streak INTEGER NOT NULL DEFAULT 0,
    last_active_at INTEGER,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_progress_total ON user_progress(total_points);

-- Held badges (append-only)
CREATE TABLE IF NOT EXISTS user_badges (
    user_id TEXT NOT NULL,
    badge_id TEXT NOT NULL,
    earned_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, badge_id)
);

-- Every point credit, timestamped
CREATE TABLE IF NOT EXISTS points_ledger (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    source TEXT NOT NULL,
    points INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_ledger_user_time ON points_ledger(user_id, created_at);

-- Flashcards with their review schedule
CREATE TABLE IF NOT EXISTS flashcards (
    id TEXT PRIMARY KEY,
    course_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    front TEXT NOT NULL,
    back TEXT NOT NULL,
    next_review_at INTEGER NOT NULL,
    interval_days INTEGER NOT NULL DEFAULT 0,
    ease_factor REAL NOT NULL DEFAULT 2.5
);
CREATE INDEX IF NOT EXISTS idx_flashcards_course ON flashcards(course_id, position);
"#;
