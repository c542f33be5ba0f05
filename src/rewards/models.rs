//! Data models for progress tracking
//!
//! These structures represent the data stored in and queried from the rewards database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ActivityPoints;

/// Per-user progress record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub total_points: u64,
    pub weekly_points: u64,
    pub streak: u32,
    pub last_active_date: Option<DateTime<Utc>>,
    /// Held badge ids in the order they were earned. Append-only.
    pub badges: Vec<String>,
}

impl UserProgress {
    /// Fresh record for a new account: all counters zero, no badges
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            total_points: 0,
            weekly_points: 0,
            streak: 0,
            last_active_date: None,
            badges: Vec::new(),
        }
    }

    /// Last activity, with a missing value read as the Unix epoch
    pub fn last_active_or_epoch(&self) -> DateTime<Utc> {
        self.last_active_date.unwrap_or(DateTime::UNIX_EPOCH)
    }

    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.iter().any(|b| b == id)
    }
}

/// Kind of qualifying learning activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    LessonComplete,
    ModuleComplete,
    CourseComplete,
    QuizCorrect,
    FlashcardReview,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LessonComplete => "lesson_complete",
            Self::ModuleComplete => "module_complete",
            Self::CourseComplete => "course_complete",
            Self::QuizCorrect => "quiz_correct",
            Self::FlashcardReview => "flashcard_review",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lesson_complete" => Some(Self::LessonComplete),
            "module_complete" => Some(Self::ModuleComplete),
            "course_complete" => Some(Self::CourseComplete),
            "quiz_correct" => Some(Self::QuizCorrect),
            "flashcard_review" => Some(Self::FlashcardReview),
            _ => None,
        }
    }

    pub fn all() -> &'static [ActivityKind] {
        &[
            Self::LessonComplete,
            Self::ModuleComplete,
            Self::CourseComplete,
            Self::QuizCorrect,
            Self::FlashcardReview,
        ]
    }
}

/// A single activity, consumed synchronously by the points calculator.
/// Never queued or batched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardEvent {
    pub kind: ActivityKind,
    pub base_points: u64,
    pub at: DateTime<Utc>,
}

impl RewardEvent {
    /// Build an event using the configured base value for `kind`
    pub fn new(kind: ActivityKind, points: &ActivityPoints, at: DateTime<Utc>) -> Self {
        Self {
            kind,
            base_points: points.base_for(kind),
            at,
        }
    }
}

/// Where a ledger credit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSource {
    Activity(ActivityKind),
    WeeklyBonus,
    MonthlyBonus,
}

impl PointSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activity(kind) => kind.as_str(),
            Self::WeeklyBonus => "weekly_bonus",
            Self::MonthlyBonus => "monthly_bonus",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "weekly_bonus" => Some(Self::WeeklyBonus),
            "monthly_bonus" => Some(Self::MonthlyBonus),
            other => ActivityKind::from_str(other).map(Self::Activity),
        }
    }

    pub fn is_bonus(&self) -> bool {
        !matches!(self, Self::Activity(_))
    }
}

/// One append-only row of the points ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub user_id: String,
    pub source: PointSource,
    pub points: u64,
    pub at: DateTime<Utc>,
}

/// Partial update of a progress record. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub total_points: Option<u64>,
    pub weekly_points: Option<u64>,
    pub streak: Option<u32>,
    pub last_active_date: Option<DateTime<Utc>>,
}

impl ProgressUpdate {
    pub fn is_empty(&self) -> bool {
        self.total_points.is_none()
            && self.weekly_points.is_none()
            && self.streak.is_none()
            && self.last_active_date.is_none()
    }
}

/// Row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub total_points: u64,
    pub weekly_points: u64,
    pub streak: u32,
    pub badge_count: u32,
}
