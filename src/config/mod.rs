//! Reward configuration loading and management
//!
//! All point values, thresholds and scheduler constants live in a single
//! immutable [`RewardConfig`]. It is built once at startup (defaults, or a
//! TOML file) and handed to the manager and the evaluator functions.

mod io;

use serde::{Deserialize, Serialize};

use crate::rewards::ActivityKind;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Base points per activity kind
    #[serde(default)]
    pub points: ActivityPoints,

    /// Weekly bonus rule
    #[serde(default = "default_weekly_rule")]
    pub weekly: ThresholdRule,

    /// Monthly bonus rule
    #[serde(default = "default_monthly_rule")]
    pub monthly: ThresholdRule,

    /// Streak multiplier table
    #[serde(default)]
    pub streak: StreakSettings,

    /// Badge unlock thresholds
    #[serde(default)]
    pub badges: BadgeRules,

    /// Flashcard review scheduler constants
    #[serde(default)]
    pub scheduler: SchedulerSettings,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            points: ActivityPoints::default(),
            weekly: default_weekly_rule(),
            monthly: default_monthly_rule(),
            streak: StreakSettings::default(),
            badges: BadgeRules::default(),
            scheduler: SchedulerSettings::default(),
        }
    }
}

/// Fixed base point values for each activity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPoints {
    #[serde(default = "default_lesson_complete")]
    pub lesson_complete: u64,
    #[serde(default = "default_quiz_correct")]
    pub quiz_correct: u64,
    #[serde(default = "default_module_complete")]
    pub module_complete: u64,
    #[serde(default = "default_course_complete")]
    pub course_complete: u64,
    #[serde(default = "default_flashcard_review")]
    pub flashcard_review: u64,
}

impl Default for ActivityPoints {
    fn default() -> Self {
        Self {
            lesson_complete: default_lesson_complete(),
            quiz_correct: default_quiz_correct(),
            module_complete: default_module_complete(),
            course_complete: default_course_complete(),
            flashcard_review: default_flashcard_review(),
        }
    }
}

impl ActivityPoints {
    /// Base points for an activity kind
    pub fn base_for(&self, kind: ActivityKind) -> u64 {
        match kind {
            ActivityKind::LessonComplete => self.lesson_complete,
            ActivityKind::QuizCorrect => self.quiz_correct,
            ActivityKind::ModuleComplete => self.module_complete,
            ActivityKind::CourseComplete => self.course_complete,
            ActivityKind::FlashcardReview => self.flashcard_review,
        }
    }
}

/// A point threshold and the bonus paid once it is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub threshold: u64,
    pub bonus: u64,
}

/// One row of the multiplier table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreakMultiplier {
    pub min_streak: u32,
    pub multiplier: f64,
}

/// Streak multiplier table. Rows may be listed in any order; lookup checks
/// the highest `min_streak` first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakSettings {
    #[serde(default = "default_multipliers")]
    pub multipliers: Vec<StreakMultiplier>,
}

impl Default for StreakSettings {
    fn default() -> Self {
        Self {
            multipliers: default_multipliers(),
        }
    }
}

/// Thresholds for the automatically granted badges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRules {
    #[serde(default = "default_scholar_points")]
    pub scholar_points: u64,
    #[serde(default = "default_top_learner_points")]
    pub top_learner_points: u64,
    #[serde(default = "default_streak_star_days")]
    pub streak_star_days: u32,
}

impl Default for BadgeRules {
    fn default() -> Self {
        Self {
            scholar_points: default_scholar_points(),
            top_learner_points: default_top_learner_points(),
            streak_star_days: default_streak_star_days(),
        }
    }
}

/// Flashcard review scheduler constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// Ease factor given to newly created cards
    #[serde(default = "default_initial_ease")]
    pub initial_ease: f64,
    /// Ease factor never drops below this
    #[serde(default = "default_min_ease")]
    pub min_ease: f64,
    /// Added to the ease factor on a passed review
    #[serde(default = "default_ease_bonus")]
    pub ease_bonus: f64,
    /// Subtracted from the ease factor on a failed review
    #[serde(default = "default_ease_penalty")]
    pub ease_penalty: f64,
    /// Interval (days) after a failed review
    #[serde(default = "default_relearn_interval_days")]
    pub relearn_interval_days: u32,
    /// Upper bound for any review interval (days)
    #[serde(default = "default_max_interval_days")]
    pub max_interval_days: u32,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            initial_ease: default_initial_ease(),
            min_ease: default_min_ease(),
            ease_bonus: default_ease_bonus(),
            ease_penalty: default_ease_penalty(),
            relearn_interval_days: default_relearn_interval_days(),
            max_interval_days: default_max_interval_days(),
        }
    }
}

fn default_lesson_complete() -> u64 {
    10
}

fn default_quiz_correct() -> u64 {
    5
}

fn default_module_complete() -> u64 {
    50
}

fn default_course_complete() -> u64 {
    200
}

fn default_flashcard_review() -> u64 {
    2
}

fn default_weekly_rule() -> ThresholdRule {
    ThresholdRule {
        threshold: 100,
        bonus: 50,
    }
}

fn default_monthly_rule() -> ThresholdRule {
    ThresholdRule {
        threshold: 500,
        bonus: 300,
    }
}

fn default_multipliers() -> Vec<StreakMultiplier> {
    vec![
        StreakMultiplier {
            min_streak: 30,
            multiplier: 1.5,
        },
        StreakMultiplier {
            min_streak: 7,
            multiplier: 1.25,
        },
        StreakMultiplier {
            min_streak: 3,
            multiplier: 1.1,
        },
    ]
}

fn default_scholar_points() -> u64 {
    500
}

fn default_top_learner_points() -> u64 {
    1000
}

fn default_streak_star_days() -> u32 {
    5
}

fn default_initial_ease() -> f64 {
    2.5
}

fn default_min_ease() -> f64 {
    1.3
}

fn default_ease_bonus() -> f64 {
    0.1
}

fn default_ease_penalty() -> f64 {
    0.2
}

fn default_relearn_interval_days() -> u32 {
    1
}

fn default_max_interval_days() -> u32 {
    36500
}
