//! Gamification rules: streaks, points, threshold bonuses and badges
//!
//! The rule functions are pure; [`RewardsManager`] ties them to storage.

mod checker;
mod definitions;
mod manager;
mod points;
mod streaks;
mod thresholds;

pub use checker::check_badges;
pub use definitions::{BADGES, Badge, BadgeId};
pub use manager::{ActivityOutcome, GamificationEvent, ProgressSummary, RewardsManager};
pub use points::{calculate_earned_points, streak_multiplier};
pub use streaks::{StreakUpdate, update_streak};
pub use thresholds::{
    Cadence, NextMilestone, ThresholdReward, calculate_monthly_reward, calculate_weekly_reward,
    evaluate_threshold, next_milestone, progress_percent,
};
