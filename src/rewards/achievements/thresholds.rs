//! Weekly and monthly threshold rewards
//!
//! The evaluators here are read-only predictions used for display and for the
//! badge checker. Paying a bonus out is done by the manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{RewardConfig, ThresholdRule};
use crate::rewards::time_bucket::days_left_in_week;

/// Reward period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Weekly,
    Monthly,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Outcome of a threshold evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdReward {
    pub cadence: Cadence,
    /// Points counted toward the threshold
    pub points_earned: u64,
    pub bonus_awarded: bool,
    /// Counter value after the evaluation: the bonus amount when awarded, else 0
    pub resulting_points: u64,
    pub message: String,
}

impl ThresholdReward {
    /// Safe result used when the period's point sum cannot be read
    pub fn unavailable(cadence: Cadence) -> Self {
        Self {
            cadence,
            points_earned: 0,
            bonus_awarded: false,
            resulting_points: 0,
            message: format!("Unable to calculate {} reward", cadence.as_str()),
        }
    }
}

/// Test `points` against a threshold rule.
///
/// When the bonus is awarded the resulting counter is the bonus amount
/// itself, not zero. Callers that actually pay out reset the counter.
pub fn evaluate_threshold(cadence: Cadence, points: u64, rule: &ThresholdRule) -> ThresholdReward {
    if points >= rule.threshold {
        let message = match cadence {
            Cadence::Weekly => format!("🎉 Weekly Champion! Bonus {} points awarded!", rule.bonus),
            Cadence::Monthly => format!("🏆 Monthly Master! Bonus {} points awarded!", rule.bonus),
        };
        ThresholdReward {
            cadence,
            points_earned: points,
            bonus_awarded: true,
            resulting_points: rule.bonus,
            message,
        }
    } else {
        let needed = rule.threshold - points;
        let message = match cadence {
            Cadence::Weekly => format!("{needed} more points needed for weekly bonus!"),
            Cadence::Monthly => format!("{needed} more points needed for monthly master bonus!"),
        };
        ThresholdReward {
            cadence,
            points_earned: points,
            bonus_awarded: false,
            resulting_points: 0,
            message,
        }
    }
}

pub fn calculate_weekly_reward(weekly_points: u64, rule: &ThresholdRule) -> ThresholdReward {
    evaluate_threshold(Cadence::Weekly, weekly_points, rule)
}

/// Monthly evaluation over a month-scoped point sum supplied by storage
pub fn calculate_monthly_reward(monthly_points: u64, rule: &ThresholdRule) -> ThresholdReward {
    evaluate_threshold(Cadence::Monthly, monthly_points, rule)
}

/// Rounded percentage of the way to the threshold, capped at 100
pub fn progress_percent(points: u64, rule: &ThresholdRule) -> u8 {
    if rule.threshold == 0 {
        return 100;
    }
    let pct = (points as f64 / rule.threshold as f64 * 100.0).min(100.0);
    pct.round() as u8
}

/// The next bonus the user is working toward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMilestone {
    pub cadence: Cadence,
    pub points_needed: u64,
    pub reward: u64,
    pub days_left: Option<u32>,
    pub message: String,
}

/// Weekly milestone while the weekly threshold is unmet, monthly otherwise
pub fn next_milestone(
    weekly_points: u64,
    monthly_points: u64,
    config: &RewardConfig,
    now: DateTime<Utc>,
) -> NextMilestone {
    let weekly_needed = config.weekly.threshold.saturating_sub(weekly_points);
    if weekly_needed > 0 {
        return NextMilestone {
            cadence: Cadence::Weekly,
            points_needed: weekly_needed,
            reward: config.weekly.bonus,
            days_left: Some(days_left_in_week(now)),
            message: format!("{weekly_needed} points until weekly bonus!"),
        };
    }

    let monthly_needed = config.monthly.threshold.saturating_sub(monthly_points);
    NextMilestone {
        cadence: Cadence::Monthly,
        points_needed: monthly_needed,
        reward: config.monthly.bonus,
        days_left: None,
        message: format!("Aiming for monthly master! {monthly_needed} points needed."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_weekly_threshold_met_overwrites_with_bonus() {
        let rule = RewardConfig::default().weekly;
        let reward = calculate_weekly_reward(100, &rule);
        assert!(reward.bonus_awarded);
        // The counter becomes the bonus value (50), not zero
        assert_eq!(reward.resulting_points, 50);
        assert_eq!(reward.points_earned, 100);
        assert!(reward.message.contains("Bonus 50 points"));
    }

    #[test]
    fn test_weekly_threshold_missed_by_one() {
        let rule = RewardConfig::default().weekly;
        let reward = calculate_weekly_reward(99, &rule);
        assert!(!reward.bonus_awarded);
        assert_eq!(reward.resulting_points, 0);
        assert!(reward.message.contains("1 more points needed"));
    }

    #[test]
    fn test_monthly_messages() {
        let rule = RewardConfig::default().monthly;
        let missed = calculate_monthly_reward(420, &rule);
        assert!(!missed.bonus_awarded);
        assert_eq!(missed.message, "80 more points needed for monthly master bonus!");

        let met = calculate_monthly_reward(500, &rule);
        assert!(met.bonus_awarded);
        assert_eq!(met.resulting_points, 300);
    }

    #[test]
    fn test_unavailable_is_safe_default() {
        let reward = ThresholdReward::unavailable(Cadence::Monthly);
        assert!(!reward.bonus_awarded);
        assert_eq!(reward.points_earned, 0);
        assert_eq!(reward.message, "Unable to calculate monthly reward");
    }

    #[test]
    fn test_progress_percent_caps() {
        let rule = ThresholdRule { threshold: 100, bonus: 50 };
        assert_eq!(progress_percent(0, &rule), 0);
        assert_eq!(progress_percent(40, &rule), 40);
        assert_eq!(progress_percent(250, &rule), 100);
        assert_eq!(progress_percent(7, &ThresholdRule { threshold: 0, bonus: 0 }), 100);
    }

    #[test]
    fn test_next_milestone_switches_to_monthly() {
        let config = RewardConfig::default();
        // Wednesday
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap();

        let weekly = next_milestone(40, 0, &config, now);
        assert_eq!(weekly.cadence, Cadence::Weekly);
        assert_eq!(weekly.points_needed, 60);
        assert_eq!(weekly.reward, 50);
        assert_eq!(weekly.days_left, Some(5));

        let monthly = next_milestone(120, 380, &config, now);
        assert_eq!(monthly.cadence, Cadence::Monthly);
        assert_eq!(monthly.points_needed, 120);
        assert_eq!(monthly.reward, 300);
    }
}
