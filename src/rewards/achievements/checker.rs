//! Badge checking logic
//!
//! Pure functions: given a progress snapshot and the monthly evaluation,
//! return the badges that should be granted now.

use super::definitions::BadgeId;
use crate::config::RewardConfig;
use crate::rewards::models::UserProgress;

/// Badges whose condition holds now and that the user does not already hold.
///
/// Every rule is evaluated on each call. The result keeps catalog order:
/// early_bird, scholar, top_learner, streak_star, weekly_champion,
/// monthly_master. Nothing is ever revoked here.
pub fn check_badges(
    user: &UserProgress,
    monthly_bonus_awarded: bool,
    config: &RewardConfig,
) -> Vec<BadgeId> {
    let rules = &config.badges;
    let conditions = [
        (BadgeId::EarlyBird, true),
        (BadgeId::Scholar, user.total_points >= rules.scholar_points),
        (BadgeId::TopLearner, user.total_points >= rules.top_learner_points),
        (BadgeId::StreakStar, user.streak >= rules.streak_star_days),
        (
            BadgeId::WeeklyChampion,
            user.weekly_points >= config.weekly.threshold,
        ),
        (BadgeId::MonthlyMaster, monthly_bonus_awarded),
    ];

    conditions
        .into_iter()
        .filter(|(id, met)| *met && !user.has_badge(id.as_str()))
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(total: u64, weekly: u64, streak: u32) -> UserProgress {
        UserProgress {
            total_points: total,
            weekly_points: weekly,
            streak,
            ..UserProgress::new("u")
        }
    }

    #[test]
    fn test_fresh_user_gets_early_bird_only() {
        let config = RewardConfig::default();
        assert_eq!(check_badges(&user(0, 0, 0), false, &config), vec![BadgeId::EarlyBird]);
    }

    #[test]
    fn test_all_rules_in_catalog_order() {
        let config = RewardConfig::default();
        let earned = check_badges(&user(1200, 150, 9), true, &config);
        assert_eq!(
            earned,
            vec![
                BadgeId::EarlyBird,
                BadgeId::Scholar,
                BadgeId::TopLearner,
                BadgeId::StreakStar,
                BadgeId::WeeklyChampion,
                BadgeId::MonthlyMaster,
            ]
        );
    }

    #[test]
    fn test_never_returns_held_badges() {
        let config = RewardConfig::default();
        let mut progress = user(1200, 150, 9);
        progress.badges = vec!["scholar".into(), "streak_star".into()];

        let earned = check_badges(&progress, false, &config);
        assert!(!earned.contains(&BadgeId::Scholar));
        assert!(!earned.contains(&BadgeId::StreakStar));
        assert!(earned.contains(&BadgeId::TopLearner));
    }

    #[test]
    fn test_second_pass_with_union_is_empty() {
        let config = RewardConfig::default();
        let mut progress = user(640, 20, 5);

        let first = check_badges(&progress, false, &config);
        assert_eq!(
            first,
            vec![BadgeId::EarlyBird, BadgeId::Scholar, BadgeId::StreakStar]
        );

        progress
            .badges
            .extend(first.iter().map(|id| id.as_str().to_string()));
        assert!(check_badges(&progress, false, &config).is_empty());
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let config = RewardConfig::default();
        let earned = check_badges(&user(499, 99, 4), false, &config);
        assert_eq!(earned, vec![BadgeId::EarlyBird]);

        let earned = check_badges(&user(500, 100, 5), false, &config);
        assert!(earned.contains(&BadgeId::Scholar));
        assert!(earned.contains(&BadgeId::WeeklyChampion));
        assert!(earned.contains(&BadgeId::StreakStar));
    }
}
