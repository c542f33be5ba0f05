//! Points calculation
//!
//! Converts base activity points into earned points using the streak multiplier table.

use crate::config::StreakSettings;

/// Multiplier for a streak. Rows are checked from the highest `min_streak`
/// down and the first match wins; no match means 1.0.
pub fn streak_multiplier(streak: u32, settings: &StreakSettings) -> f64 {
    settings
        .multipliers
        .iter()
        .filter(|row| streak >= row.min_streak)
        .max_by_key(|row| row.min_streak)
        .map(|row| row.multiplier)
        .unwrap_or(1.0)
}

/// `floor(base_points * multiplier(streak))`
pub fn calculate_earned_points(base_points: u64, streak: u32, settings: &StreakSettings) -> u64 {
    let earned = (base_points as f64 * streak_multiplier(streak, settings)).floor();
    if earned <= 0.0 { 0 } else { earned as u64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreakMultiplier;

    #[test]
    fn test_multiplier_table() {
        let settings = StreakSettings::default();
        assert_eq!(streak_multiplier(0, &settings), 1.0);
        assert_eq!(streak_multiplier(2, &settings), 1.0);
        assert_eq!(streak_multiplier(3, &settings), 1.1);
        assert_eq!(streak_multiplier(6, &settings), 1.1);
        assert_eq!(streak_multiplier(7, &settings), 1.25);
        assert_eq!(streak_multiplier(29, &settings), 1.25);
        assert_eq!(streak_multiplier(30, &settings), 1.5);
        assert_eq!(streak_multiplier(400, &settings), 1.5);
    }

    #[test]
    fn test_earned_points_examples() {
        let settings = StreakSettings::default();
        assert_eq!(calculate_earned_points(100, 30, &settings), 150);
        assert_eq!(calculate_earned_points(100, 7, &settings), 125);
        assert_eq!(calculate_earned_points(100, 3, &settings), 110);
        assert_eq!(calculate_earned_points(100, 2, &settings), 100);
        assert_eq!(calculate_earned_points(10, 6, &settings), 11);
        assert_eq!(calculate_earned_points(5, 3, &settings), 5);
        assert_eq!(calculate_earned_points(0, 30, &settings), 0);
    }

    #[test]
    fn test_unsorted_table_still_picks_highest_row() {
        let settings = StreakSettings {
            multipliers: vec![
                StreakMultiplier { min_streak: 2, multiplier: 2.0 },
                StreakMultiplier { min_streak: 10, multiplier: 3.0 },
            ],
        };
        assert_eq!(calculate_earned_points(10, 1, &settings), 10);
        assert_eq!(calculate_earned_points(10, 5, &settings), 20);
        assert_eq!(calculate_earned_points(10, 12, &settings), 30);
    }
}
