//! Streak tracking
//!
//! A streak counts consecutive days with at least one qualifying activity.

use chrono::{DateTime, Utc};

use crate::rewards::time_bucket::ceil_days_between;

/// Result of applying the streak rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub new_streak: u32,
    pub streak_broken: bool,
}

/// Apply the day-gap rule to a streak.
///
/// The gap is `ceil(|now - last_active|)` in whole days:
/// - 0 days: unchanged (same-instant re-entry never double counts)
/// - 1 day: incremented
/// - 2 or more: reset to zero and reported as broken
///
/// `now` earlier than `last_active` is not rejected; the absolute gap is used.
pub fn update_streak(
    current_streak: u32,
    last_active: DateTime<Utc>,
    now: DateTime<Utc>,
) -> StreakUpdate {
    match ceil_days_between(now, last_active) {
        0 => StreakUpdate {
            new_streak: current_streak,
            streak_broken: false,
        },
        1 => StreakUpdate {
            new_streak: current_streak.saturating_add(1),
            streak_broken: false,
        },
        _ => StreakUpdate {
            new_streak: 0,
            streak_broken: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 28, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_zero_gap_is_idempotent() {
        for streak in [0, 1, 6, 29, 365] {
            let update = update_streak(streak, base(), base());
            assert_eq!(update.new_streak, streak);
            assert!(!update.streak_broken);
        }
    }

    #[test]
    fn test_one_day_gap_increments() {
        let update = update_streak(4, base(), base() + Duration::days(1));
        assert_eq!(update, StreakUpdate { new_streak: 5, streak_broken: false });

        // Any partial day rounds up to one
        let update = update_streak(4, base(), base() + Duration::hours(3));
        assert_eq!(update.new_streak, 5);
    }

    #[test]
    fn test_two_or_more_days_breaks() {
        for gap in [Duration::hours(25), Duration::days(2), Duration::days(40)] {
            for streak in [0, 3, 100] {
                let update = update_streak(streak, base(), base() + gap);
                assert_eq!(update, StreakUpdate { new_streak: 0, streak_broken: true });
            }
        }
    }

    #[test]
    fn test_missing_last_active_reads_as_epoch() {
        let update = update_streak(7, DateTime::UNIX_EPOCH, base());
        assert!(update.streak_broken);
        assert_eq!(update.new_streak, 0);
    }

    #[test]
    fn test_clock_going_backwards_does_not_panic() {
        let update = update_streak(2, base(), base() - Duration::hours(2));
        assert_eq!(update.new_streak, 3);
    }
}
