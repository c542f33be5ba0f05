//! Time bucketing utilities for period-scoped rewards
//!
//! All periods are computed in UTC.
//! - Day gaps: absolute difference rounded up to whole days
//! - Month periods: `[first day 00:00, first day of next month 00:00)`
//! - Weeks start on Monday

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Whole days between two instants, rounded up.
///
/// Order does not matter. Any nonzero gap shorter than a day counts as one day.
pub fn ceil_days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let diff_ms = (a - b).num_milliseconds().abs();
    (diff_ms + DAY_MS - 1) / DAY_MS
}

/// Half-open calendar-month period containing `at`
pub fn month_bounds(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = month_start(at.year(), at.month());
    let end = if at.month() == 12 {
        month_start(at.year() + 1, 1)
    } else {
        month_start(at.year(), at.month() + 1)
    };
    (start, end)
}

fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Days remaining in the current ISO week, counting today (1 on Sunday, 7 on Monday)
pub fn days_left_in_week(at: DateTime<Utc>) -> u32 {
    7 - at.weekday().num_days_from_monday()
}
