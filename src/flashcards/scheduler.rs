//! Review scheduling for flashcards (SM-2 style)
//!
//! - Pass: interval grows by the ease factor (at least 1 day), ease rises by `ease_bonus`
//! - Fail: interval drops to `relearn_interval_days`, ease falls by `ease_penalty`
//!   but never below `min_ease`
//! - Intervals never exceed `max_interval_days`
//! - The next review is `now + interval` days

use chrono::{DateTime, Duration, Utc};

use super::Flashcard;
use crate::config::SchedulerSettings;

/// Grade of a single review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Pass,
    Fail,
}

impl ReviewOutcome {
    /// Map an SM-2 quality grade (0-5). Grades of 3 and above pass.
    pub fn from_quality(quality: u8) -> Self {
        if quality >= 3 { Self::Pass } else { Self::Fail }
    }
}

/// Apply one review to a card and return the rescheduled card
pub fn review(
    card: &Flashcard,
    outcome: ReviewOutcome,
    now: DateTime<Utc>,
    settings: &SchedulerSettings,
) -> Flashcard {
    let (interval, ease_factor) = match outcome {
        ReviewOutcome::Pass => {
            let grown = (card.interval as f64 * card.ease_factor).round();
            let interval = if grown < 1.0 {
                1
            } else {
                grown.min(u32::MAX as f64) as u32
            };
            (interval, card.ease_factor + settings.ease_bonus)
        }
        ReviewOutcome::Fail => (
            settings.relearn_interval_days,
            (card.ease_factor - settings.ease_penalty).max(settings.min_ease),
        ),
    };
    let interval = interval.min(settings.max_interval_days);

    Flashcard {
        interval,
        ease_factor,
        next_review_date: now
            .checked_add_signed(Duration::days(interval as i64))
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
        ..card.clone()
    }
}

/// Cards due at `now`, in their original order
pub fn due_cards(cards: &[Flashcard], now: DateTime<Utc>) -> Vec<&Flashcard> {
    cards.iter().filter(|card| card.is_due(now)).collect()
}
