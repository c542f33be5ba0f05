//! Guru Rewards - progress and rewards engine for learners
//!
//! Turns learning activity (lessons, modules, quizzes, flashcard reviews)
//! into points, day streaks, weekly and monthly bonuses and badges, and
//! schedules flashcard reviews.
//!
//! ## Layout
//!
//! - [`config`]: the immutable [`RewardConfig`] passed to every evaluator
//! - [`rewards`]: progress models, storage and the gamification rules
//! - [`flashcards`]: card model and review scheduler
//!
//! The rule functions are pure and take `now` explicitly. Only
//! [`RewardsManager`] touches storage.

pub mod config;
pub mod flashcards;
pub mod rewards;

pub use config::RewardConfig;
pub use flashcards::{Flashcard, ReviewOutcome};
pub use rewards::{ActivityKind, RewardEvent, RewardsDb, RewardsManager, UserProgress};
