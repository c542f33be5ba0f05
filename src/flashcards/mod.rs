//! Flashcards with spaced-repetition review scheduling
//!
//! Cards are created in bulk from generated module content. After creation
//! only the scheduler changes their `interval`, `ease_factor` and
//! `next_review_date`.

mod card;
mod scheduler;

pub use card::{Flashcard, cards_from_generated};
pub use scheduler::{ReviewOutcome, due_cards, review};
