//! Flashcard is a front/back pair plus its review schedule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
    /// The card is due once this instant has passed
    pub next_review_date: DateTime<Utc>,
    /// Days until the next review
    pub interval: u32,
    pub ease_factor: f64,
}

impl Flashcard {
    /// New card, due immediately
    pub fn new(
        front: impl Into<String>,
        back: impl Into<String>,
        now: DateTime<Utc>,
        settings: &SchedulerSettings,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            front: front.into(),
            back: back.into(),
            next_review_date: now,
            interval: 0,
            ease_factor: settings.initial_ease,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_review_date
    }
}

/// Shape of generated module content; only the cards are read
#[derive(Deserialize)]
struct GeneratedContent {
    #[serde(default)]
    flashcards: Vec<GeneratedCard>,
}

#[derive(Deserialize)]
struct GeneratedCard {
    front: String,
    back: String,
}

/// Build scheduled cards from generated module JSON
/// (`{"lessons": [...], "flashcards": [{"front": "...", "back": "..."}]}`).
///
/// A document without a `flashcards` array yields no cards.
pub fn cards_from_generated(
    json: &str,
    now: DateTime<Utc>,
    settings: &SchedulerSettings,
) -> Result<Vec<Flashcard>, serde_json::Error> {
    let content: GeneratedContent = serde_json::from_str(json)?;
    Ok(content
        .flashcards
        .into_iter()
        .map(|c| Flashcard::new(c.front, c.back, now, settings))
        .collect())
}
