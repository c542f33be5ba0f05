//! Flashcard command implementations

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Subcommand;
use std::path::PathBuf;

use guru_rewards::flashcards::{ReviewOutcome, cards_from_generated, due_cards, review};
use guru_rewards::rewards::{ActivityKind, RewardEvent};
use guru_rewards::RewardsManager;

#[derive(Subcommand)]
pub enum CardsCommand {
    /// Import the flashcards of a generated module JSON file
    Import {
        course: String,
        file: PathBuf,
    },

    /// List the cards of a course that are due now
    Due { course: String },

    /// Grade one review and reschedule the card
    Review {
        card_id: String,

        /// Remembered the answer
        #[arg(long, conflicts_with_all = ["fail", "quality"])]
        pass: bool,

        /// Did not remember the answer
        #[arg(long, conflicts_with = "quality")]
        fail: bool,

        /// SM-2 quality grade (0-5), 3 and above passes
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
        quality: Option<u8>,

        /// Credit the review to this user
        #[arg(long)]
        user: Option<String>,
    },

    /// Delete every card of a course
    Clear { course: String },
}

pub fn cards_command(manager: &RewardsManager, command: CardsCommand) -> Result<()> {
    let db = manager.store();
    let settings = &manager.config().scheduler;

    match command {
        CardsCommand::Import { course, file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let cards = cards_from_generated(&json, Utc::now(), settings)
                .with_context(|| format!("Invalid module content in {}", file.display()))?;
            db.insert_flashcards(&course, &cards)?;
            println!("Imported {} flashcards into {}.", cards.len(), course);
        }

        CardsCommand::Due { course } => {
            let cards = db.load_flashcards(&course)?;
            let due = due_cards(&cards, Utc::now());
            if due.is_empty() {
                println!("Nothing to review in {course}.");
                return Ok(());
            }
            println!("{} of {} cards due:\n", due.len(), cards.len());
            for card in due {
                println!("  {}  {}", card.id, card.front);
            }
        }

        CardsCommand::Review {
            card_id,
            pass,
            fail,
            quality,
            user,
        } => {
            let outcome = match (pass, fail, quality) {
                (true, false, None) => ReviewOutcome::Pass,
                (false, true, None) => ReviewOutcome::Fail,
                (false, false, Some(q)) => ReviewOutcome::from_quality(q),
                _ => bail!("Specify one of --pass, --fail or --quality"),
            };
            let Some(card) = db.load_flashcard(&card_id)? else {
                bail!("Flashcard not found: {card_id}");
            };

            let now = Utc::now();
            let next = review(&card, outcome, now, settings);
            db.update_flashcard_schedule(&next)?;
            println!(
                "{}: next review in {} days (ease {:.2})",
                next.front, next.interval, next.ease_factor
            );

            if let Some(user) = user {
                let event = RewardEvent::new(ActivityKind::FlashcardReview, &manager.config().points, now);
                if let Some(outcome) = manager.record_activity(&user, &event) {
                    println!("+{} points for {}", outcome.earned_points, user);
                }
            }
        }

        CardsCommand::Clear { course } => {
            let deleted = db.delete_course_flashcards(&course)?;
            println!("Deleted {deleted} flashcards from {course}.");
        }
    }
    Ok(())
}
