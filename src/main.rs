use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use guru_rewards::{RewardConfig, RewardsDb, RewardsManager};

mod cli;

#[derive(Parser)]
#[command(name = "guru-rewards")]
#[command(about = "Points, streaks, badges and flashcard scheduling for learners")]
#[command(version)]
struct Cli {
    /// Path to the rewards database (defaults to ~/.guru/rewards.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to the config file (defaults to ~/.guru/rewards.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default rewards.toml
    InitConfig {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Create a user's progress record (no-op if it exists)
    User { user: String },

    /// Record a learning activity
    Activity {
        user: String,
        /// lesson_complete, module_complete, course_complete, quiz_correct, flashcard_review
        kind: String,
    },

    /// Show points, streak, badges and bonus progress
    Status { user: String },

    /// Pay the weekly bonus if the threshold is met
    AwardWeekly { user: String },

    /// Pay the monthly bonus if the threshold is met
    AwardMonthly { user: String },

    /// Reset the weekly points counter
    ResetWeekly { user: String },

    /// Zero a user's counters and streak (badges are kept)
    ResetProgress { user: String },

    /// Grant a badge explicitly
    GrantBadge { user: String, badge: String },

    /// List the badge catalog
    Badges,

    /// Show the leaderboard
    Leaderboard {
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// Flashcard commands
    #[command(subcommand)]
    Cards(cli::cards::CardsCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config_path = cli.config.unwrap_or_else(RewardConfig::global_config_path);
    let db_path = cli.db;

    // Only commands that touch progress open the database
    let open = || -> Result<RewardsManager> {
        let config = RewardConfig::load_or_default(&config_path)?;
        let db = match &db_path {
            Some(path) => RewardsDb::open(path)?,
            None => RewardsDb::open_default()?,
        };
        Ok(RewardsManager::new(db, config))
    };

    match cli.command {
        Commands::InitConfig { force } => cli::init::init_command(&config_path, force),
        Commands::User { user } => cli::progress::user_command(&open()?, &user),
        Commands::Activity { user, kind } => cli::progress::activity_command(&open()?, &user, &kind),
        Commands::Status { user } => cli::progress::status_command(&open()?, &user),
        Commands::AwardWeekly { user } => cli::progress::award_weekly_command(&open()?, &user),
        Commands::AwardMonthly { user } => cli::progress::award_monthly_command(&open()?, &user),
        Commands::ResetWeekly { user } => cli::progress::reset_weekly_command(&open()?, &user),
        Commands::ResetProgress { user } => cli::progress::reset_progress_command(&open()?, &user),
        Commands::GrantBadge { user, badge } => {
            cli::progress::grant_badge_command(&open()?, &user, &badge)
        }
        Commands::Badges => cli::progress::badges_command(),
        Commands::Leaderboard { limit } => cli::progress::leaderboard_command(&open()?, limit),
        Commands::Cards(command) => cli::cards::cards_command(&open()?, command),
    }
}
