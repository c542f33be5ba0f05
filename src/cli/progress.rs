//! Progress and reward command implementations

use anyhow::{Result, bail};
use chrono::Utc;

use guru_rewards::rewards::{ActivityKind, BADGES, Badge, BadgeId, GamificationEvent, RewardEvent};
use guru_rewards::RewardsManager;

/// Create a user's progress record
pub fn user_command(manager: &RewardsManager, user: &str) -> Result<()> {
    let Some(progress) = manager.ensure_user(user) else {
        bail!("Could not create progress record for {user}");
    };
    println!(
        "{}: {} points, {} this week, streak {}",
        progress.user_id, progress.total_points, progress.weekly_points, progress.streak
    );
    Ok(())
}

/// Record one activity and print what it earned
pub fn activity_command(manager: &RewardsManager, user: &str, kind: &str) -> Result<()> {
    let Some(kind) = ActivityKind::from_str(kind) else {
        let known: Vec<_> = ActivityKind::all().iter().map(|k| k.as_str()).collect();
        bail!("Unknown activity kind: {kind} (expected one of: {})", known.join(", "));
    };

    let event = RewardEvent::new(kind, &manager.config().points, Utc::now());
    let Some(outcome) = manager.record_activity(user, &event) else {
        bail!("Activity was not recorded, see log for details");
    };

    for event in &outcome.events {
        print_event(event);
    }
    println!(
        "Total {} | Week {} | Streak {}",
        outcome.progress.total_points, outcome.progress.weekly_points, outcome.progress.streak
    );
    Ok(())
}

/// Dashboard view of one user
pub fn status_command(manager: &RewardsManager, user: &str) -> Result<()> {
    let Some(summary) = manager.summary(user, Utc::now()) else {
        println!("No progress recorded for {user}.");
        return Ok(());
    };

    let progress = &summary.progress;
    println!("{}\n", progress.user_id);
    println!("  Total points:  {}", progress.total_points);
    println!(
        "  Weekly points: {} ({}% of weekly goal)",
        progress.weekly_points, summary.weekly_percent
    );
    println!(
        "  Month points:  {} ({}% of monthly goal)",
        summary.monthly_points, summary.monthly_percent
    );
    println!("  Streak:        {} days", progress.streak);
    if let Some(last) = progress.last_active_date {
        println!("  Last active:   {}", last.format("%Y-%m-%d %H:%M UTC"));
    }

    println!("\n  {}", summary.weekly.message);
    println!("  {}", summary.monthly.message);
    println!("  Next: {}", summary.next_milestone.message);

    if progress.badges.is_empty() {
        println!("\n  No badges yet.");
    } else {
        println!("\n  Badges ({}):", progress.badges.len());
        for id in &progress.badges {
            match Badge::lookup(id) {
                Some(badge) => println!("    [{}] {} - {}", badge.icon, badge.name, badge.description),
                None => println!("    {id}"),
            }
        }
    }
    Ok(())
}

pub fn award_weekly_command(manager: &RewardsManager, user: &str) -> Result<()> {
    match manager.award_weekly_bonus(user, Utc::now()) {
        Some(bonus) => println!("Weekly bonus of {bonus} points awarded to {user}."),
        None => println!("No weekly bonus awarded to {user}."),
    }
    Ok(())
}

pub fn award_monthly_command(manager: &RewardsManager, user: &str) -> Result<()> {
    match manager.award_monthly_bonus(user, Utc::now()) {
        Some(bonus) => println!("Monthly bonus of {bonus} points awarded to {user}."),
        None => println!("No monthly bonus awarded to {user}."),
    }
    Ok(())
}

pub fn reset_weekly_command(manager: &RewardsManager, user: &str) -> Result<()> {
    if !manager.reset_weekly_points(user) {
        bail!("Weekly points were not reset for {user}");
    }
    println!("Weekly points reset for {user}.");
    Ok(())
}

/// Administrative reset of one user's counters
pub fn reset_progress_command(manager: &RewardsManager, user: &str) -> Result<()> {
    manager.store().reset_progress(user)?;
    println!("Progress of {user} reset. Badges and history are kept.");
    Ok(())
}

pub fn grant_badge_command(manager: &RewardsManager, user: &str, badge: &str) -> Result<()> {
    let Some(id) = BadgeId::from_str(badge) else {
        bail!("Unknown badge: {badge}");
    };
    if !manager.grant_badge(user, id, Utc::now()) {
        bail!("Badge {badge} was not granted to {user}");
    }
    println!("Granted {badge} to {user}.");
    Ok(())
}

/// List the badge catalog
pub fn badges_command() -> Result<()> {
    println!("Badges ({}):\n", Badge::total_count());
    for badge in BADGES {
        let how = if badge.automatic { "" } else { " (granted manually)" };
        println!(
            "  {:<16} [{}] {} - {}{}",
            badge.id.as_str(),
            badge.icon,
            badge.name,
            badge.description,
            how
        );
    }
    Ok(())
}

pub fn leaderboard_command(manager: &RewardsManager, limit: usize) -> Result<()> {
    let entries = manager.leaderboard(limit);
    if entries.is_empty() {
        println!("Leaderboard is empty.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "  #{:<3} {:<24} {:>7} pts  {:>3}d streak  {} badges",
            entry.rank, entry.user_id, entry.total_points, entry.streak, entry.badge_count
        );
    }
    Ok(())
}

fn print_event(event: &GamificationEvent) {
    match event {
        GamificationEvent::PointsAwarded { amount, reason } => println!("+{amount} points: {reason}"),
        GamificationEvent::StreakExtended { count } => println!("Streak extended to {count} days"),
        GamificationEvent::StreakBroken { previous } => {
            println!("Streak of {previous} days broken")
        }
        GamificationEvent::BadgeEarned(badge) => {
            println!("Badge earned: {} - {}", badge.name, badge.description)
        }
    }
}
