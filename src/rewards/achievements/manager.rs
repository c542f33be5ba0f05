//! Rewards Manager - Core gamification logic
//!
//! Handles activity recording, streak updates, bonus payouts and badge grants
//! against a [`ProgressStore`].
//!
//! This is the boundary of the rewards subsystem: storage failures are logged
//! and turned into "no change" results instead of being returned to callers.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::checker::check_badges;
use super::definitions::{Badge, BadgeId};
use super::points::{calculate_earned_points, streak_multiplier};
use super::streaks::update_streak;
use super::thresholds::{
    Cadence, NextMilestone, ThresholdReward, calculate_monthly_reward, calculate_weekly_reward,
    next_milestone, progress_percent,
};
use crate::config::RewardConfig;
use crate::rewards::db::RewardsDb;
use crate::rewards::models::{
    LeaderboardEntry, LedgerEntry, PointSource, ProgressUpdate, RewardEvent, UserProgress,
};
use crate::rewards::store::{ProgressStore, StoreError, StoreResult};
use crate::rewards::time_bucket::month_bounds;

/// Events that can happen while processing an activity
#[derive(Debug, Clone)]
pub enum GamificationEvent {
    PointsAwarded { amount: u64, reason: String },
    StreakExtended { count: u32 },
    StreakBroken { previous: u32 },
    BadgeEarned(&'static Badge),
}

/// Result of recording one activity
#[derive(Debug, Clone)]
pub struct ActivityOutcome {
    pub earned_points: u64,
    pub streak_broken: bool,
    /// Progress after the activity, new badges included
    pub progress: UserProgress,
    pub new_badges: Vec<BadgeId>,
    pub events: Vec<GamificationEvent>,
}

/// Everything a dashboard needs about one user
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    pub progress: UserProgress,
    pub monthly_points: u64,
    pub weekly: ThresholdReward,
    pub monthly: ThresholdReward,
    pub weekly_percent: u8,
    pub monthly_percent: u8,
    pub next_milestone: NextMilestone,
}

/// Main manager for all gamification features
pub struct RewardsManager<S: ProgressStore = RewardsDb> {
    store: S,
    config: RewardConfig,
}

impl<S: ProgressStore> RewardsManager<S> {
    /// Create a manager over a store with a fixed configuration
    pub fn new(store: S, config: RewardConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================
    // PROGRESS OPERATIONS
    // ========================================

    /// Create the user's zeroed record if it does not exist yet
    pub fn ensure_user(&self, user_id: &str) -> Option<UserProgress> {
        match self.store.create_progress(user_id) {
            Ok(progress) => Some(progress),
            Err(e) => {
                error!("Failed to create progress for {}: {}", user_id, e);
                None
            }
        }
    }

    /// Current progress, or `None` if it cannot be read
    pub fn progress(&self, user_id: &str) -> Option<UserProgress> {
        match self.store.load_progress(user_id) {
            Ok(progress) => Some(progress),
            Err(StoreError::UserNotFound(_)) => {
                debug!("No progress record for {}", user_id);
                None
            }
            Err(e) => {
                warn!("Failed to load progress for {}: {}", user_id, e);
                None
            }
        }
    }

    fn load_or_create(&self, user_id: &str) -> StoreResult<UserProgress> {
        match self.store.load_progress(user_id) {
            Err(StoreError::UserNotFound(_)) => self.store.create_progress(user_id),
            other => other,
        }
    }

    /// Record a qualifying activity.
    ///
    /// Applies the streak rule, multiplies the base points, adds the result to
    /// both the total and weekly counters, appends a ledger credit and runs the
    /// badge checker. Returns `None` if the progress record could not be read
    /// or written; nothing is changed in that case.
    pub fn record_activity(&self, user_id: &str, event: &RewardEvent) -> Option<ActivityOutcome> {
        let mut progress = match self.load_or_create(user_id) {
            Ok(progress) => progress,
            Err(e) => {
                error!("Failed to load progress for {}: {}", user_id, e);
                return None;
            }
        };

        let previous_streak = progress.streak;
        let streak = update_streak(previous_streak, progress.last_active_or_epoch(), event.at);
        let multiplier = streak_multiplier(streak.new_streak, &self.config.streak);
        let earned = calculate_earned_points(event.base_points, streak.new_streak, &self.config.streak);

        progress.total_points = progress.total_points.saturating_add(earned);
        progress.weekly_points = progress.weekly_points.saturating_add(earned);
        progress.streak = streak.new_streak;
        progress.last_active_date = Some(event.at);

        let update = ProgressUpdate {
            total_points: Some(progress.total_points),
            weekly_points: Some(progress.weekly_points),
            streak: Some(progress.streak),
            last_active_date: Some(event.at),
        };
        if let Err(e) = self.store.update_progress(user_id, &update) {
            error!("Failed to save activity for {}: {}", user_id, e);
            return None;
        }

        if earned > 0 {
            let entry = LedgerEntry {
                user_id: user_id.to_string(),
                source: PointSource::Activity(event.kind),
                points: earned,
                at: event.at,
            };
            if let Err(e) = self.store.record_points(&entry) {
                warn!("Failed to ledger {} points for {}: {}", earned, user_id, e);
            }
        }

        let mut events = Vec::new();
        if streak.streak_broken && previous_streak > 0 {
            events.push(GamificationEvent::StreakBroken {
                previous: previous_streak,
            });
        } else if streak.new_streak > previous_streak {
            events.push(GamificationEvent::StreakExtended {
                count: streak.new_streak,
            });
        }
        events.push(GamificationEvent::PointsAwarded {
            amount: earned,
            reason: format!("{} (x{:.2} streak multiplier)", event.kind.as_str(), multiplier),
        });

        let new_badges = self.check_and_award_badges(&progress, event.at);
        for id in &new_badges {
            progress.badges.push(id.as_str().to_string());
            if let Some(badge) = Badge::get(*id) {
                events.push(GamificationEvent::BadgeEarned(badge));
            }
        }

        debug!(
            "{} +{} points ({}), streak {}",
            user_id,
            earned,
            event.kind.as_str(),
            progress.streak
        );

        Some(ActivityOutcome {
            earned_points: earned,
            streak_broken: streak.streak_broken,
            progress,
            new_badges,
            events,
        })
    }

    // ========================================
    // THRESHOLD REWARDS
    // ========================================

    /// Weekly evaluation for a progress snapshot (read-only)
    pub fn weekly_reward(&self, progress: &UserProgress) -> ThresholdReward {
        calculate_weekly_reward(progress.weekly_points, &self.config.weekly)
    }

    /// Activity points credited in the calendar month containing `now`
    pub fn monthly_points(&self, user_id: &str, now: DateTime<Utc>) -> StoreResult<u64> {
        let (start, end) = month_bounds(now);
        self.store.activity_points_between(user_id, start, end)
    }

    /// Monthly evaluation (read-only). Degrades to "no bonus" if the month
    /// aggregate cannot be read.
    pub fn monthly_reward(&self, user_id: &str, now: DateTime<Utc>) -> ThresholdReward {
        match self.monthly_points(user_id, now) {
            Ok(points) => calculate_monthly_reward(points, &self.config.monthly),
            Err(e) => {
                warn!("Error calculating monthly reward for {}: {}", user_id, e);
                ThresholdReward::unavailable(Cadence::Monthly)
            }
        }
    }

    /// Pay the weekly bonus if the threshold is met: the bonus goes to the
    /// total and the weekly counter is reset to zero.
    ///
    /// Returns the amount paid.
    pub fn award_weekly_bonus(&self, user_id: &str, now: DateTime<Utc>) -> Option<u64> {
        let progress = self.progress(user_id)?;
        let reward = self.weekly_reward(&progress);
        if !reward.bonus_awarded {
            debug!("No weekly bonus for {}: {}", user_id, reward.message);
            return None;
        }

        let bonus = reward.resulting_points;
        let update = ProgressUpdate {
            total_points: Some(progress.total_points.saturating_add(bonus)),
            weekly_points: Some(0),
            ..Default::default()
        };
        if let Err(e) = self.store.update_progress(user_id, &update) {
            error!("Error awarding weekly bonus to {}: {}", user_id, e);
            return None;
        }
        self.ledger_bonus(user_id, PointSource::WeeklyBonus, bonus, now);

        info!("Weekly bonus {} awarded to {}", bonus, user_id);
        Some(bonus)
    }

    /// Pay the monthly bonus once per calendar month if the month's activity
    /// points reach the threshold.
    ///
    /// Returns the amount paid.
    pub fn award_monthly_bonus(&self, user_id: &str, now: DateTime<Utc>) -> Option<u64> {
        let (start, end) = month_bounds(now);
        match self
            .store
            .bonus_paid_between(user_id, PointSource::MonthlyBonus, start, end)
        {
            Ok(false) => {}
            Ok(true) => {
                debug!("Monthly bonus already paid to {} this month", user_id);
                return None;
            }
            Err(e) => {
                warn!("Cannot verify monthly bonus history for {}: {}", user_id, e);
                return None;
            }
        }

        let reward = self.monthly_reward(user_id, now);
        if !reward.bonus_awarded {
            debug!("No monthly bonus for {}: {}", user_id, reward.message);
            return None;
        }

        let progress = self.progress(user_id)?;
        let bonus = reward.resulting_points;
        let update = ProgressUpdate {
            total_points: Some(progress.total_points.saturating_add(bonus)),
            ..Default::default()
        };
        if let Err(e) = self.store.update_progress(user_id, &update) {
            error!("Error awarding monthly bonus to {}: {}", user_id, e);
            return None;
        }
        self.ledger_bonus(user_id, PointSource::MonthlyBonus, bonus, now);

        info!("Monthly bonus {} awarded to {}", bonus, user_id);
        Some(bonus)
    }

    fn ledger_bonus(&self, user_id: &str, source: PointSource, points: u64, at: DateTime<Utc>) {
        let entry = LedgerEntry {
            user_id: user_id.to_string(),
            source,
            points,
            at,
        };
        if let Err(e) = self.store.record_points(&entry) {
            warn!("Failed to ledger {} for {}: {}", source.as_str(), user_id, e);
        }
    }

    /// Zero the weekly counter (start of a new week). Returns success.
    pub fn reset_weekly_points(&self, user_id: &str) -> bool {
        let update = ProgressUpdate {
            weekly_points: Some(0),
            ..Default::default()
        };
        match self.store.update_progress(user_id, &update) {
            Ok(()) => {
                info!("Weekly points reset for {}", user_id);
                true
            }
            Err(e) => {
                error!("Error resetting weekly points for {}: {}", user_id, e);
                false
            }
        }
    }

    // ========================================
    // BADGE OPERATIONS
    // ========================================

    /// Evaluate every badge rule for `user` and persist the new ones.
    ///
    /// The monthly aggregate is only queried while `monthly_master` is not yet
    /// held. A failed write is logged; the ids are still returned so the caller
    /// can show them.
    pub fn check_and_award_badges(&self, user: &UserProgress, now: DateTime<Utc>) -> Vec<BadgeId> {
        let monthly_bonus_awarded = !user.has_badge(BadgeId::MonthlyMaster.as_str())
            && self.monthly_reward(&user.user_id, now).bonus_awarded;

        let new_badges = check_badges(user, monthly_bonus_awarded, &self.config);
        if new_badges.is_empty() {
            return new_badges;
        }

        let ids: Vec<&str> = new_badges.iter().map(|id| id.as_str()).collect();
        match self.store.append_badges(&user.user_id, &ids, now) {
            Ok(()) => info!("{} new badges awarded to {}", ids.len(), user.user_id),
            Err(e) => error!("Error updating badges for {}: {}", user.user_id, e),
        }
        new_badges
    }

    /// Explicitly grant a badge (e.g. `crypto_native` after wallet linking).
    /// Granting a held badge is a no-op that still reports success.
    pub fn grant_badge(&self, user_id: &str, badge: BadgeId, now: DateTime<Utc>) -> bool {
        if let Err(e) = self.load_or_create(user_id) {
            error!("Failed to load progress for {}: {}", user_id, e);
            return false;
        }
        match self.store.append_badges(user_id, &[badge.as_str()], now) {
            Ok(()) => true,
            Err(e) => {
                error!("Error granting {} to {}: {}", badge.as_str(), user_id, e);
                false
            }
        }
    }

    // ========================================
    // QUERIES
    // ========================================

    /// Progress plus threshold evaluations and the next milestone
    pub fn summary(&self, user_id: &str, now: DateTime<Utc>) -> Option<ProgressSummary> {
        let progress = self.progress(user_id)?;

        let (monthly_points, monthly) = match self.monthly_points(user_id, now) {
            Ok(points) => (points, calculate_monthly_reward(points, &self.config.monthly)),
            Err(e) => {
                warn!("Error calculating monthly progress for {}: {}", user_id, e);
                (0, ThresholdReward::unavailable(Cadence::Monthly))
            }
        };

        Some(ProgressSummary {
            weekly: self.weekly_reward(&progress),
            weekly_percent: progress_percent(progress.weekly_points, &self.config.weekly),
            monthly_percent: progress_percent(monthly_points, &self.config.monthly),
            next_milestone: next_milestone(progress.weekly_points, monthly_points, &self.config, now),
            monthly,
            monthly_points,
            progress,
        })
    }

    /// Top users by total points; empty if the store cannot be read
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.store.leaderboard(limit).unwrap_or_else(|e| {
            warn!("Error fetching leaderboard: {}", e);
            Vec::new()
        })
    }
}
