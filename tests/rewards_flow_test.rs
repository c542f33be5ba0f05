//! End-to-end tests for activity recording, bonuses and badges

mod common;

use chrono::{Duration, TimeZone, Utc};

use common::{now, seed_user, temp_manager};
use guru_rewards::rewards::{
    ActivityKind, BadgeId, Cadence, GamificationEvent, RewardEvent, RewardsDb,
};
use guru_rewards::{RewardConfig, RewardsManager};

fn event(manager: &RewardsManager, kind: ActivityKind, at: chrono::DateTime<Utc>) -> RewardEvent {
    RewardEvent::new(kind, &manager.config().points, at)
}

#[test]
fn test_lesson_on_six_day_streak_earns_eleven() {
    let (_dir, manager) = temp_manager();
    seed_user(&manager, "ada", 450, 0, 6, Some(now()));

    let outcome = manager
        .record_activity("ada", &event(&manager, ActivityKind::LessonComplete, now()))
        .expect("activity recorded");

    assert_eq!(outcome.earned_points, 11);
    assert_eq!(outcome.progress.total_points, 461);
    assert_eq!(outcome.progress.streak, 6);
    assert!(!outcome.streak_broken);
    assert!(outcome.new_badges.contains(&BadgeId::StreakStar));
    assert!(!outcome.new_badges.contains(&BadgeId::Scholar));

    let stored = manager.progress("ada").unwrap();
    assert_eq!(stored.total_points, 461);
    assert!(stored.has_badge("streak_star"));
    assert!(!stored.has_badge("scholar"));
}

#[test]
fn test_four_lessons_reach_forty_without_bonus() {
    let (_dir, manager) = temp_manager();
    for _ in 0..4 {
        manager
            .record_activity("ada", &event(&manager, ActivityKind::LessonComplete, now()))
            .unwrap();
    }

    let progress = manager.progress("ada").unwrap();
    assert_eq!(progress.weekly_points, 40);
    assert_eq!(progress.total_points, 40);

    let weekly = manager.weekly_reward(&progress);
    assert!(!weekly.bonus_awarded);
    assert_eq!(weekly.message, "60 more points needed for weekly bonus!");
    assert_eq!(manager.award_weekly_bonus("ada", now()), None);
}

#[test]
fn test_weekly_evaluation_reports_bonus_value_as_counter() {
    let (_dir, manager) = temp_manager();
    seed_user(&manager, "ada", 100, 100, 0, Some(now()));

    let progress = manager.progress("ada").unwrap();
    let weekly = manager.weekly_reward(&progress);
    assert!(weekly.bonus_awarded);
    assert_eq!(weekly.resulting_points, 50);

    // Evaluation alone never writes
    assert_eq!(manager.progress("ada").unwrap().weekly_points, 100);

    seed_user(&manager, "bob", 99, 99, 0, Some(now()));
    let weekly = manager.weekly_reward(&manager.progress("bob").unwrap());
    assert!(!weekly.bonus_awarded);
    assert!(weekly.message.contains("1 more points needed"));
}

#[test]
fn test_award_weekly_bonus_pays_then_resets() {
    let (_dir, manager) = temp_manager();
    seed_user(&manager, "ada", 220, 120, 2, Some(now()));

    assert_eq!(manager.award_weekly_bonus("ada", now()), Some(50));
    let progress = manager.progress("ada").unwrap();
    assert_eq!(progress.total_points, 270);
    assert_eq!(progress.weekly_points, 0);
}

#[test]
fn test_streak_extends_daily_and_breaks_after_gap() {
    let (_dir, manager) = temp_manager();
    let lesson = |at| event(&manager, ActivityKind::LessonComplete, at);

    manager.record_activity("ada", &lesson(now())).unwrap();
    let day2 = manager.record_activity("ada", &lesson(now() + Duration::days(1))).unwrap();
    let day3 = manager.record_activity("ada", &lesson(now() + Duration::days(2))).unwrap();
    assert_eq!(day2.progress.streak, 1);
    assert_eq!(day3.progress.streak, 2);

    // Same instant again: no double increment
    let again = manager.record_activity("ada", &lesson(now() + Duration::days(2))).unwrap();
    assert_eq!(again.progress.streak, 2);

    let late = manager.record_activity("ada", &lesson(now() + Duration::days(5))).unwrap();
    assert!(late.streak_broken);
    assert_eq!(late.progress.streak, 0);
    assert!(
        late.events
            .iter()
            .any(|e| matches!(e, GamificationEvent::StreakBroken { previous: 2 }))
    );
}

#[test]
fn test_total_never_decreases_across_activities() {
    let (_dir, manager) = temp_manager();
    let kinds = [
        ActivityKind::QuizCorrect,
        ActivityKind::LessonComplete,
        ActivityKind::FlashcardReview,
        ActivityKind::ModuleComplete,
    ];

    let mut last_total = 0;
    for (day, kind) in kinds.iter().enumerate() {
        let at = now() + Duration::days(day as i64);
        let outcome = manager.record_activity("ada", &event(&manager, *kind, at)).unwrap();
        assert!(outcome.progress.total_points >= last_total);
        last_total = outcome.progress.total_points;
    }
    // The module lands on a 3-day streak: floor(50 * 1.1)
    assert_eq!(last_total, 5 + 10 + 2 + 55);
}

#[test]
fn test_badges_are_granted_once() {
    let (_dir, manager) = temp_manager();
    seed_user(&manager, "ada", 995, 0, 0, Some(now()));

    let first = manager
        .record_activity("ada", &event(&manager, ActivityKind::LessonComplete, now()))
        .unwrap();
    assert_eq!(
        first.new_badges,
        vec![BadgeId::EarlyBird, BadgeId::Scholar, BadgeId::TopLearner]
    );

    let second = manager
        .record_activity("ada", &event(&manager, ActivityKind::LessonComplete, now()))
        .unwrap();
    assert!(second.new_badges.is_empty());

    let progress = manager.progress("ada").unwrap();
    assert_eq!(progress.badges, vec!["early_bird", "scholar", "top_learner"]);
    assert!(manager.check_and_award_badges(&progress, now()).is_empty());
}

#[test]
fn test_monthly_sum_is_scoped_to_calendar_month() {
    let (_dir, manager) = temp_manager();
    let august = Utc.with_ymd_and_hms(2024, 8, 31, 9, 0, 0).unwrap();
    let september = Utc.with_ymd_and_hms(2024, 9, 1, 9, 0, 0).unwrap();
    let course = |at| event(&manager, ActivityKind::CourseComplete, at);

    manager.record_activity("ada", &course(august)).unwrap();
    manager.record_activity("ada", &course(august)).unwrap();
    manager.record_activity("ada", &course(september)).unwrap();

    assert_eq!(manager.progress("ada").unwrap().total_points, 600);
    assert_eq!(manager.monthly_points("ada", september).unwrap(), 200);

    let monthly = manager.monthly_reward("ada", september);
    assert_eq!(monthly.cadence, Cadence::Monthly);
    assert!(!monthly.bonus_awarded);
    assert_eq!(monthly.message, "300 more points needed for monthly master bonus!");
    assert_eq!(manager.award_monthly_bonus("ada", september), None);
}

#[test]
fn test_monthly_bonus_grants_monthly_master_badge() {
    let (_dir, manager) = temp_manager();
    let course = event(&manager, ActivityKind::CourseComplete, now());
    manager.record_activity("ada", &course).unwrap();
    manager.record_activity("ada", &course).unwrap();
    let third = manager.record_activity("ada", &course).unwrap();

    // 600 activity points this month: the badge follows the evaluation
    assert!(third.new_badges.contains(&BadgeId::MonthlyMaster));

    assert_eq!(manager.award_monthly_bonus("ada", now()), Some(300));
    // Bonus credits do not count toward the month's activity sum
    assert_eq!(manager.monthly_points("ada", now()).unwrap(), 600);
    assert_eq!(manager.award_monthly_bonus("ada", now() + Duration::days(2)), None);

    let next_month = Utc.with_ymd_and_hms(2024, 10, 2, 9, 0, 0).unwrap();
    assert_eq!(manager.monthly_points("ada", next_month).unwrap(), 0);
}

#[test]
fn test_summary_and_leaderboard() {
    let (_dir, manager) = temp_manager();
    seed_user(&manager, "ada", 300, 40, 3, Some(now()));
    seed_user(&manager, "bob", 900, 120, 8, Some(now()));
    seed_user(&manager, "cy", 10, 10, 0, Some(now()));
    manager.grant_badge("bob", BadgeId::CryptoNative, now());

    let summary = manager.summary("ada", now()).unwrap();
    assert_eq!(summary.weekly_percent, 40);
    assert_eq!(summary.monthly_percent, 0);
    assert_eq!(summary.next_milestone.cadence, Cadence::Weekly);
    assert_eq!(summary.next_milestone.points_needed, 60);

    let summary = manager.summary("bob", now()).unwrap();
    assert_eq!(summary.weekly_percent, 100);
    assert_eq!(summary.next_milestone.cadence, Cadence::Monthly);
    assert_eq!(summary.next_milestone.points_needed, 500);

    let board = manager.leaderboard(2);
    let users: Vec<_> = board.iter().map(|e| e.user_id.as_str()).collect();
    assert_eq!(users, vec!["bob", "ada"]);
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].badge_count, 1);
}

#[test]
fn test_progress_survives_reopen() {
    let (dir, manager) = temp_manager();
    manager
        .record_activity("ada", &event(&manager, ActivityKind::ModuleComplete, now()))
        .unwrap();
    drop(manager);

    let db = RewardsDb::open(&dir.path().join("rewards.db")).unwrap();
    let manager = RewardsManager::new(db, RewardConfig::default());
    let progress = manager.progress("ada").unwrap();
    assert_eq!(progress.total_points, 50);
    assert_eq!(progress.badges, vec!["early_bird"]);
    assert_eq!(progress.last_active_date, Some(now()));
}

#[test]
fn test_custom_config_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("rewards.toml");
    std::fs::write(
        &path,
        "[weekly]\nthreshold = 30\nbonus = 5\n\n[points]\nlesson_complete = 15\n",
    )
    .unwrap();

    let config = RewardConfig::load_or_default(&path).unwrap();
    let manager = RewardsManager::new(RewardsDb::open_in_memory().unwrap(), config);
    manager
        .record_activity("ada", &event(&manager, ActivityKind::LessonComplete, now()))
        .unwrap();
    manager
        .record_activity("ada", &event(&manager, ActivityKind::LessonComplete, now()))
        .unwrap();

    let progress = manager.progress("ada").unwrap();
    assert_eq!(progress.weekly_points, 30);
    assert!(progress.has_badge("weekly_champion"));
    assert_eq!(manager.award_weekly_bonus("ada", now()), Some(5));
}
