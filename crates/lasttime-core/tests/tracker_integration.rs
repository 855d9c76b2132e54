//! Integration tests for the tracker over file-backed stores.
//!
//! Each test runs the add/complete/list/statistics cycle against a real
//! store file in a temporary directory, reopening the store between steps
//! the way separate CLI invocations would.

use chrono::{NaiveDate, NaiveDateTime};
use lasttime_core::{
    JsonTaskStore, LineTaskStore, StreakOutcome, StreakPolicy, TaskError, TaskStore, Tracker,
};
use lasttime_core::error::CoreError;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, day)
        .unwrap()
        .and_hms_opt(hour, 15, 0)
        .unwrap()
}

fn json_tracker(dir: &TempDir, grace_days: u32) -> Tracker<JsonTaskStore> {
    Tracker::new(
        JsonTaskStore::new(dir.path().join("tasks.json")),
        StreakPolicy { grace_days },
    )
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_grace_scenario_across_reopened_store() {
    let dir = TempDir::new().unwrap();
    json_tracker(&dir, 1).add_task("Workout", at(1, 7)).unwrap();

    let steps = [
        (at(1, 9), StreakOutcome::Started, 1, 1),
        (at(2, 9), StreakOutcome::Continued, 2, 2),
        (at(2, 20), StreakOutcome::AlreadyCountedToday, 2, 3),
        (at(4, 9), StreakOutcome::ContinuedWithGrace, 3, 4),
        (at(8, 9), StreakOutcome::Restarted, 1, 5),
    ];

    for (now, outcome, streak, total) in steps {
        let completion = json_tracker(&dir, 1).mark_completed("Workout", now).unwrap();
        assert_eq!(completion.outcome, outcome, "at {now}");

        let stored = json_tracker(&dir, 1).get_task("Workout").unwrap().unwrap();
        assert_eq!(stored.current_streak, streak);
        assert_eq!(stored.total_completions, total);
        assert_eq!(stored.last_completed_time, Some(now));
        assert_eq!(stored.streak_reference_date, Some(now.date()));
        assert_eq!(stored.creation_time, Some(at(1, 7)));
    }
}

#[test]
fn test_strict_policy_breaks_on_single_missed_day() {
    let dir = TempDir::new().unwrap();
    let tracker = json_tracker(&dir, 0);
    tracker.add_task("Reading", at(1, 7)).unwrap();
    tracker.mark_completed("Reading", at(1, 21)).unwrap();

    let completion = tracker.mark_completed("Reading", at(3, 21)).unwrap();
    assert_eq!(completion.outcome, StreakOutcome::Restarted);
    assert_eq!(completion.record.current_streak, 1);
}

#[test]
fn test_rejections_leave_file_untouched() {
    let dir = TempDir::new().unwrap();
    let tracker = json_tracker(&dir, 1);
    tracker.add_task("Workout", at(1, 7)).unwrap();
    let before = std::fs::read_to_string(dir.path().join("tasks.json")).unwrap();

    match tracker.add_task("Workout", at(2, 7)) {
        Err(CoreError::Task(TaskError::AlreadyExists(name))) => assert_eq!(name, "Workout"),
        other => panic!("unexpected result: {other:?}"),
    }
    match tracker.mark_completed("Yoga", at(2, 7)) {
        Err(CoreError::Task(TaskError::NotFound(name))) => assert_eq!(name, "Yoga"),
        other => panic!("unexpected result: {other:?}"),
    }

    let after = std::fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_legacy_file_is_upgraded_on_first_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(
        &path,
        r#"{
    "Grocery Shopping": {
        "last_completed_timestamp": "2024-07-02T14:30:00.123456",
        "current_streak": 5,
        "streak_last_updated_date": "2024-07-02"
    }
}"#,
    )
    .unwrap();

    let tracker = json_tracker(&dir, 1);
    let completion = tracker.mark_completed("Grocery Shopping", at(3, 10)).unwrap();
    assert_eq!(completion.outcome, StreakOutcome::Continued);
    assert_eq!(completion.record.current_streak, 6);
    assert_eq!(completion.record.total_completions, 1);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"streak_reference_date\": \"2024-07-03\""));
    assert!(!content.contains("streak_last_updated_date"));
}

#[test]
fn test_corrupt_file_recovers_as_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tasks.json"), "{{{ definitely not json").unwrap();

    let tracker = json_tracker(&dir, 1);
    assert!(tracker.list_tasks().unwrap().is_empty());

    tracker.add_task("Fresh start", at(5, 8)).unwrap();
    assert_eq!(tracker.list_tasks().unwrap().len(), 1);
}

#[test]
fn test_line_store_runs_the_same_lifecycle() {
    let dir = TempDir::new().unwrap();
    let store = LineTaskStore::new(dir.path().join("tasks.txt"));
    let tracker = Tracker::new(store, StreakPolicy::default());

    tracker.add_task("Stretch", at(1, 6)).unwrap();
    tracker.add_task("Journal", at(1, 6)).unwrap();
    tracker.mark_completed("Stretch", at(1, 7)).unwrap();
    tracker.mark_completed("Stretch", at(2, 7)).unwrap();
    tracker.mark_completed("Journal", at(2, 22)).unwrap();

    let reopened = LineTaskStore::new(dir.path().join("tasks.txt"));
    let tasks = reopened.load_all().unwrap();
    assert_eq!(tasks["Stretch"].current_streak, 2);
    assert_eq!(tasks["Journal"].current_streak, 1);

    let stats = tracker.statistics().unwrap();
    assert_eq!(stats.total_tasks, 2);
    assert_eq!(stats.total_completions, 3);
    assert_eq!(stats.longest_streak.tasks, vec!["Stretch".to_string()]);
}

#[test]
fn test_line_store_accepts_names_that_look_like_comments() {
    let dir = TempDir::new().unwrap();
    let tracker = Tracker::new(
        LineTaskStore::new(dir.path().join("tasks.txt")),
        StreakPolicy::default(),
    );

    tracker.add_task("#1 priority", at(1, 6)).unwrap();
    tracker.add_task("back\\slash", at(1, 6)).unwrap();
    tracker.mark_completed("#1 priority", at(1, 9)).unwrap();

    let tasks = LineTaskStore::new(dir.path().join("tasks.txt")).load_all().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks["#1 priority"].total_completions, 1);
    assert!(tasks.contains_key("back\\slash"));

    let err = tracker.add_task("#1 priority", at(2, 6)).unwrap_err();
    assert!(matches!(err, CoreError::Task(TaskError::AlreadyExists(_))));
}

#[test]
fn test_streak_and_reference_date_stay_paired() {
    let dir = TempDir::new().unwrap();
    let tracker = json_tracker(&dir, 2);
    tracker.add_task("Never done", at(1, 6)).unwrap();
    tracker.add_task("Often done", at(1, 6)).unwrap();
    for day in [1, 2, 3, 6, 7, 13] {
        tracker.mark_completed("Often done", at(day, 12)).unwrap();
    }

    for (name, record) in tracker.list_tasks().unwrap() {
        assert_eq!(
            record.current_streak == 0,
            record.streak_reference_date.is_none(),
            "{name}"
        );
    }
}
