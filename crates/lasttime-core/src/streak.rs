//! Daily streak accounting with a grace period.
//!
//! The engine decides how a task's streak changes when it is completed at a
//! given moment. It is pure: it takes a record and a timestamp and returns
//! the updated record together with a [`StreakOutcome`] describing what
//! happened. Persisting the result is the caller's job.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::task::TaskRecord;

/// What a completion did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakOutcome {
    /// First qualifying completion the task has ever had
    Started,
    /// Completed the day after the reference date
    Continued,
    /// Completed after missed days that the grace period forgives
    ContinuedWithGrace,
    /// Too many days missed; streak starts over at 1
    Restarted,
    /// The streak was already counted for today
    AlreadyCountedToday,
}

impl StreakOutcome {
    /// Whether this completion advanced or set the streak day.
    pub fn is_qualifying(&self) -> bool {
        !matches!(self, StreakOutcome::AlreadyCountedToday)
    }

    /// User-facing message for a completion of `task`.
    pub fn message(&self, task: &str, streak: u32) -> String {
        match self {
            StreakOutcome::Started => {
                format!("Streak started for '{task}'! Current streak: {streak}.")
            }
            StreakOutcome::Continued => {
                format!("Good job! Streak continued for '{task}'. Current streak: {streak}.")
            }
            StreakOutcome::ContinuedWithGrace => format!(
                "Streak kept alive by the grace period for '{task}'. Current streak: {streak}."
            ),
            StreakOutcome::Restarted => {
                format!("Streak restarted for '{task}'. Current streak: {streak}.")
            }
            StreakOutcome::AlreadyCountedToday => format!(
                "Task '{task}' already marked for today's streak. Completion time updated."
            ),
        }
    }
}

/// Tunables for streak accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakPolicy {
    /// Full missed days forgiven without breaking the streak.
    /// Zero means only consecutive days count.
    pub grace_days: u32,
}

impl Default for StreakPolicy {
    fn default() -> Self {
        Self { grace_days: 1 }
    }
}

/// Applies completions to task records.
#[derive(Debug, Clone, Default)]
pub struct StreakEngine {
    policy: StreakPolicy,
}

impl StreakEngine {
    /// Create an engine with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom policy
    pub fn with_policy(policy: StreakPolicy) -> Self {
        Self { policy }
    }

    /// Record a completion of `record` at `now`.
    ///
    /// The calendar day of `now` is compared with the record's reference date:
    /// - same day: streak untouched
    /// - one day later: streak + 1
    /// - up to `grace_days` missed days: streak + 1, reported as grace
    /// - anything else, including a reference date after today: streak = 1
    ///
    /// Every call bumps `total_completions` and sets `last_completed_time`.
    pub fn record_completion(
        &self,
        record: &TaskRecord,
        now: NaiveDateTime,
    ) -> (TaskRecord, StreakOutcome) {
        let today = now.date();
        let grace_limit = i64::from(self.policy.grace_days) + 1;

        let (current_streak, outcome) = match record.streak_reference_date {
            Some(reference) if reference == today => {
                (record.current_streak, StreakOutcome::AlreadyCountedToday)
            }
            Some(reference) => match (today - reference).num_days() {
                1 => (
                    record.current_streak.saturating_add(1),
                    StreakOutcome::Continued,
                ),
                gap if gap > 1 && gap <= grace_limit => (
                    record.current_streak.saturating_add(1),
                    StreakOutcome::ContinuedWithGrace,
                ),
                _ => (1, StreakOutcome::Restarted),
            },
            None => (1, StreakOutcome::Started),
        };

        let streak_reference_date = if outcome.is_qualifying() {
            Some(today)
        } else {
            record.streak_reference_date
        };

        let updated = TaskRecord {
            creation_time: record.creation_time,
            last_completed_time: Some(now),
            current_streak,
            streak_reference_date,
            total_completions: record.total_completions.saturating_add(1),
        };

        (updated, outcome)
    }
}

/// Record a completion using an explicit policy.
pub fn record_completion(
    record: &TaskRecord,
    now: NaiveDateTime,
    policy: StreakPolicy,
) -> (TaskRecord, StreakOutcome) {
    StreakEngine::with_policy(policy).record_completion(record, now)
}
