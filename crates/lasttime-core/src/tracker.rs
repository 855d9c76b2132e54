//! Task lifecycle operations over a [`TaskStore`].
//!
//! Each operation loads the full task set, applies its change in memory and
//! writes the full set back before returning. Rejected operations leave the
//! store untouched.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Result, TaskError};
use crate::stats::Statistics;
use crate::storage::TaskStore;
use crate::streak::{StreakEngine, StreakOutcome, StreakPolicy};
use crate::task::{TaskMap, TaskRecord};

/// Result of marking a task completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub name: String,
    pub record: TaskRecord,
    pub outcome: StreakOutcome,
}

impl Completion {
    /// User-facing description of the streak change.
    pub fn message(&self) -> String {
        self.outcome.message(&self.name, self.record.current_streak)
    }
}

/// Streak tracker bound to a store.
pub struct Tracker<S: TaskStore> {
    store: S,
    engine: StreakEngine,
}

impl<S: TaskStore> Tracker<S> {
    pub fn new(store: S, policy: StreakPolicy) -> Self {
        Self {
            store,
            engine: StreakEngine::with_policy(policy),
        }
    }

    /// Add a new task created at `now`.
    ///
    /// # Errors
    /// `TaskError::EmptyName` for a blank name, `TaskError::AlreadyExists`
    /// for a duplicate, or a store error if saving fails.
    pub fn add_task(&self, name: &str, now: NaiveDateTime) -> Result<TaskRecord> {
        let name = validate_name(name)?;
        let mut tasks = self.store.load_all()?;
        if tasks.contains_key(name) {
            return Err(TaskError::AlreadyExists(name.to_string()).into());
        }

        let record = TaskRecord::new(now);
        tasks.insert(name.to_string(), record.clone());
        self.store.save_all(&tasks)?;
        tracing::info!(task = name, "task added");
        Ok(record)
    }

    /// Mark a task completed at `now` and persist the updated streak.
    ///
    /// # Errors
    /// `TaskError::NotFound` if no such task exists, or a store error.
    pub fn mark_completed(&self, name: &str, now: NaiveDateTime) -> Result<Completion> {
        let name = validate_name(name)?;
        let mut tasks = self.store.load_all()?;
        let Some(current) = tasks.get(name) else {
            return Err(TaskError::NotFound(name.to_string()).into());
        };

        let (record, outcome) = self.engine.record_completion(current, now);
        tasks.insert(name.to_string(), record.clone());
        self.store.save_all(&tasks)?;
        tracing::info!(
            task = name,
            ?outcome,
            streak = record.current_streak,
            total = record.total_completions,
            "task completed"
        );

        Ok(Completion {
            name: name.to_string(),
            record,
            outcome,
        })
    }

    /// All tasks in name order.
    pub fn list_tasks(&self) -> Result<TaskMap> {
        self.store.load_all()
    }

    /// Look up a single task.
    pub fn get_task(&self, name: &str) -> Result<Option<TaskRecord>> {
        Ok(self.store.load_all()?.remove(name.trim()))
    }

    /// Aggregate statistics over every task.
    pub fn statistics(&self) -> Result<Statistics> {
        Ok(Statistics::from_tasks(&self.store.load_all()?))
    }
}

fn validate_name(name: &str) -> Result<&str, TaskError> {
    let name = name.trim();
    if name.is_empty() {
        Err(TaskError::EmptyName)
    } else {
        Ok(name)
    }
}
