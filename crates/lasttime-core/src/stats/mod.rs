//! Aggregate statistics over all tracked tasks.

use serde::{Deserialize, Serialize};

use crate::task::TaskMap;

/// A maximum value and every task that reaches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaders<T> {
    /// Highest value across tasks
    pub value: T,
    /// Tasks achieving `value`, in name order. Empty only when there are no tasks.
    pub tasks: Vec<String>,
}

/// Read-only summary of the task store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of tracked tasks
    pub total_tasks: usize,
    /// Tasks with a non-zero current streak
    pub active_streaks: usize,
    /// Longest current streak
    pub longest_streak: Leaders<u32>,
    /// Sum of completion events across tasks
    pub total_completions: u64,
    /// Task(s) completed most often
    pub most_completed: Leaders<u64>,
}

impl Statistics {
    /// Compute statistics for a set of tasks.
    pub fn from_tasks(tasks: &TaskMap) -> Self {
        let longest_streak = leaders(tasks.iter().map(|(n, r)| (n, r.current_streak)));
        let most_completed = leaders(tasks.iter().map(|(n, r)| (n, r.total_completions)));

        Self {
            total_tasks: tasks.len(),
            active_streaks: tasks.values().filter(|r| r.current_streak > 0).count(),
            longest_streak,
            total_completions: tasks
                .values()
                .fold(0u64, |acc, r| acc.saturating_add(r.total_completions)),
            most_completed,
        }
    }
}

fn leaders<'a, T, I>(values: I) -> Leaders<T>
where
    T: Copy + Ord + Default,
    I: Iterator<Item = (&'a String, T)>,
{
    let mut best = Leaders::<T>::default();
    for (name, value) in values {
        if value > best.value {
            best.value = value;
            best.tasks.clear();
        }
        if value == best.value {
            best.tasks.push(name.clone());
        }
    }
    best
}
