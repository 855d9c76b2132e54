//! Task records.
//!
//! A [`TaskRecord`] holds everything lasttime knows about one named task:
//! when it was created, when it was last completed, the running daily streak
//! and the lifetime completion count. Records are keyed by task name in a
//! [`TaskMap`].

mod fields;

pub use fields::{parse_count, parse_date, parse_timestamp, TIMESTAMP_FORMAT};
pub(crate) use fields::{count_or_warn, date_or_warn, timestamp_or_warn};

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Task name to record, ordered by name.
pub type TaskMap = BTreeMap<String, TaskRecord>;

/// Persisted state of a single task.
///
/// Timestamps are local wall-clock times; streaks are counted in the
/// user's calendar days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Set once when the task is added.
    #[serde(default)]
    pub creation_time: Option<NaiveDateTime>,
    /// Timestamp of the most recent completion event.
    #[serde(default)]
    pub last_completed_time: Option<NaiveDateTime>,
    /// Consecutive qualifying days.
    #[serde(default)]
    pub current_streak: u32,
    /// Day on which the streak was last advanced or set.
    #[serde(default)]
    pub streak_reference_date: Option<NaiveDate>,
    /// Completion events ever recorded.
    #[serde(default)]
    pub total_completions: u64,
}

/// Legacy spelling of `last_completed_time`.
const LEGACY_LAST_COMPLETED: &str = "last_completed_timestamp";
/// Legacy spelling of `streak_reference_date`.
const LEGACY_REFERENCE_DATE: &str = "streak_last_updated_date";

impl TaskRecord {
    /// A fresh record created at `now`, with no completions.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            creation_time: Some(now),
            ..Self::default()
        }
    }

    /// Decode a record from an untyped JSON value, degrading bad fields.
    ///
    /// Absent fields take their zero value. Malformed fields are logged and
    /// replaced by their zero value. A value that is not an object yields a
    /// default record. Older files used `last_completed_timestamp` and
    /// `streak_last_updated_date`; those keys are read when the current ones
    /// are missing.
    pub fn from_json_lenient(name: &str, value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            tracing::warn!(task = name, "record is not an object, resetting to defaults");
            return Self::default();
        };

        let record = Self {
            creation_time: lookup(obj, "creation_time", None)
                .and_then(|v| fields::timestamp_from_json(name, "creation_time", v)),
            last_completed_time: lookup(obj, "last_completed_time", Some(LEGACY_LAST_COMPLETED))
                .and_then(|v| fields::timestamp_from_json(name, "last_completed_time", v)),
            current_streak: lookup(obj, "current_streak", None)
                .map(|v| fields::count_from_json(name, "current_streak", v))
                .unwrap_or_default(),
            streak_reference_date: lookup(obj, "streak_reference_date", Some(LEGACY_REFERENCE_DATE))
                .and_then(|v| fields::date_from_json(name, "streak_reference_date", v)),
            total_completions: lookup(obj, "total_completions", None)
                .map(|v| fields::count_from_json(name, "total_completions", v))
                .unwrap_or_default(),
        };

        record.normalized(name)
    }

    /// Restore the streak/reference-date pairing after a lossy load.
    ///
    /// A streak without a reference date (or the reverse) cannot be continued,
    /// so both are cleared.
    pub fn normalized(mut self, name: &str) -> Self {
        if (self.current_streak == 0) != self.streak_reference_date.is_none() {
            tracing::warn!(
                task = name,
                current_streak = self.current_streak,
                reference = ?self.streak_reference_date,
                "streak and reference date disagree, clearing streak"
            );
            self.current_streak = 0;
            self.streak_reference_date = None;
        }
        self
    }
}

/// Non-null value under `key`, falling back to its legacy spelling.
fn lookup<'a>(obj: &'a Map<String, Value>, key: &str, legacy: Option<&str>) -> Option<&'a Value> {
    obj.get(key)
        .or_else(|| legacy.and_then(|l| obj.get(l)))
        .filter(|v| !v.is_null())
}
