//! JSON task store: one object keyed by task name.
//!
//! ```json
//! {
//!     "Workout": {
//!         "creation_time": "2024-03-01T08:00:00",
//!         "last_completed_time": "2024-03-03T19:30:12.250",
//!         "current_streak": 3,
//!         "streak_reference_date": "2024-03-03",
//!         "total_completions": 7
//!     }
//! }
//! ```

use std::path::PathBuf;

use serde_json::Value;

use super::{read_store_file, write_atomic, TaskStore};
use crate::error::Result;
use crate::task::{TaskMap, TaskRecord};

/// Task store backed by a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Decode a whole document, recovering what can be recovered.
    pub fn decode(content: &str) -> TaskMap {
        if content.trim().is_empty() {
            return TaskMap::new();
        }

        let root: Value = match serde_json::from_str(content) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!(error = %e, "error decoding task store, starting with empty tasks");
                return TaskMap::new();
            }
        };

        let Value::Object(entries) = root else {
            tracing::warn!("task store is not a JSON object, starting with empty tasks");
            return TaskMap::new();
        };

        entries
            .iter()
            .map(|(name, value)| (name.clone(), TaskRecord::from_json_lenient(name, value)))
            .collect()
    }
}

impl TaskStore for JsonTaskStore {
    fn load_all(&self) -> Result<TaskMap> {
        let tasks = read_store_file(&self.path)
            .map(|content| Self::decode(&content))
            .unwrap_or_default();
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    fn save_all(&self, tasks: &TaskMap) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        write_atomic(&self.path, json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}
