//! Line-oriented task store: one task per line.
//!
//! ```text
//! # name  creation_time  last_completed_time  current_streak  streak_reference_date  total_completions
//! Workout	2024-03-01T08:00:00	2024-03-03T19:30:12.250	3	2024-03-03	7
//! Taxes	2024-03-02T10:00:00	-	0	-	0
//! ```
//!
//! Columns are tab-separated and `-` marks an unset value. Trailing columns
//! may be omitted and take their zero value.
//!
//! Names are escaped so any name survives a round trip: backslash, tab, CR
//! and LF become `\\`, `\t`, `\r` and `\n`, and a leading `#` becomes `\#`
//! so the line is not read back as a comment.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use super::{read_store_file, write_atomic, TaskStore};
use crate::error::Result;
use crate::task::{
    count_or_warn, date_or_warn, timestamp_or_warn, TaskMap, TaskRecord, TIMESTAMP_FORMAT,
};

const UNSET: &str = "-";
const HEADER: &str =
    "# name\tcreation_time\tlast_completed_time\tcurrent_streak\tstreak_reference_date\ttotal_completions";

/// Task store backed by a tab-separated text file.
#[derive(Debug, Clone)]
pub struct LineTaskStore {
    path: PathBuf,
}

impl LineTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn decode(content: &str) -> TaskMap {
        let mut tasks = TaskMap::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut columns = line.split('\t');
            let name = unescape_name(columns.next().unwrap_or_default());
            if name.trim().is_empty() {
                tracing::warn!(line = index + 1, "skipping task line without a name");
                continue;
            }

            let mut column = |field: &'static str| {
                columns
                    .next()
                    .map(str::trim)
                    .filter(|raw| !raw.is_empty() && *raw != UNSET)
                    .map(|raw| (field, raw))
            };

            let creation_time =
                column("creation_time").and_then(|(f, raw)| timestamp_or_warn(&name, f, raw));
            let last_completed_time =
                column("last_completed_time").and_then(|(f, raw)| timestamp_or_warn(&name, f, raw));
            let current_streak = column("current_streak")
                .map(|(f, raw)| count_or_warn(&name, f, raw))
                .unwrap_or_default();
            let streak_reference_date =
                column("streak_reference_date").and_then(|(f, raw)| date_or_warn(&name, f, raw));
            let total_completions = column("total_completions")
                .map(|(f, raw)| count_or_warn(&name, f, raw))
                .unwrap_or_default();

            let record = TaskRecord {
                creation_time,
                last_completed_time,
                current_streak,
                streak_reference_date,
                total_completions,
            }
            .normalized(&name);

            if tasks.insert(name.clone(), record).is_some() {
                tracing::warn!(task = %name, line = index + 1, "duplicate task line, keeping the last one");
            }
        }
        tasks
    }

    pub fn encode(tasks: &TaskMap) -> String {
        let mut lines = vec![HEADER.to_string()];
        lines.extend(tasks.iter().map(|(name, record)| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                escape_name(name),
                fmt_timestamp(record.creation_time),
                fmt_timestamp(record.last_completed_time),
                record.current_streak,
                record
                    .streak_reference_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| UNSET.to_string()),
                record.total_completions,
            )
        }));
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn fmt_timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| UNSET.to_string())
}

fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    if name.starts_with('#') {
        out.push('\\');
    }
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_name`]. Unknown escapes are kept verbatim.
fn unescape_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('#') => out.push('#'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl TaskStore for LineTaskStore {
    fn load_all(&self) -> Result<TaskMap> {
        let tasks = read_store_file(&self.path)
            .map(|content| Self::decode(&content))
            .unwrap_or_default();
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    fn save_all(&self, tasks: &TaskMap) -> Result<()> {
        let content = Self::encode(tasks);
        write_atomic(&self.path, content.as_bytes())?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}
