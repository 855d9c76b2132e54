//! Tolerant parsing of persisted record fields.

use std::borrow::Cow;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Format used when writing timestamps in text stores.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO-8601 timestamp.
///
/// Accepts naive timestamps with `T` or space separators, and RFC 3339
/// timestamps carrying an offset, which are converted to local time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local())
        })
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parse a non-negative counter from text.
pub fn parse_count<T: TryFrom<u64>>(raw: &str) -> Option<T> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| T::try_from(n).ok())
}

/// Parse a timestamp field, logging and unsetting it when malformed.
pub(crate) fn timestamp_or_warn(task: &str, field: &str, raw: &str) -> Option<NaiveDateTime> {
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        tracing::warn!(task, field, raw, "malformed timestamp, setting to unset");
    }
    parsed
}

/// Parse a date field, logging and unsetting it when malformed.
pub(crate) fn date_or_warn(task: &str, field: &str, raw: &str) -> Option<NaiveDate> {
    let parsed = parse_date(raw);
    if parsed.is_none() {
        tracing::warn!(task, field, raw, "malformed date, setting to unset");
    }
    parsed
}

/// Parse a counter field, logging and zeroing it when invalid.
pub(crate) fn count_or_warn<T>(task: &str, field: &str, raw: &str) -> T
where
    T: TryFrom<u64> + Default,
{
    parse_count(raw).unwrap_or_else(|| {
        tracing::warn!(task, field, raw, "invalid counter, resetting to 0");
        T::default()
    })
}

/// String content for JSON strings, JSON text for anything else.
fn json_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

pub(super) fn timestamp_from_json(task: &str, field: &str, value: &Value) -> Option<NaiveDateTime> {
    timestamp_or_warn(task, field, &json_text(value))
}

pub(super) fn date_from_json(task: &str, field: &str, value: &Value) -> Option<NaiveDate> {
    date_or_warn(task, field, &json_text(value))
}

pub(super) fn count_from_json<T>(task: &str, field: &str, value: &Value) -> T
where
    T: TryFrom<u64> + Default,
{
    // Integral floats such as `5.0` count as 5.
    let integral = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        _ => None,
    };
    let raw = integral.map_or_else(|| json_text(value), |n| Cow::Owned(n.to_string()));
    count_or_warn(task, field, &raw)
}
