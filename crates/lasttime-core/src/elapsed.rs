//! Human-readable "time since" strings for task listings.

use chrono::NaiveDateTime;

/// Describe how long ago `then` was, relative to `now`.
///
/// Produces e.g. `"2 days, 3 hours ago"`. Seconds are shown when non-zero or
/// when no larger unit applies. `None` means the event never happened.
pub fn format_elapsed(then: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
    let Some(then) = then else {
        return "Never".to_string();
    };

    let delta = now - then;
    if delta.num_seconds() < 0 {
        return "Just now".to_string();
    }

    let total = delta.num_seconds();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    for (amount, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
        if amount > 0 {
            parts.push(plural(amount, unit));
        }
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(plural(seconds, "second"));
    }

    format!("{} ago", parts.join(", "))
}

/// `"1 day"`, `"3 days"`.
pub fn plural(amount: i64, unit: &str) -> String {
    if amount == 1 {
        format!("{amount} {unit}")
    } else {
        format!("{amount} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn never_completed() {
        assert_eq!(format_elapsed(None, base()), "Never");
    }

    #[test]
    fn mixed_units() {
        let then = base() - Duration::days(2) - Duration::hours(3);
        assert_eq!(format_elapsed(Some(then), base()), "2 days, 3 hours ago");

        let then = base() - Duration::days(1) - Duration::minutes(1) - Duration::seconds(5);
        assert_eq!(
            format_elapsed(Some(then), base()),
            "1 day, 1 minute, 5 seconds ago"
        );
    }

    #[test]
    fn zero_elapsed_shows_seconds() {
        assert_eq!(format_elapsed(Some(base()), base()), "0 seconds ago");
    }

    #[test]
    fn future_timestamp_is_just_now() {
        let then = base() + Duration::minutes(10);
        assert_eq!(format_elapsed(Some(then), base()), "Just now");
    }
}
