//! Display formatting for recipe timestamps.

use chrono::{DateTime, NaiveDate, Utc};

/// Format a timestamp as `DD Mon YYYY` in UTC, e.g. `05 Mar 2024`.
#[must_use]
pub fn format_datetime(date: &DateTime<Utc>) -> String {
    date.format("%d %b %Y").to_string()
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date and format it
/// like [`format_datetime`].
///
/// Returns `None` for input that is not a recognisable date.
#[must_use]
pub fn format_date(date: &str) -> Option<String> {
    let date = date.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return Some(format_datetime(&parsed.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|day| day.format("%d %b %Y").to_string())
}
