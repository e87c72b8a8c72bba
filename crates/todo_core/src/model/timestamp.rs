//! Millisecond timestamp helpers shared by model and storage.
//!
//! Timestamps are persisted as UTC epoch milliseconds, so in-memory values are
//! truncated to the same precision to survive a storage round-trip unchanged.

use chrono::{DateTime, NaiveDate, Utc};

/// Current wall-clock time truncated to milliseconds.
pub fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

/// Drops sub-millisecond precision.
pub fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(value)
}

/// Converts a timestamp to UTC epoch milliseconds.
pub fn to_epoch_ms(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

/// Converts UTC epoch milliseconds back to a timestamp.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn from_epoch_ms(value: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
}

/// Parses caller-supplied date text.
///
/// Accepts RFC 3339 (`2025-07-01T09:00:00+08:00`) or a bare calendar date
/// (`2025-07-01`, midnight UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(truncate_to_millis(parsed.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
