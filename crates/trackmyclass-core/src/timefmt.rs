//! Timestamp parsing and human-readable time formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use thiserror::Error;

/// Naive layouts accepted for `captured_at`, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layouts not covered by RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"];

/// Layout used by `/history`, e.g. `May 1, 2024 at 9:05 AM`.
const HISTORY_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";

/// Layout used by `/xray`, e.g. `May 1, 2024 09:05 AM`.
const XRAY_FORMAT: &str = "%B %-d, %Y %I:%M %p";

/// Errors from timestamp parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("empty timestamp")]
    Empty,

    #[error("unrecognized timestamp: {0}")]
    Unrecognized(String),
}

/// Parse an ISO-8601-like timestamp.
///
/// Values with an offset are converted to UTC; values without one are
/// taken to already be UTC. A bare date means midnight.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError::Unrecognized(s.to_string()))
}

/// Format a timestamp for history listings.
pub fn format_history_time(ts: &DateTime<Utc>) -> String {
    ts.format(HISTORY_FORMAT).to_string()
}

/// Format a timestamp for X-Ray listings.
pub fn format_xray_time(ts: &DateTime<Utc>) -> String {
    ts.format(XRAY_FORMAT).to_string()
}

/// Format a duration as `{h}h {m}m`.
///
/// Hours are floored, so a negative duration of 30 minutes renders
/// as `-1h 30m`.
pub fn format_duration(duration: TimeDelta) -> String {
    const MS_PER_HOUR: i64 = 3_600_000;
    const MS_PER_MINUTE: i64 = 60_000;

    let total_ms = duration.num_milliseconds();
    let hours = total_ms.div_euclid(MS_PER_HOUR);
    let minutes = total_ms.rem_euclid(MS_PER_HOUR) / MS_PER_MINUTE;
    format!("{}h {}m", hours, minutes)
}
