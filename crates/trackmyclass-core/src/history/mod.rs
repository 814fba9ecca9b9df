//! Open/close history reconstruction.
//!
//! Turns the raw change records the backend keeps for a section into the
//! spans during which the section had open seats.
//!
//! # Algorithm
//!
//! 1. **Parse** - keep OPEN/CLOSE records, skipping malformed ones
//! 2. **Sort** - stable sort by timestamp
//! 3. **Pair** - walk with a single pending-open slot
//! 4. **Close out** - resolve a trailing open using the current seat count
//! 5. **Truncate** - keep the most recent `limit` intervals
//! 6. **Average** - mean duration over what was kept

mod types;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;
use trackmyclass_models::{ChangeEvent, ChangeKind, Interval, RawChangeRecord};

use crate::timefmt::parse_timestamp;

pub use self::types::{
    HistoryConfig, Reconstruction, RecordError, SkippedRecord, DEFAULT_HISTORY_LIMIT,
};

/// Reconstruct open/close intervals from raw change records.
///
/// `now` is the reference time for still-open intervals. When
/// `current_available_seats` is `Some(0)`, a trailing open interval is
/// closed at `now`; otherwise it is left open. Only the last `limit`
/// intervals are returned, oldest first.
pub fn reconstruct(
    records: &[RawChangeRecord],
    current_available_seats: Option<i64>,
    now: DateTime<Utc>,
    limit: usize,
) -> Reconstruction {
    let (mut events, skipped) = parse_records(records);
    events.sort_by_key(|event| event.timestamp);

    let mut intervals = pair_events(&events, current_available_seats, now);
    if intervals.len() > limit {
        intervals.drain(..intervals.len() - limit);
    }

    let average_duration = average_duration(&intervals);

    debug!(
        records = records.len(),
        transitions = events.len(),
        intervals = intervals.len(),
        skipped = skipped.len(),
        "Reconstructed open/close history"
    );

    Reconstruction {
        intervals,
        average_duration,
        skipped,
    }
}

/// Parse raw records into OPEN/CLOSE events.
///
/// OTHER records are dropped without looking at their timestamp.
pub fn parse_records(records: &[RawChangeRecord]) -> (Vec<ChangeEvent>, Vec<SkippedRecord>) {
    let mut events = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match parse_record(record) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(reason) => {
                debug!(index, reason = %reason, "Skipping malformed change record");
                skipped.push(SkippedRecord { index, reason });
            }
        }
    }

    (events, skipped)
}

fn parse_record(record: &RawChangeRecord) -> Result<Option<ChangeEvent>, RecordError> {
    let kind = record
        .change_type
        .as_deref()
        .map(ChangeKind::from_change_type)
        .ok_or_else(|| missing_or_invalid(record, RecordError::MissingKind))?;

    if !kind.is_transition() {
        return Ok(None);
    }

    let raw_ts = record
        .captured_at
        .as_deref()
        .ok_or_else(|| missing_or_invalid(record, RecordError::MissingTimestamp))?;
    let timestamp = parse_timestamp(raw_ts)?;

    Ok(Some(ChangeEvent::new(kind, timestamp)))
}

/// An absent field was either never sent or dropped for having the wrong type.
fn missing_or_invalid(record: &RawChangeRecord, missing: RecordError) -> RecordError {
    match &record.invalid {
        Some(reason) => RecordError::InvalidField(reason.clone()),
        None => missing,
    }
}

/// Pair chronologically sorted events into intervals.
///
/// A later OPEN replaces an unclosed earlier one, and a CLOSE with nothing
/// pending is ignored.
pub fn pair_events(
    events: &[ChangeEvent],
    current_available_seats: Option<i64>,
    now: DateTime<Utc>,
) -> Vec<Interval> {
    let mut intervals = Vec::new();
    let mut pending: Option<DateTime<Utc>> = None;

    for event in events {
        match event.kind {
            ChangeKind::Open => pending = Some(event.timestamp),
            ChangeKind::Close => {
                if let Some(opened_at) = pending.take() {
                    intervals.push(Interval::closed(opened_at, event.timestamp));
                }
            }
            ChangeKind::Other => {}
        }
    }

    if let Some(opened_at) = pending {
        // Full now, so the history just hasn't recorded the close yet.
        if current_available_seats == Some(0) {
            intervals.push(Interval::closed(opened_at, now));
        } else {
            intervals.push(Interval::still_open(opened_at, now));
        }
    }

    intervals
}

/// Mean interval duration, or `None` for an empty slice.
pub fn average_duration(intervals: &[Interval]) -> Option<TimeDelta> {
    if intervals.is_empty() {
        return None;
    }

    let count = i32::try_from(intervals.len()).ok()?;
    let total = intervals
        .iter()
        .fold(TimeDelta::zero(), |acc, interval| acc + interval.duration);

    Some(total / count)
}
