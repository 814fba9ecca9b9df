//! Seat-availability change records and the intervals derived from them.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A change record exactly as the backend returns it.
///
/// Decoding never fails: missing or null fields become `None`, and a
/// non-object entry or a non-string field is recorded in `invalid` so the
/// record can be reported instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct RawChangeRecord {
    /// Free-text change type, e.g. `"OPEN"`, `"close"`, `"SEAT_CHANGE"`.
    pub change_type: Option<String>,
    /// ISO-8601-like capture time.
    pub captured_at: Option<String>,
    /// What was wrong with the wire value, if anything.
    #[serde(skip)]
    pub invalid: Option<String>,
}

impl RawChangeRecord {
    /// Creates a record with both fields present.
    pub fn new(change_type: impl Into<String>, captured_at: impl Into<String>) -> Self {
        Self {
            change_type: Some(change_type.into()),
            captured_at: Some(captured_at.into()),
            invalid: None,
        }
    }
}

impl From<Value> for RawChangeRecord {
    fn from(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self {
                invalid: Some(format!("expected an object, got {}", value)),
                ..Self::default()
            };
        };

        let mut invalid = None;
        let change_type = string_field(&map, "change_type", &mut invalid);
        let captured_at = string_field(&map, "captured_at", &mut invalid);

        Self {
            change_type,
            captured_at,
            invalid,
        }
    }
}

fn string_field(map: &Map<String, Value>, key: &str, invalid: &mut Option<String>) -> Option<String> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            invalid.get_or_insert_with(|| format!("{} is not a string: {}", key, other));
            None
        }
    }
}

/// Kind of availability transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The section started having open seats.
    Open,
    /// The section stopped having open seats.
    Close,
    /// Any other adjustment.
    Other,
}

impl ChangeKind {
    /// Classifies a free-text change type, ignoring ASCII case.
    pub fn from_change_type(s: &str) -> Self {
        if s.eq_ignore_ascii_case("OPEN") {
            ChangeKind::Open
        } else if s.eq_ignore_ascii_case("CLOSE") {
            ChangeKind::Close
        } else {
            ChangeKind::Other
        }
    }

    /// Returns true for OPEN and CLOSE.
    pub fn is_transition(&self) -> bool {
        !matches!(self, ChangeKind::Other)
    }
}

/// A parsed change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, timestamp: DateTime<Utc>) -> Self {
        Self { kind, timestamp }
    }
}

/// A span during which a section had open seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// When the section opened.
    pub opened_at: DateTime<Utc>,
    /// When it closed; `None` means it is still open.
    pub closed_at: Option<DateTime<Utc>>,
    /// `closed_at` (or the reference "now") minus `opened_at`.
    pub duration: TimeDelta,
}

impl Interval {
    /// An interval with a known end.
    pub fn closed(opened_at: DateTime<Utc>, closed_at: DateTime<Utc>) -> Self {
        Self {
            opened_at,
            closed_at: Some(closed_at),
            duration: closed_at - opened_at,
        }
    }

    /// An interval that is still open, measured up to `now`.
    pub fn still_open(opened_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            opened_at,
            closed_at: None,
            duration: now - opened_at,
        }
    }

    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}
