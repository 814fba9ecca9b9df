//! Type definitions for history reconstruction.

use chrono::TimeDelta;
use thiserror::Error;
use trackmyclass_models::Interval;

use crate::timefmt::TimestampError;

/// Default number of most-recent intervals kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Why a single change record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record has no `change_type`.
    #[error("missing change type")]
    MissingKind,

    /// An OPEN/CLOSE record has no `captured_at`.
    #[error("missing timestamp")]
    MissingTimestamp,

    /// The record is not an object, or a field has the wrong JSON type.
    #[error("invalid record: {0}")]
    InvalidField(String),

    /// An OPEN/CLOSE record has a `captured_at` that cannot be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(#[from] TimestampError),
}

/// A record that did not contribute to the reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the input.
    pub index: usize,
    pub reason: RecordError,
}

/// Settings for history lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of most-recent intervals returned.
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Result of reconstructing open/close intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    /// Intervals in chronological order of `opened_at`.
    pub intervals: Vec<Interval>,
    /// Mean duration of `intervals`; `None` when there are none.
    pub average_duration: Option<TimeDelta>,
    /// Records that were skipped because they were malformed.
    pub skipped: Vec<SkippedRecord>,
}

impl Reconstruction {
    /// True when no intervals were produced.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Intervals from most recent to oldest.
    pub fn newest_first(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter().rev()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
