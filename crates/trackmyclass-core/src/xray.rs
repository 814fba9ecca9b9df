//! X-Ray report: current seat status plus recent seat adjustments.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use trackmyclass_models::XrayData;

use crate::timefmt::parse_timestamp;

/// Default number of seat changes listed in a report.
pub const DEFAULT_XRAY_LIMIT: usize = 5;

/// Errors building an X-Ray report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XrayError {
    #[error("backend did not report current availability")]
    MissingAvailability,
}

/// Seat status derived from the current availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityStatus {
    /// Negative seats: the section is over-enrolled.
    Impacted,
    /// Exactly zero seats.
    Full,
    /// Seats available.
    Open,
}

impl AvailabilityStatus {
    pub fn from_seats(seats: i64) -> Self {
        match seats {
            s if s < 0 => AvailabilityStatus::Impacted,
            0 => AvailabilityStatus::Full,
            _ => AvailabilityStatus::Open,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            AvailabilityStatus::Impacted => "❗",
            AvailabilityStatus::Full => "ℹ️",
            AvailabilityStatus::Open => "✅",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AvailabilityStatus::Impacted => "Impacted",
            AvailabilityStatus::Full => "Not Overloaded",
            AvailabilityStatus::Open => "Open",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            AvailabilityStatus::Impacted => "Negative seats",
            AvailabilityStatus::Full => "0 seats",
            AvailabilityStatus::Open => "Positive seats",
        }
    }
}

/// One listed seat change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatEntry {
    pub captured_at: DateTime<Utc>,
    pub available_seats: i64,
}

/// A ready-to-render X-Ray report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrayReport {
    pub status: AvailabilityStatus,
    pub current_availability: i64,
    /// Impacted sections list only reductions (negative counts); others
    /// list the latest adjustments in backend order.
    pub entries: Vec<SeatEntry>,
    /// Seat changes dropped because their timestamp did not parse.
    pub skipped: usize,
}

impl XrayReport {
    /// Build a report from backend data, listing at most `limit` entries.
    pub fn build(data: &XrayData, limit: usize) -> Result<Self, XrayError> {
        let current_availability = data
            .current_availability
            .ok_or(XrayError::MissingAvailability)?;
        let status = AvailabilityStatus::from_seats(current_availability);

        let mut skipped = 0;
        let entries: Vec<SeatEntry> = data
            .history
            .iter()
            .filter(|change| status != AvailabilityStatus::Impacted || change.available_seats < 0)
            .filter_map(|change| match parse_timestamp(&change.captured_at) {
                Ok(captured_at) => Some(SeatEntry {
                    captured_at,
                    available_seats: change.available_seats,
                }),
                Err(e) => {
                    debug!(error = %e, "Skipping seat change with bad timestamp");
                    skipped += 1;
                    None
                }
            })
            // Reductions are capped too; the card heading reads "Last 5".
            .take(limit)
            .collect();

        Ok(Self {
            status,
            current_availability,
            entries,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackmyclass_models::SeatChange;

    fn change(ts: &str, seats: i64) -> SeatChange {
        SeatChange {
            captured_at: ts.to_string(),
            available_seats: seats,
        }
    }

    #[test]
    fn test_status_from_seats() {
        assert_eq!(AvailabilityStatus::from_seats(-1), AvailabilityStatus::Impacted);
        assert_eq!(AvailabilityStatus::from_seats(0), AvailabilityStatus::Full);
        assert_eq!(AvailabilityStatus::from_seats(12), AvailabilityStatus::Open);
    }

    #[test]
    fn test_missing_availability_is_error() {
        let data = XrayData::default();
        assert_eq!(
            XrayReport::build(&data, DEFAULT_XRAY_LIMIT),
            Err(XrayError::MissingAvailability)
        );
    }

    #[test]
    fn test_impacted_lists_only_reductions() {
        let data = XrayData {
            current_availability: Some(-2),
            history: vec![
                change("2024-05-01T10:00:00", 3),
                change("2024-05-01T11:00:00", -1),
                change("2024-05-01T12:00:00", 0),
                change("2024-05-01T13:00:00", -2),
            ],
        };

        let report = XrayReport::build(&data, DEFAULT_XRAY_LIMIT).unwrap();

        assert_eq!(report.status, AvailabilityStatus::Impacted);
        let seats: Vec<_> = report.entries.iter().map(|e| e.available_seats).collect();
        assert_eq!(seats, vec![-1, -2]);
    }

    #[test]
    fn test_impacted_reductions_capped_at_limit() {
        let history = (1..=8)
            .map(|i| change(&format!("2024-05-0{}T09:00:00", i), -i))
            .collect();
        let data = XrayData {
            current_availability: Some(-3),
            history,
        };

        let report = XrayReport::build(&data, DEFAULT_XRAY_LIMIT).unwrap();

        let seats: Vec<_> = report.entries.iter().map(|e| e.available_seats).collect();
        assert_eq!(seats, vec![-1, -2, -3, -4, -5]);
    }

    #[test]
    fn test_open_lists_first_entries_up_to_limit() {
        let history = (0..8)
            .map(|i| change(&format!("2024-05-0{}T09:00:00", i + 1), i))
            .collect();
        let data = XrayData {
            current_availability: Some(4),
            history,
        };

        let report = XrayReport::build(&data, 5).unwrap();

        assert_eq!(report.status, AvailabilityStatus::Open);
        let seats: Vec<_> = report.entries.iter().map(|e| e.available_seats).collect();
        assert_eq!(seats, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_bad_timestamps_are_counted() {
        let data = XrayData {
            current_availability: Some(0),
            history: vec![change("soon", 1), change("2024-05-01T09:00:00", 0)],
        };

        let report = XrayReport::build(&data, DEFAULT_XRAY_LIMIT).unwrap();

        assert_eq!(report.status, AvailabilityStatus::Full);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.skipped, 1);
    }
}
