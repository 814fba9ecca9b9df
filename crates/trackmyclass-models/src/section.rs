//! Section, subscription and X-Ray payloads returned by the backend.

use serde::{Deserialize, Serialize};

use crate::change::RawChangeRecord;
use crate::ids::SectionId;

/// Response of `POST /lookup_section_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLookup {
    pub section_id: SectionId,
}

/// Response of `GET /section/{section_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStatus {
    #[serde(default)]
    pub available_seats: Option<i64>,
}

/// A section the user is tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub title: String,
    pub section_id: SectionId,
    pub available_seats: i64,
}

/// Response of `POST /get_subscriptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionList {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

/// One seat-count snapshot in the X-Ray history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatChange {
    pub captured_at: String,
    pub available_seats: i64,
}

/// Response of `GET /xray/{class_number}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrayData {
    #[serde(default)]
    pub current_availability: Option<i64>,
    #[serde(default)]
    pub history: Vec<SeatChange>,
}

/// Response of `GET /class_open_history/{class_number}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenHistory {
    #[serde(default)]
    pub history: Vec<RawChangeRecord>,
}

/// Error body the backend sends with failed mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_list_defaults_to_empty() {
        let list: SubscriptionList = serde_json::from_str("{}").unwrap();
        assert!(list.subscriptions.is_empty());
    }

    #[test]
    fn test_xray_data_parses_backend_shape() {
        let json = r#"{
            "current_availability": -2,
            "history": [{"captured_at": "2024-05-01T10:00:00", "available_seats": -2}]
        }"#;
        let data: XrayData = serde_json::from_str(json).unwrap();
        assert_eq!(data.current_availability, Some(-2));
        assert_eq!(data.history.len(), 1);
        assert_eq!(data.history[0].available_seats, -2);
    }

    #[test]
    fn test_open_history_with_partial_records() {
        let json = r#"{"history": [{"change_type": "OPEN", "captured_at": "2024-05-01T10:00:00"}, {}]}"#;
        let history: OpenHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.history.len(), 2);
        assert_eq!(history.history[1], RawChangeRecord::default());
    }

    #[test]
    fn test_open_history_survives_one_bad_record() {
        let json = r#"{"history": [
            {"change_type": "OPEN", "captured_at": "2024-05-01T10:00:00"},
            {"change_type": "CLOSE", "captured_at": 1714557600},
            {"change_type": "CLOSE", "captured_at": "2024-05-01T11:00:00"},
            42
        ]}"#;
        let history: OpenHistory = serde_json::from_str(json).unwrap();

        assert_eq!(history.history.len(), 4);
        assert_eq!(history.history[0], RawChangeRecord::new("OPEN", "2024-05-01T10:00:00"));
        assert!(history.history[1].invalid.is_some());
        assert_eq!(history.history[2], RawChangeRecord::new("CLOSE", "2024-05-01T11:00:00"));
        assert!(history.history[3].invalid.is_some());
    }
}
