//! Wire and domain types for TrackMyClass.
//!
//! This crate holds the records exchanged with the backend API and the
//! domain types produced from them, such as open/close intervals.

pub mod change;
pub mod ids;
pub mod section;

pub use change::{ChangeEvent, ChangeKind, Interval, RawChangeRecord};
pub use ids::{FlexibleId, SectionId};
pub use section::{
    BackendErrorBody, OpenHistory, SeatChange, SectionLookup, SectionStatus, Subscription,
    SubscriptionList, XrayData,
};
