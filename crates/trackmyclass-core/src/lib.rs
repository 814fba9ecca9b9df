//! TrackMyClass Core - logic shared by the bot and its services.
//!
//! Nothing in this crate performs network I/O:
//!
//! - **history**: Rebuild open/close intervals from seat-change records
//! - **xray**: Classify current seats and pick recent seat adjustments
//! - **timefmt**: Parse backend timestamps and format times/durations
//! - **config**: Environment-driven configuration

pub mod config;
pub mod history;
pub mod timefmt;
pub mod xray;

pub use config::{load_env_files, parse_base_url, state_dir, BotConfig, ConfigError};
pub use history::{
    average_duration, pair_events, parse_records, reconstruct, HistoryConfig, Reconstruction,
    RecordError, SkippedRecord, DEFAULT_HISTORY_LIMIT,
};
pub use timefmt::{
    format_duration, format_history_time, format_xray_time, parse_timestamp, TimestampError,
};
pub use xray::{AvailabilityStatus, SeatEntry, XrayError, XrayReport, DEFAULT_XRAY_LIMIT};
