//! Request and response DTOs for the notify endpoint.

use serde::{Deserialize, Serialize};
use trackmyclass_models::FlexibleId;

/// Body of `POST /notify`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotifyRequest {
    /// Recipient; the backend sends it as a string or a number.
    #[serde(default)]
    pub user_id: Option<FlexibleId>,
    /// Message text.
    #[serde(default)]
    pub content: String,
}

/// Successful delivery response.
#[derive(Debug, Clone, Serialize)]
pub struct NotifyResponse {
    pub status: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// DMs waiting for the worker.
    pub queued: usize,
}
