//! Error types for backend calls.

use thiserror::Error;

/// Errors talking to the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure, timeout, or undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an unexpected status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// An endpoint URL could not be built.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
