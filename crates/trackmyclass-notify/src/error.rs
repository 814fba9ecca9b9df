//! Notify endpoint error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type for notify operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Errors surfaced by the notify endpoint.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The chat platform does not know the user.
    #[error("user not found: {0}")]
    UserNotFound(i64),

    /// The chat platform refused or failed the send.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The outbound queue is at capacity.
    #[error("service unavailable: outbound queue is full")]
    QueueFull,

    /// The DM worker is gone.
    #[error("service unavailable: outbound worker stopped")]
    WorkerStopped,

    /// The worker did not answer in time.
    #[error("timed out waiting for delivery")]
    Timeout,
}

impl NotifyError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            NotifyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            NotifyError::UserNotFound(_) => StatusCode::NOT_FOUND,
            NotifyError::SendFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            NotifyError::QueueFull | NotifyError::WorkerStopped => StatusCode::SERVICE_UNAVAILABLE,
            NotifyError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for NotifyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_error_status_codes() {
        assert_eq!(
            NotifyError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(NotifyError::UserNotFound(7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            NotifyError::SendFailed("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(NotifyError::QueueFull.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(NotifyError::WorkerStopped.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(NotifyError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_notify_error_display() {
        assert_eq!(NotifyError::UserNotFound(42).to_string(), "user not found: 42");
        assert_eq!(
            NotifyError::SendFailed("bot was blocked".into()).to_string(),
            "send failed: bot was blocked"
        );
    }
}
