//! Direct-message notification handler.

use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::error::{NotifyError, Result};
use crate::outbound::DeliveryOutcome;
use crate::state::NotifyState;
use crate::types::{NotifyRequest, NotifyResponse};

/// POST /notify - Deliver a direct message to a user.
pub async fn notify(
    State(state): State<NotifyState>,
    Json(req): Json<NotifyRequest>,
) -> Result<Json<NotifyResponse>> {
    let user_id = req
        .user_id
        .as_ref()
        .and_then(|id| id.as_i64())
        .filter(|id| *id != 0)
        .ok_or_else(|| NotifyError::BadRequest("missing or invalid user_id".to_string()))?;

    if req.content.trim().is_empty() {
        return Err(NotifyError::BadRequest("content is empty".to_string()));
    }

    match state.dispatcher.dispatch(user_id, req.content).await? {
        DeliveryOutcome::Delivered => {
            info!(user_id, "Notification delivered");
            Ok(Json(NotifyResponse {
                status: "ok".to_string(),
            }))
        }
        DeliveryOutcome::UserNotFound => {
            warn!(user_id, "Notification recipient not found");
            Err(NotifyError::UserNotFound(user_id))
        }
        DeliveryOutcome::Failed(reason) => {
            warn!(user_id, reason = %reason, "Failed to deliver notification");
            Err(NotifyError::SendFailed(reason))
        }
    }
}
