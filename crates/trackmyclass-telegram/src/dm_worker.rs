//! Delivers backend-initiated direct messages.
//!
//! The notify endpoint queues [`OutboundDm`]s; this worker owns the bot
//! handle, sends each message and answers with a [`DeliveryOutcome`].

use teloxide::prelude::*;
use teloxide::{ApiError, RequestError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use trackmyclass_notify::{DeliveryOutcome, OutboundDm};

/// Run until every [`trackmyclass_notify::DmDispatcher`] is dropped.
pub async fn run_dm_worker(bot: Bot, mut outbound: mpsc::Receiver<OutboundDm>) {
    info!("DM worker started");

    while let Some(dm) = outbound.recv().await {
        let outcome = match bot.send_message(ChatId(dm.user_id), dm.content.clone()).await {
            Ok(_) => {
                debug!(id = %dm.id, user_id = dm.user_id, "DM delivered");
                DeliveryOutcome::Delivered
            }
            Err(e) => {
                warn!(id = %dm.id, user_id = dm.user_id, error = %e, "DM delivery failed");
                classify_send_error(&e)
            }
        };
        dm.reply(outcome);
    }

    info!("DM worker stopped");
}

/// Map a send failure onto a delivery verdict.
pub fn classify_send_error(err: &RequestError) -> DeliveryOutcome {
    match err {
        RequestError::Api(ApiError::ChatNotFound | ApiError::UserNotFound) => {
            DeliveryOutcome::UserNotFound
        }
        other => DeliveryOutcome::Failed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_chat_is_user_not_found() {
        assert_eq!(
            classify_send_error(&RequestError::Api(ApiError::ChatNotFound)),
            DeliveryOutcome::UserNotFound
        );
        assert_eq!(
            classify_send_error(&RequestError::Api(ApiError::UserNotFound)),
            DeliveryOutcome::UserNotFound
        );
    }

    #[test]
    fn test_other_errors_fail() {
        let outcome = classify_send_error(&RequestError::Api(ApiError::BotBlocked));
        assert!(matches!(outcome, DeliveryOutcome::Failed(reason) if !reason.is_empty()));
    }
}
