//! Hand-off between the notify endpoint and the DM worker.
//!
//! Each accepted `/notify` request becomes an [`OutboundDm`] on a bounded
//! channel. The worker delivers it and answers through the envelope's
//! oneshot reply slot.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{NotifyError, Result};

/// Verdict the DM worker returns for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    UserNotFound,
    Failed(String),
}

/// A direct message waiting for delivery.
#[derive(Debug)]
pub struct OutboundDm {
    /// Correlation ID for logs.
    pub id: Uuid,
    /// Chat-platform user ID.
    pub user_id: i64,
    pub content: String,
    reply: oneshot::Sender<DeliveryOutcome>,
}

impl OutboundDm {
    /// Report the delivery verdict back to the waiting request.
    pub fn reply(self, outcome: DeliveryOutcome) {
        if self.reply.send(outcome).is_err() {
            debug!(id = %self.id, "Notify request went away before delivery verdict");
        }
    }
}

/// Sending half used by the HTTP handler.
#[derive(Debug, Clone)]
pub struct DmDispatcher {
    tx: mpsc::Sender<OutboundDm>,
    reply_timeout: Duration,
}

/// Create a bounded DM channel.
///
/// A zero `capacity` is raised to one.
pub fn dm_channel(capacity: usize, reply_timeout: Duration) -> (DmDispatcher, mpsc::Receiver<OutboundDm>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (DmDispatcher { tx, reply_timeout }, rx)
}

impl DmDispatcher {
    /// Queue a DM and wait for its delivery verdict.
    ///
    /// Fails fast with [`NotifyError::QueueFull`] instead of waiting for
    /// room on the channel.
    pub async fn dispatch(&self, user_id: i64, content: String) -> Result<DeliveryOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let dm = OutboundDm {
            id: Uuid::new_v4(),
            user_id,
            content,
            reply: reply_tx,
        };
        let id = dm.id;

        self.tx.try_send(dm).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                warn!(user_id, "Outbound DM queue is full");
                NotifyError::QueueFull
            }
            mpsc::error::TrySendError::Closed(_) => NotifyError::WorkerStopped,
        })?;
        debug!(id = %id, user_id, "Queued outbound DM");

        match tokio::time::timeout(self.reply_timeout, reply_rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(NotifyError::WorkerStopped),
            Err(_) => {
                warn!(id = %id, user_id, "Timed out waiting for DM delivery");
                Err(NotifyError::Timeout)
            }
        }
    }

    /// Number of DMs currently waiting in the queue.
    pub fn queued(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatch_returns_worker_verdict() {
        let (dispatcher, mut rx) = dm_channel(4, Duration::from_secs(1));
        tokio::spawn(async move {
            while let Some(dm) = rx.recv().await {
                let outcome = if dm.user_id == 1 {
                    DeliveryOutcome::Delivered
                } else {
                    DeliveryOutcome::UserNotFound
                };
                dm.reply(outcome);
            }
        });

        assert_eq!(
            dispatcher.dispatch(1, "hi".into()).await.unwrap(),
            DeliveryOutcome::Delivered
        );
        assert_eq!(
            dispatcher.dispatch(2, "hi".into()).await.unwrap(),
            DeliveryOutcome::UserNotFound
        );
    }

    #[tokio::test]
    async fn test_dispatch_queue_full() {
        let (dispatcher, _rx) = dm_channel(1, Duration::from_millis(50));

        // First DM occupies the only slot and times out unanswered.
        let first = dispatcher.dispatch(1, "a".into()).await;
        assert!(matches!(first, Err(NotifyError::Timeout)));
        assert_eq!(dispatcher.queued(), 1);

        let second = dispatcher.dispatch(1, "b".into()).await;
        assert!(matches!(second, Err(NotifyError::QueueFull)));
    }

    #[tokio::test]
    async fn test_dispatch_worker_stopped() {
        let (dispatcher, rx) = dm_channel(1, Duration::from_secs(1));
        drop(rx);

        let result = dispatcher.dispatch(1, "a".into()).await;
        assert!(matches!(result, Err(NotifyError::WorkerStopped)));
    }

    #[tokio::test]
    async fn test_dropped_envelope_reports_worker_stopped() {
        let (dispatcher, mut rx) = dm_channel(1, Duration::from_secs(1));
        tokio::spawn(async move {
            let dm = rx.recv().await;
            drop(dm);
        });

        let result = dispatcher.dispatch(1, "a".into()).await;
        assert!(matches!(result, Err(NotifyError::WorkerStopped)));
    }
}
