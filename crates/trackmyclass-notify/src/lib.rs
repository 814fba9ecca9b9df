//! Inbound notification endpoint for TrackMyClass.
//!
//! The backend pushes direct messages for users through `POST /notify`.
//! Requests are queued on a bounded channel and delivered by a worker that
//! owns the chat client; the HTTP handler waits for the worker's verdict.
//!
//! # Example
//!
//! ```ignore
//! use trackmyclass_notify::{dm_channel, serve, NotifyConfig, NotifyState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NotifyConfig::default();
//!     let (dispatcher, mut outbound) = dm_channel(64, config.reply_timeout);
//!
//!     tokio::spawn(async move {
//!         while let Some(dm) = outbound.recv().await {
//!             // deliver dm.content to dm.user_id, then:
//!             dm.reply(trackmyclass_notify::DeliveryOutcome::Delivered);
//!         }
//!     });
//!
//!     serve(NotifyState::new(config, dispatcher)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod outbound;
pub mod router;
pub mod state;
pub mod types;

pub use config::NotifyConfig;
pub use error::{NotifyError, Result};
pub use outbound::{dm_channel, DeliveryOutcome, DmDispatcher, OutboundDm};
pub use router::{create_router, serve};
pub use state::NotifyState;
