//! Telegram bot for TrackMyClass.
//!
//! Users register, subscribe to class sections and inspect seat history
//! from Telegram. The backend pushes seat alerts through the notify
//! endpoint, which this crate wires to a worker that sends the DMs.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//!
//! Optional:
//! - `TRACKMYCLASS_API_URL`: Backend base URL (default: http://127.0.0.1:5000)
//! - `TRACKMYCLASS_NOTIFY_PORT`: Notify listener port (default: 5001)
//!
//! # Example
//!
//! ```no_run
//! use trackmyclass_core::BotConfig;
//! use trackmyclass_telegram::TrackMyClassBot;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::from_env()?;
//!     let bot = TrackMyClassBot::new(config)?;
//!     bot.start_polling().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start` - Register with the backend
//! - `/subscribe <class>` - Track a class (private chat only)
//! - `/unsubscribe <class>` - Stop tracking a class
//! - `/subscriptions` - List tracked classes
//! - `/xray <class>` - Seat status and recent adjustments
//! - `/history <class>` - Recent open/close intervals
//! - `/testdm` - Check that the bot can DM you

pub mod bot;
pub mod dm_worker;
pub mod error;
pub mod handlers;
pub mod render;
pub mod state;

pub use bot::TrackMyClassBot;
pub use error::{BotError, Result};
pub use handlers::Command;
pub use state::BotState;
