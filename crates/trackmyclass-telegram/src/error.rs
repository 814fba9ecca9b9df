//! Error types for the Telegram bot.

use thiserror::Error;
use trackmyclass_backend::BackendError;
use trackmyclass_core::ConfigError;

/// Errors that can stop the bot from starting or running.
#[derive(Debug, Error)]
pub enum BotError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The backend client could not be built.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),
}

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;
