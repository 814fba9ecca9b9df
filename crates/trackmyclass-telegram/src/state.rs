//! State shared by the command handlers.

use trackmyclass_backend::BackendClient;
use trackmyclass_core::{BotConfig, HistoryConfig};

use crate::error::Result;

/// Handler state: the backend client plus lookup settings.
#[derive(Debug, Clone)]
pub struct BotState {
    pub backend: BackendClient,
    pub history: HistoryConfig,
}

impl BotState {
    pub fn new(backend: BackendClient, history: HistoryConfig) -> Self {
        Self { backend, history }
    }

    /// Build state from the process configuration.
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let backend = BackendClient::new(config.api_url.clone(), config.request_timeout)?;
        Ok(Self::new(
            backend,
            HistoryConfig {
                limit: config.history_limit,
            },
        ))
    }
}
