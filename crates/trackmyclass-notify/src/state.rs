//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::NotifyConfig;
use crate::outbound::DmDispatcher;

/// State shared by all notify handlers.
#[derive(Clone)]
pub struct NotifyState {
    pub config: Arc<NotifyConfig>,
    pub dispatcher: DmDispatcher,
}

impl NotifyState {
    pub fn new(config: NotifyConfig, dispatcher: DmDispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }
}
