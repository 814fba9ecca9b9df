//! Notify listener configuration.

use std::time::{Duration, Instant};

/// Default time the handler waits for a delivery verdict.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Notify listener configuration.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// How long `/notify` waits for the DM worker.
    pub reply_timeout: Duration,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl NotifyConfig {
    /// Creates a configuration with the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Sets the delivery reply timeout.
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Returns the bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            start_time: Instant::now(),
        }
    }
}
