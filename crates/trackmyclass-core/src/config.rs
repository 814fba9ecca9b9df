//! Configuration for TrackMyClass.
//!
//! Settings come from environment variables, optionally seeded from
//! `.env` files. Local state lives under `~/.trackmyclass/`.
//!
//! # Environment Variables
//!
//! - `TELEGRAM_BOT_TOKEN`: Bot token (required)
//! - `TRACKMYCLASS_API_URL`: Backend base URL (default `http://127.0.0.1:5000`)
//! - `TRACKMYCLASS_NOTIFY_HOST`: Notify listener host (default `127.0.0.1`)
//! - `TRACKMYCLASS_NOTIFY_PORT`: Notify listener port (default `5001`)
//! - `TRACKMYCLASS_HISTORY_LIMIT`: Intervals shown by `/history` (default `5`)
//! - `TRACKMYCLASS_REQUEST_TIMEOUT_SECS`: Backend request timeout (default `5`)
//! - `TRACKMYCLASS_DM_QUEUE_CAPACITY`: Pending notify DMs (default `64`)
//! - `TRACKMYCLASS_STATE_DIR`: Override the state directory

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::history::DEFAULT_HISTORY_LIMIT;

pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const API_URL_ENV: &str = "TRACKMYCLASS_API_URL";
pub const NOTIFY_HOST_ENV: &str = "TRACKMYCLASS_NOTIFY_HOST";
pub const NOTIFY_PORT_ENV: &str = "TRACKMYCLASS_NOTIFY_PORT";
pub const HISTORY_LIMIT_ENV: &str = "TRACKMYCLASS_HISTORY_LIMIT";
pub const REQUEST_TIMEOUT_ENV: &str = "TRACKMYCLASS_REQUEST_TIMEOUT_SECS";
pub const DM_QUEUE_CAPACITY_ENV: &str = "TRACKMYCLASS_DM_QUEUE_CAPACITY";
pub const STATE_DIR_ENV: &str = "TRACKMYCLASS_STATE_DIR";

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_NOTIFY_HOST: &str = "127.0.0.1";
const DEFAULT_NOTIFY_PORT: u16 = 5001;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
const DEFAULT_DM_QUEUE_CAPACITY: usize = 64;

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".trackmyclass";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    MissingVar(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid backend URL {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Get the TrackMyClass state directory.
///
/// `TRACKMYCLASS_STATE_DIR` if set, else `~/.trackmyclass`, else
/// `.trackmyclass` in the current directory.
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Get the `.env.local` file path inside the state directory.
pub fn env_file() -> PathBuf {
    state_dir().join(".env.local")
}

/// Load environment files without overriding variables already set.
///
/// The state directory's `.env.local` is read first, then `.env.local`
/// or `.env` in the working directory.
pub fn load_env_files() {
    let path = env_file();
    if path.exists() {
        match dotenvy::from_path(&path) {
            Ok(()) => debug!(path = %path.display(), "Loaded env file"),
            Err(e) => debug!(path = %path.display(), error = %e, "Could not load env file"),
        }
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());
}

/// Runtime configuration for the bot process.
///
/// The backend at `api_url` is expected to write `captured_at` either with
/// an offset or in UTC. Naive timestamps are read as UTC and compared with
/// the bot's UTC clock, so a backend writing naive local time skews the
/// duration of a still-open interval by its UTC offset.
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    /// Backend base URL, always ending in `/`.
    pub api_url: Url,
    pub notify_host: String,
    pub notify_port: u16,
    pub history_limit: usize,
    pub request_timeout: Duration,
    pub dm_queue_capacity: usize,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("api_url", &self.api_url.as_str())
            .field("notify_host", &self.notify_host)
            .field("notify_port", &self.notify_port)
            .field("history_limit", &self.history_limit)
            .field("request_timeout", &self.request_timeout)
            .field("dm_queue_capacity", &self.dm_queue_capacity)
            .finish()
    }
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bot_token = get(BOT_TOKEN_ENV).ok_or(ConfigError::MissingVar(BOT_TOKEN_ENV))?;
        let api_url = parse_base_url(get(API_URL_ENV).as_deref().unwrap_or(DEFAULT_API_URL))?;
        let notify_host = get(NOTIFY_HOST_ENV).unwrap_or_else(|| DEFAULT_NOTIFY_HOST.to_string());
        let notify_port = parse_or(get(NOTIFY_PORT_ENV), NOTIFY_PORT_ENV, DEFAULT_NOTIFY_PORT)?;
        let history_limit = parse_positive(
            get(HISTORY_LIMIT_ENV),
            HISTORY_LIMIT_ENV,
            DEFAULT_HISTORY_LIMIT,
        )?;
        let timeout_secs = parse_positive(
            get(REQUEST_TIMEOUT_ENV),
            REQUEST_TIMEOUT_ENV,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let dm_queue_capacity = parse_positive(
            get(DM_QUEUE_CAPACITY_ENV),
            DM_QUEUE_CAPACITY_ENV,
            DEFAULT_DM_QUEUE_CAPACITY,
        )?;

        Ok(Self {
            bot_token,
            api_url,
            notify_host,
            notify_port,
            history_limit,
            request_timeout: Duration::from_secs(timeout_secs),
            dm_queue_capacity,
        })
    }

    /// Replace the backend URL.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_base_url(raw)?;
        Ok(self)
    }

    /// Returns the notify listener bind address.
    pub fn notify_bind_address(&self) -> String {
        format!("{}:{}", self.notify_host, self.notify_port)
    }
}

/// Parse a base URL so that relative joins append to its path.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    let url = Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl {
        value: raw.to_string(),
        source,
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            key: API_URL_ENV,
            value: raw.to_string(),
        });
    }

    Ok(url)
}

fn parse_or<T: FromStr>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: v }),
    }
}

fn parse_positive<T>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    match value {
        None => Ok(default),
        Some(v) => match v.trim().parse::<T>() {
            Ok(n) if n > T::default() => Ok(n),
            _ => Err(ConfigError::InvalidValue { key, value: v }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "123:abc")])).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.notify_bind_address(), "127.0.0.1:5001");
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.dm_queue_capacity, 64);
    }

    #[test]
    fn test_missing_token() {
        let err = BotConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(BOT_TOKEN_ENV)));

        let err = BotConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }

    #[test]
    fn test_overrides() {
        let config = BotConfig::from_lookup(lookup(&[
            (BOT_TOKEN_ENV, "t"),
            (API_URL_ENV, "https://api.example.edu/v1"),
            (NOTIFY_HOST_ENV, "0.0.0.0"),
            (NOTIFY_PORT_ENV, "6000"),
            (HISTORY_LIMIT_ENV, "8"),
            (REQUEST_TIMEOUT_ENV, "12"),
            (DM_QUEUE_CAPACITY_ENV, "4"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.as_str(), "https://api.example.edu/v1/");
        assert_eq!(config.notify_bind_address(), "0.0.0.0:6000");
        assert_eq!(config.history_limit, 8);
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert_eq!(config.dm_queue_capacity, 4);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = BotConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "t"), (NOTIFY_PORT_ENV, "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: NOTIFY_PORT_ENV, .. }));

        let err = BotConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "t"), (DM_QUEUE_CAPACITY_ENV, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: DM_QUEUE_CAPACITY_ENV, .. }));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_base_url("ftp://files.example.edu"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_with_api_url() {
        let config = BotConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "t")]))
            .unwrap()
            .with_api_url("http://localhost:8080")
            .unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = BotConfig::from_lookup(lookup(&[(BOT_TOKEN_ENV, "secret-token")])).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_env_file_name() {
        assert!(env_file().ends_with(".env.local"));
    }
}
