//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOGOUT_TIMEOUT_SECS: u64 = 5;
pub const STATE_DIR_NAME: &str = ".watchlog";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid WATCHLOG_API_URL '{0}': expected http:// or https://")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
    pub logout_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            logout_secs: DEFAULT_LOGOUT_TIMEOUT_SECS,
        }
    }
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    #[must_use]
    pub fn logout(&self) -> Duration {
        Duration::from_secs(self.logout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub state_dir: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `WATCHLOG_API_URL`: server base URL, default `http://127.0.0.1:5000`
    /// - `WATCHLOG_STATE_DIR`: where `session.json` lives, default `$HOME/.watchlog`
    /// - `WATCHLOG_REQUEST_TIMEOUT_SECS`: default 30
    /// - `WATCHLOG_CONNECT_TIMEOUT_SECS`: default 10
    /// - `WATCHLOG_LOGOUT_TIMEOUT_SECS`: default 5
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(env_string("WATCHLOG_API_URL").as_deref().unwrap_or(DEFAULT_API_URL))?;
        let state_dir = env_string("WATCHLOG_STATE_DIR").map_or_else(default_state_dir, PathBuf::from);
        let timeouts = Timeouts {
            request_secs: env_parse_u64("WATCHLOG_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("WATCHLOG_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            logout_secs: env_parse_u64("WATCHLOG_LOGOUT_TIMEOUT_SECS", DEFAULT_LOGOUT_TIMEOUT_SECS),
        };

        Ok(Self { api_url, state_dir, timeouts })
    }

    /// Replace the API URL, applying the same validation as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an http(s) URL.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(raw)?;
        Ok(self)
    }

    /// Path of the persisted session document.
    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }
}

fn env_string(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_owned()),
        _ => None,
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    match env_string(key).map(|v| v.parse::<u64>()) {
        Some(Ok(value)) => value,
        _ => default,
    }
}

pub(crate) fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidApiUrl(raw.to_owned()))
    }
}

fn default_state_dir() -> PathBuf {
    match env_string("HOME") {
        Some(home) => PathBuf::from(home).join(STATE_DIR_NAME),
        None => PathBuf::from(STATE_DIR_NAME),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
