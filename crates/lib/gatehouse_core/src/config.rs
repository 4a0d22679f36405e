//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::storage::default_storage_path;

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Fixed per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Refresh period used by every polling view.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Configuration for a Gatehouse client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the REST backend (e.g. "http://localhost:8000/api").
    pub api_base_url: String,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
    /// Period of dashboard polling.
    pub poll_interval: Duration,
    /// Location of the persisted client state.
    pub storage_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            storage_path: default_storage_path(),
        }
    }
}

impl ClientConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                     | Default                              |
    /// |------------------------------|--------------------------------------|
    /// | `GATEHOUSE_API_URL`          | `http://localhost:8000/api`          |
    /// | `GATEHOUSE_STORAGE_PATH`     | `<data_dir>/gatehouse/storage.json`  |
    /// | `GATEHOUSE_POLL_INTERVAL_MS` | `3000`                               |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: std::env::var("GATEHOUSE_API_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            request_timeout: defaults.request_timeout,
            poll_interval: std::env::var("GATEHOUSE_POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| parse_interval_ms(&v))
                .unwrap_or(defaults.poll_interval),
            storage_path: std::env::var("GATEHOUSE_STORAGE_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
        }
    }
}

/// Parse a positive millisecond count.
fn parse_interval_ms(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(ms) => Some(Duration::from_millis(ms)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert!(config.storage_path.ends_with("gatehouse/storage.json"));
    }

    #[test]
    fn parse_interval_rejects_zero_and_garbage() {
        assert_eq!(parse_interval_ms("0"), None);
        assert_eq!(parse_interval_ms("soon"), None);
        assert_eq!(parse_interval_ms(" 1500 "), Some(Duration::from_millis(1500)));
    }
}
