//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default REST backend base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, e.g. `http://localhost:8080/api`.
    pub api_base_url: String,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Upper bound on a check-in submission. `None` waits indefinitely.
    pub submit_timeout: Option<Duration>,
    /// Where the signed-in session is persisted. `None` keeps it in memory only.
    pub credential_path: Option<PathBuf>,
    /// Page size used when listing history.
    pub history_page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            submit_timeout: Some(Duration::from_secs(60)),
            credential_path: default_credential_path(),
            history_page_size: 10,
        }
    }
}

impl ClientConfig {
    /// Build configuration from `MINDFUL_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("MINDFUL_API_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "MINDFUL_API_URL".into(),
                    message: "must not be empty".into(),
                });
            }
            config.api_base_url = url;
        }

        if let Some(secs) = lookup("MINDFUL_REQUEST_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_u64("MINDFUL_REQUEST_TIMEOUT_SECS", &secs)?);
        }

        if let Some(secs) = lookup("MINDFUL_SUBMIT_TIMEOUT_SECS") {
            config.submit_timeout = match parse_u64("MINDFUL_SUBMIT_TIMEOUT_SECS", &secs)? {
                0 => None,
                n => Some(Duration::from_secs(n)),
            };
        }

        if let Some(path) = lookup("MINDFUL_CREDENTIALS") {
            config.credential_path = Some(PathBuf::from(path));
        }

        if let Some(size) = lookup("MINDFUL_HISTORY_PAGE_SIZE") {
            let size = parse_u64("MINDFUL_HISTORY_PAGE_SIZE", &size)?;
            if size == 0 || size > u32::MAX as u64 {
                return Err(ConfigError::InvalidValue {
                    key: "MINDFUL_HISTORY_PAGE_SIZE".into(),
                    message: format!("{size} is out of range"),
                });
            }
            config.history_page_size = size as u32;
        }

        Ok(config)
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{raw:?}: {e}"),
    })
}

fn default_credential_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".mindful/credentials.json"))
}
