//! Error types for the Mindful check-in client.

use std::time::Duration;

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors talking to the REST backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No authentication token found")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Whether the failure is likely transient (network, 429, 5xx).
    ///
    /// Nothing retries automatically; this only decides how loudly a failure
    /// is logged and lets callers hint "try again later".
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Timeout(_) => true,
            Self::MissingCredential | Self::InvalidResponse(_) => false,
        }
    }
}

/// Credential persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to persist credentials to {path}: {reason}")]
    Persist { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
