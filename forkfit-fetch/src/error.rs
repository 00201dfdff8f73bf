//! Fetch error types.

use forkfit_core::{CoreError, truncate_body};
use thiserror::Error;

/// Error type for upstream calls.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A required secret or credential is missing.
    #[error("Missing configuration: {0}")]
    Configuration(String),

    /// Upstream answered with a non-success status.
    #[error("{service} {status}: {body}")]
    Upstream {
        /// Upstream label (e.g. "FatSecret OAuth2").
        service: String,
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// Invalid response from the upstream.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The system random source failed.
    #[error("Random source unavailable")]
    Random,
}

impl FetchError {
    /// Builds an upstream error, truncating the body excerpt.
    pub fn upstream(service: impl Into<String>, status: u16, body: &str) -> Self {
        Self::Upstream {
            service: service.into(),
            status,
            body: truncate_body(body),
        }
    }

    /// Returns the upstream HTTP status, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the upstream body excerpt, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Upstream { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<FetchError> for CoreError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Configuration(msg) => CoreError::Configuration(msg),
            FetchError::Upstream {
                service,
                status,
                body,
            } => CoreError::Upstream {
                service,
                status,
                body,
            },
            FetchError::Http(e) if e.is_timeout() => {
                CoreError::Transport(format!("Request timed out: {e}"))
            }
            FetchError::Http(e) if e.is_connect() => {
                CoreError::Transport(format!("Connection failed: {e}"))
            }
            FetchError::Http(e) => CoreError::Transport(e.to_string()),
            FetchError::InvalidResponse(msg) => CoreError::InvalidResponse(msg),
            FetchError::Json(e) => CoreError::InvalidResponse(e.to_string()),
            FetchError::InvalidUrl(msg) => CoreError::Configuration(format!("Invalid URL: {msg}")),
            FetchError::Random => CoreError::Transport("random source unavailable".to_string()),
        }
    }
}
