//! Caller-facing error taxonomy for `ForkFit`.

use thiserror::Error;

/// Upper bound on how much of an upstream body is embedded in an error.
pub const MAX_ERROR_BODY_CHARS: usize = 1000;

/// Error type returned by every callable function.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No caller identity was attached to the call.
    #[error("Sign-in required")]
    Unauthenticated,

    /// Missing or malformed required input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required secret or credential is not configured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A third-party API answered with a non-success status.
    #[error("{service} error ({status}): {body}")]
    Upstream {
        /// Which upstream produced the error.
        service: String,
        /// HTTP status code.
        status: u16,
        /// Response body excerpt (at most [`MAX_ERROR_BODY_CHARS`] characters).
        body: String,
    },

    /// The lookup resolved to nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The upstream answered successfully but the payload was unusable.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CoreError {
    /// Builds an upstream error, truncating the body excerpt.
    pub fn upstream(service: impl Into<String>, status: u16, body: &str) -> Self {
        Self::Upstream {
            service: service.into(),
            status,
            body: truncate_body(body),
        }
    }

    /// Stable, machine-readable error code for the JSON surface.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::InvalidArgument(_) => "invalid-argument",
            Self::Configuration(_) => "failed-precondition",
            Self::NotFound(_) => "not-found",
            Self::Upstream { .. } | Self::Transport(_) | Self::InvalidResponse(_) => "internal",
        }
    }

    /// Returns the upstream HTTP status, if this error carries one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Cuts `body` down to [`MAX_ERROR_BODY_CHARS`] characters.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
