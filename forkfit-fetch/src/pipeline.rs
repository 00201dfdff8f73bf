//! Fallback pipeline for dual-protocol calls.
//!
//! The pipeline takes one call per protocol and runs them according to the
//! configured [`AuthMode`]:
//!
//! - `Modern` / `Legacy`: only that call runs; its error propagates untouched.
//! - `Automatic`: the modern call runs first. On any error the legacy call
//!   runs exactly once and its result (or its error) is returned. The modern
//!   error is logged and kept in the attempt list only.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use crate::error::FetchError;
use crate::mode::AuthMode;

// ============================================================================
// Protocol
// ============================================================================

/// One of the two authentication protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Bearer-token protocol.
    Modern,
    /// Signed-request protocol.
    Legacy,
}

impl Protocol {
    /// Returns the display name for this protocol.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Modern => "OAuth2",
            Self::Legacy => "OAuth1",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Fallback Attempt
// ============================================================================

/// Record of a single protocol attempt.
#[derive(Debug, Clone)]
pub struct FallbackAttempt {
    /// The protocol that was attempted.
    pub protocol: Protocol,
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Error if the attempt failed.
    pub error: Option<String>,
    /// How long the attempt took.
    pub duration: Duration,
}

impl FallbackAttempt {
    /// Creates a successful attempt record.
    pub fn success(protocol: Protocol, duration: Duration) -> Self {
        Self {
            protocol,
            success: true,
            error: None,
            duration,
        }
    }

    /// Creates a failed attempt record.
    pub fn failure(protocol: Protocol, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            protocol,
            success: false,
            error: Some(error.into()),
            duration,
        }
    }
}

// ============================================================================
// Fallback Outcome
// ============================================================================

/// The outcome of a pipeline execution.
#[derive(Debug)]
pub struct FallbackOutcome<T> {
    /// The result (success or final error).
    pub result: Result<T, FetchError>,
    /// All attempts made, in order.
    pub attempts: Vec<FallbackAttempt>,
    /// Total duration of all attempts.
    pub duration: Duration,
}

impl<T> FallbackOutcome<T> {
    /// Returns the number of protocols that were tried.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }

    /// Returns the protocol that produced the result, if it succeeded.
    pub fn successful_protocol(&self) -> Option<Protocol> {
        self.attempts
            .iter()
            .find(|a| a.success)
            .map(|a| a.protocol)
    }

    /// Discards the attempt records.
    pub fn into_result(self) -> Result<T, FetchError> {
        self.result
    }
}

// ============================================================================
// Fallback Pipeline
// ============================================================================

/// Runs a modern and a legacy call according to an [`AuthMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPipeline {
    mode: AuthMode,
}

impl FallbackPipeline {
    /// Creates a pipeline for the given mode.
    pub fn new(mode: AuthMode) -> Self {
        Self { mode }
    }

    /// Returns the configured mode.
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Executes the calls allowed by the mode.
    ///
    /// Neither call is started unless the mode requires it, and each runs at
    /// most once.
    #[instrument(skip_all, fields(mode = %self.mode))]
    pub async fn execute<T, M, MF, L, LF>(&self, modern: M, legacy: L) -> FallbackOutcome<T>
    where
        M: FnOnce() -> MF,
        MF: Future<Output = Result<T, FetchError>>,
        L: FnOnce() -> LF,
        LF: Future<Output = Result<T, FetchError>>,
    {
        let start = Instant::now();
        let mut attempts = Vec::with_capacity(2);

        let result = match self.mode {
            AuthMode::Modern => attempt(Protocol::Modern, modern(), &mut attempts).await,
            AuthMode::Legacy => attempt(Protocol::Legacy, legacy(), &mut attempts).await,
            AuthMode::Automatic => {
                match attempt(Protocol::Modern, modern(), &mut attempts).await {
                    Ok(value) => Ok(value),
                    Err(error) => {
                        warn!(error = %error, "Modern protocol failed, falling back to legacy");
                        attempt(Protocol::Legacy, legacy(), &mut attempts).await
                    }
                }
            }
        };

        FallbackOutcome {
            result,
            attempts,
            duration: start.elapsed(),
        }
    }
}

/// Runs one protocol call and records the attempt.
async fn attempt<T, F>(
    protocol: Protocol,
    call: F,
    attempts: &mut Vec<FallbackAttempt>,
) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    let started = Instant::now();
    debug!(protocol = %protocol, "Executing protocol call");

    let result = call.await;
    let duration = started.elapsed();

    match &result {
        Ok(_) => {
            debug!(protocol = %protocol, duration = ?duration, "Protocol call succeeded");
            attempts.push(FallbackAttempt::success(protocol, duration));
        }
        Err(error) => {
            debug!(protocol = %protocol, error = %error, duration = ?duration, "Protocol call failed");
            attempts.push(FallbackAttempt::failure(protocol, error.to_string(), duration));
        }
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
