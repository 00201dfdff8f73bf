//! JSON output formatting.

use anyhow::Result;
use forkfit_core::CoreError;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// Error body printed in place of a result.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorOutput,
}

/// Machine-readable code plus message.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub code: String,
    pub message: String,
}

impl ErrorEnvelope {
    /// Builds the envelope for a failed command.
    ///
    /// Errors that did not come from a function call are reported as
    /// `internal`.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let code = err
            .downcast_ref::<CoreError>()
            .map_or("internal", CoreError::code);

        Self {
            error: ErrorOutput {
                code: code.to_string(),
                message: err.to_string(),
            },
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats and prints a value on stdout.
    pub fn print<T: Serialize>(&self, data: &T) -> Result<()> {
        println!("{}", self.format(data)?);
        Ok(())
    }
}
