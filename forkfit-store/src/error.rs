//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for the expected shape.
    #[error("Invalid config file {path}: {source}")]
    InvalidFile {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An environment variable has an unusable value.
    #[error("Invalid value for {name}: {reason}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}
