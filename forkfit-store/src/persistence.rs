//! Config file location and loading.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

/// Returns the default configuration directory.
///
/// - Linux: `~/.config/forkfit`
/// - macOS: `~/Library/Application Support/forkfit`
/// - Windows: `%APPDATA%\forkfit`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|c| c.join("forkfit"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

/// Loads a JSON file, or `None` if it does not exist.
pub async fn load_json_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Config file not found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let data = serde_json::from_str(&content).map_err(|source| StoreError::InvalidFile {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "JSON file loaded");
    Ok(Some(data))
}
