//! Facade configuration.
//!
//! Secrets and endpoints come from an optional JSON file and then from
//! environment variables, which win. Blank values count as absent in both.
//!
//! ```json
//! {
//!   "gemini": { "api_key": "...", "base_url": "https://generativelanguage.googleapis.com" },
//!   "ninjas": { "api_key": "..." },
//!   "fatsecret": {
//!     "client_id": "...", "client_secret": "...",
//!     "consumer_key": "...", "consumer_secret": "...",
//!     "api_mode": "auto"
//!   },
//!   "http": { "timeout_secs": 30 }
//! }
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use forkfit_fetch::AuthMode;
use forkfit_fetch::client::DEFAULT_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json_if_exists};

// ============================================================================
// Environment Variables
// ============================================================================

/// Gemini API key.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// API Ninjas key.
pub const ENV_NINJAS_API_KEY: &str = "API_NINJAS_KEY";
/// FatSecret OAuth2 client id.
pub const ENV_FS_CLIENT_ID: &str = "FS_OAUTH2_CLIENT_ID";
/// FatSecret OAuth2 client secret.
pub const ENV_FS_CLIENT_SECRET: &str = "FS_OAUTH2_CLIENT_SECRET";
/// FatSecret OAuth1 consumer key.
pub const ENV_FS_CONSUMER_KEY: &str = "FS_OAUTH1_CONSUMER_KEY";
/// FatSecret OAuth1 consumer secret.
pub const ENV_FS_CONSUMER_SECRET: &str = "FS_OAUTH1_CONSUMER_SECRET";
/// FatSecret protocol mode (`oauth2`, `oauth1`, anything else = auto).
pub const ENV_FS_API_MODE: &str = "FS_API_MODE";
/// Gemini base URL override.
pub const ENV_GEMINI_BASE_URL: &str = "FORKFIT_GEMINI_BASE_URL";
/// API Ninjas base URL override.
pub const ENV_NINJAS_BASE_URL: &str = "FORKFIT_NINJAS_BASE_URL";
/// FatSecret API root override.
pub const ENV_FS_API_ROOT: &str = "FORKFIT_FATSECRET_API_ROOT";
/// FatSecret token endpoint override.
pub const ENV_FS_TOKEN_URL: &str = "FORKFIT_FATSECRET_TOKEN_URL";
/// HTTP timeout in seconds.
pub const ENV_HTTP_TIMEOUT: &str = "FORKFIT_HTTP_TIMEOUT_SECS";

// ============================================================================
// Sections
// ============================================================================

/// Gemini settings.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key.
    pub api_key: Option<String>,
    /// Base URL override.
    pub base_url: Option<String>,
}

/// API Ninjas settings.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct NinjasConfig {
    /// API key.
    pub api_key: Option<String>,
    /// Base URL override.
    pub base_url: Option<String>,
}

/// FatSecret settings.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct FatSecretConfig {
    /// OAuth2 client id.
    pub client_id: Option<String>,
    /// OAuth2 client secret.
    pub client_secret: Option<String>,
    /// OAuth1 consumer key.
    pub consumer_key: Option<String>,
    /// OAuth1 consumer secret.
    pub consumer_secret: Option<String>,
    /// Protocol mode as configured.
    pub api_mode: Option<String>,
    /// API root override.
    pub api_root: Option<String>,
    /// Token endpoint override.
    pub token_url: Option<String>,
}

/// HTTP transport settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

fn redacted(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "<redacted>")
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &redacted(self.api_key.as_ref()))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Debug for NinjasConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NinjasConfig")
            .field("api_key", &redacted(self.api_key.as_ref()))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Debug for FatSecretConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FatSecretConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redacted(self.client_secret.as_ref()))
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &redacted(self.consumer_secret.as_ref()))
            .field("api_mode", &self.api_mode)
            .field("api_root", &self.api_root)
            .field("token_url", &self.token_url)
            .finish()
    }
}

// ============================================================================
// Facade Config
// ============================================================================

/// Everything the facade needs to reach its upstreams.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    /// Gemini section.
    pub gemini: GeminiConfig,
    /// API Ninjas section.
    pub ninjas: NinjasConfig,
    /// FatSecret section.
    pub fatsecret: FatSecretConfig,
    /// HTTP section.
    pub http: HttpConfig,
}

impl FacadeConfig {
    /// Loads the config file (default path unless given) and applies the
    /// process environment on top.
    pub async fn load(path: Option<&Path>) -> Result<Self, StoreError> {
        let path = path.map_or_else(default_config_path, Path::to_path_buf);
        let mut config = Self::load_file(&path).await?;
        config.apply_env_with(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Loads only the config file. A missing file yields the defaults.
    pub async fn load_file(path: &Path) -> Result<Self, StoreError> {
        match load_json_if_exists::<Self>(path).await? {
            Some(config) => {
                info!(path = %path.display(), "Loaded configuration");
                Ok(config.normalized())
            }
            None => Ok(Self::default()),
        }
    }

    /// Overrides fields with values from `lookup` (an environment reader).
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).and_then(non_blank);

        let overrides: [(&mut Option<String>, &'static str); 11] = [
            (&mut self.gemini.api_key, ENV_GEMINI_API_KEY),
            (&mut self.gemini.base_url, ENV_GEMINI_BASE_URL),
            (&mut self.ninjas.api_key, ENV_NINJAS_API_KEY),
            (&mut self.ninjas.base_url, ENV_NINJAS_BASE_URL),
            (&mut self.fatsecret.client_id, ENV_FS_CLIENT_ID),
            (&mut self.fatsecret.client_secret, ENV_FS_CLIENT_SECRET),
            (&mut self.fatsecret.consumer_key, ENV_FS_CONSUMER_KEY),
            (&mut self.fatsecret.consumer_secret, ENV_FS_CONSUMER_SECRET),
            (&mut self.fatsecret.api_mode, ENV_FS_API_MODE),
            (&mut self.fatsecret.api_root, ENV_FS_API_ROOT),
            (&mut self.fatsecret.token_url, ENV_FS_TOKEN_URL),
        ];

        for (slot, name) in overrides {
            if let Some(value) = read(name) {
                debug!(name, "Config value taken from environment");
                *slot = Some(value);
            }
        }

        if let Some(raw) = read(ENV_HTTP_TIMEOUT) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| StoreError::InvalidEnv {
                    name: ENV_HTTP_TIMEOUT,
                    reason: format!("expected a positive number of seconds, got {raw:?}"),
                })?;
            self.http.timeout_secs = Some(secs);
        }

        Ok(())
    }

    /// Replaces blank strings with `None`.
    fn normalized(mut self) -> Self {
        for slot in [
            &mut self.gemini.api_key,
            &mut self.gemini.base_url,
            &mut self.ninjas.api_key,
            &mut self.ninjas.base_url,
            &mut self.fatsecret.client_id,
            &mut self.fatsecret.client_secret,
            &mut self.fatsecret.consumer_key,
            &mut self.fatsecret.consumer_secret,
            &mut self.fatsecret.api_mode,
            &mut self.fatsecret.api_root,
            &mut self.fatsecret.token_url,
        ] {
            *slot = slot.take().and_then(non_blank);
        }
        self.http.timeout_secs = self.http.timeout_secs.filter(|s| *s > 0);
        self
    }

    /// The FatSecret protocol mode.
    pub fn auth_mode(&self) -> AuthMode {
        AuthMode::parse(self.fatsecret.api_mode.as_deref())
    }

    /// The HTTP request timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// A secret-free view of the configuration.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            gemini_api_key: self.gemini.api_key.is_some(),
            ninjas_api_key: self.ninjas.api_key.is_some(),
            fatsecret_oauth2: self.fatsecret.client_id.is_some()
                && self.fatsecret.client_secret.is_some(),
            fatsecret_oauth1: self.fatsecret.consumer_key.is_some()
                && self.fatsecret.consumer_secret.is_some(),
            fatsecret_mode: self.auth_mode().to_string(),
            gemini_base_url: self.gemini.base_url.clone(),
            ninjas_base_url: self.ninjas.base_url.clone(),
            fatsecret_api_root: self.fatsecret.api_root.clone(),
            fatsecret_token_url: self.fatsecret.token_url.clone(),
            http_timeout_secs: self.http_timeout().as_secs(),
        }
    }
}

/// Drops blank values. Anything else is kept exactly as written.
fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

// ============================================================================
// Summary
// ============================================================================

/// Which secrets are present, plus the non-secret settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    /// Gemini key configured.
    pub gemini_api_key: bool,
    /// API Ninjas key configured.
    pub ninjas_api_key: bool,
    /// FatSecret client id and secret configured.
    pub fatsecret_oauth2: bool,
    /// FatSecret consumer key and secret configured.
    pub fatsecret_oauth1: bool,
    /// Effective FatSecret mode.
    pub fatsecret_mode: String,
    /// Gemini base URL override.
    pub gemini_base_url: Option<String>,
    /// API Ninjas base URL override.
    pub ninjas_base_url: Option<String>,
    /// FatSecret API root override.
    pub fatsecret_api_root: Option<String>,
    /// FatSecret token endpoint override.
    pub fatsecret_token_url: Option<String>,
    /// Effective HTTP timeout.
    pub http_timeout_secs: u64,
}
