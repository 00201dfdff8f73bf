//! FatSecret protocol adapters.
//!
//! Both adapters return the raw JSON body. Normalization happens in
//! [`super::parser`].

use std::collections::BTreeMap;

use forkfit_fetch::{FetchError, HttpClient, OAuth1Signer, TokenAcquirer, endpoint, read_json};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{LEGACY_SERVICE, MODERN_SERVICE, SERVER_API_PATH};

/// Query/form parameters for one call.
pub type Params = BTreeMap<String, String>;

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Merges `method`/`format=json` with the business parameters.
///
/// Business parameters win on key collisions.
fn with_format(method: Option<&str>, params: &Params) -> Params {
    let mut merged = Params::new();
    if let Some(method) = method {
        merged.insert("method".to_string(), method.to_string());
    }
    merged.insert("format".to_string(), "json".to_string());
    merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

// ============================================================================
// Modern (OAuth2)
// ============================================================================

/// Calls FatSecret with a cached OAuth2 bearer token.
#[derive(Debug, Clone)]
pub struct ModernAdapter {
    http: HttpClient,
    api_root: String,
    tokens: TokenAcquirer,
}

impl ModernAdapter {
    /// Creates an adapter for `api_root` that draws tokens from `tokens`.
    pub fn new(http: HttpClient, api_root: impl Into<String>, tokens: TokenAcquirer) -> Self {
        Self {
            http,
            api_root: api_root.into(),
            tokens,
        }
    }

    /// GET `{api_root}{path}?format=json&...`.
    #[instrument(skip(self, params))]
    pub async fn get(&self, path: &str, params: &Params) -> Result<Value, FetchError> {
        let headers = self.bearer_headers().await?;
        let url = endpoint(&self.api_root, path)?;
        let query = with_format(None, params);

        debug!(params = query.len(), "FatSecret OAuth2 GET");
        let response = self.http.get(&url, &query, headers).await?;
        read_json(MODERN_SERVICE, response).await
    }

    /// POST `{api_root}/server.api` with `method` dispatch in the form body.
    #[instrument(skip(self, params))]
    pub async fn post_method(&self, method: &str, params: &Params) -> Result<Value, FetchError> {
        let headers = self.bearer_headers().await?;
        let url = endpoint(&self.api_root, SERVER_API_PATH)?;
        let form = with_format(Some(method), params);

        debug!("FatSecret OAuth2 POST");
        let response = self.http.post_form(&url, &form, headers).await?;
        read_json(MODERN_SERVICE, response).await
    }

    async fn bearer_headers(&self) -> Result<HeaderMap, FetchError> {
        let token = self.tokens.get_valid_token().await?;

        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            FetchError::InvalidResponse("bearer token contains invalid characters".to_string())
        })?;
        value.set_sensitive(true);

        let mut headers = json_headers();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

// ============================================================================
// Legacy (OAuth1)
// ============================================================================

/// Calls FatSecret with per-request OAuth1 signatures.
#[derive(Debug, Clone)]
pub struct LegacyAdapter {
    http: HttpClient,
    api_root: String,
    signer: Option<OAuth1Signer>,
}

impl LegacyAdapter {
    /// Creates an adapter. A missing key or secret is reported on first use.
    pub fn new(
        http: HttpClient,
        api_root: impl Into<String>,
        consumer_key: Option<&str>,
        consumer_secret: Option<&str>,
    ) -> Self {
        Self {
            http,
            api_root: api_root.into(),
            signer: OAuth1Signer::new(consumer_key, consumer_secret).ok(),
        }
    }

    /// Returns true if a consumer key and secret are configured.
    pub fn is_configured(&self) -> bool {
        self.signer.is_some()
    }

    /// Signed GET `{api_root}/server.api?method=...`.
    #[instrument(skip(self, params))]
    pub async fn call(&self, method: &str, params: &Params) -> Result<Value, FetchError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            FetchError::Configuration("FatSecret OAuth1 secrets missing".to_string())
        })?;

        let url = endpoint(&self.api_root, SERVER_API_PATH)?;
        let signed = signer.sign("GET", &url, with_format(Some(method), params))?;

        debug!(params = signed.len(), "FatSecret OAuth1 GET");
        let response = self.http.get(&url, &signed, json_headers()).await?;
        read_json(LEGACY_SERVICE, response).await
    }
}

// ============================================================================
// Tests
// ============================================================================
