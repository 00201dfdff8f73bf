//! API Ninjas client.

use std::fmt;

use forkfit_core::{CoreError, ExerciseQuery};
use forkfit_fetch::{FetchError, HttpClient, endpoint, read_json};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, instrument};

/// API Ninjas base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.api-ninjas.com";

/// Label used in upstream errors.
pub const SERVICE_NAME: &str = "API Ninjas";

const EXERCISES_PATH: &str = "/v1/exercises";

/// Exercise search client.
#[derive(Clone)]
pub struct ExercisesClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl ExercisesClient {
    /// Creates a client. A missing key is reported on first use.
    pub fn new(http: HttpClient, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Searches exercises; the upstream JSON is returned unchanged.
    #[instrument(skip(self, query))]
    pub async fn search(&self, query: &ExerciseQuery) -> Result<Value, CoreError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CoreError::Configuration("API Ninjas key missing".to_string()))?;

        let pairs = query.query_pairs();
        debug!(filters = pairs.len(), "Searching exercises");

        self.fetch(&pairs, api_key).await.map_err(CoreError::from)
    }

    async fn fetch(&self, pairs: &[(&str, String)], api_key: &str) -> Result<Value, FetchError> {
        let url = endpoint(&self.base_url, EXERCISES_PATH)?;

        let mut key = HeaderValue::from_str(api_key).map_err(|_| {
            FetchError::Configuration("API Ninjas key contains invalid characters".to_string())
        })?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", key);

        let response = self.http.get(&url, pairs, headers).await?;
        read_json(SERVICE_NAME, response).await
    }
}

impl fmt::Debug for ExercisesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExercisesClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}
