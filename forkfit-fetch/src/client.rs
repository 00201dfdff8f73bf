//! HTTP client with tracing and upstream status handling.
//!
//! This module provides a wrapped HTTP client that adds:
//! - Request/response tracing
//! - A default timeout and user agent
//! - Conversion of non-success responses into [`FetchError::Upstream`]

use reqwest::{Client, Response, header::HeaderMap};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetchError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for ForkFit.
const USER_AGENT: &str = concat!("ForkFit/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper shared by every upstream integration.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner: client })
    }

    /// Performs a GET request with query parameters and headers.
    #[instrument(skip(self, query, headers), fields(url = %url))]
    pub async fn get<Q: Serialize + ?Sized>(
        &self,
        url: &str,
        query: &Q,
        headers: HeaderMap,
    ) -> Result<Response, FetchError> {
        debug!("GET request");

        let response = self
            .inner
            .get(url)
            .query(query)
            .headers(headers)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a POST request with a form-encoded body.
    #[instrument(skip(self, form, headers), fields(url = %url))]
    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &T,
        headers: HeaderMap,
    ) -> Result<Response, FetchError> {
        debug!("POST request with form data");

        let response = self
            .inner
            .post(url)
            .form(form)
            .headers(headers)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a POST request with a JSON body.
    #[instrument(skip(self, body, headers), fields(url = %url))]
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        headers: HeaderMap,
    ) -> Result<Response, FetchError> {
        debug!("POST request with JSON");

        let response = self
            .inner
            .post(url)
            .json(body)
            .headers(headers)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

// ============================================================================
// URL Helpers
// ============================================================================

/// Joins a base URL and a path with exactly one slash between them.
///
/// The base must be an absolute URL; anything else is a
/// [`FetchError::InvalidUrl`].
pub fn endpoint(base: &str, path: &str) -> Result<String, FetchError> {
    let base = base.trim().trim_end_matches('/');
    Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{base}: {e}")))?;
    Ok(format!("{base}/{}", path.trim_start_matches('/')))
}

// ============================================================================
// Response Handling
// ============================================================================

/// Reads a response body as JSON, failing on non-success statuses.
///
/// Non-success responses become [`FetchError::Upstream`] carrying the status
/// and a truncated body. A successful response whose body is not JSON reads
/// as an empty object.
pub async fn read_json(service: &str, response: Response) -> Result<Value, FetchError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(service, status = %status, "Upstream returned an error status");
        return Err(FetchError::upstream(service, status.as_u16(), &body));
    }

    Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
        debug!(service, error = %e, "Response body is not JSON, using empty object");
        Value::Object(serde_json::Map::new())
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_endpoint_join() {
        assert_eq!(
            endpoint("https://platform.fatsecret.com/rest/", "/food/v4").unwrap(),
            "https://platform.fatsecret.com/rest/food/v4"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:8080", "v1/exercises").unwrap(),
            "http://127.0.0.1:8080/v1/exercises"
        );
        assert!(matches!(
            endpoint("not a url", "x"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_get_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/items"))
            .and(query_param("q", "apple pie"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client
            .get(
                &format!("{}/v1/items", server.uri()),
                &[("q", "apple pie")],
                HeaderMap::new(),
            )
            .await
            .unwrap();

        let json = read_json("Test", response).await.unwrap();
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn test_read_json_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client
            .get(&server.uri(), &[("a", "b")], HeaderMap::new())
            .await
            .unwrap();

        match read_json("Test", response).await {
            Err(FetchError::Upstream { status, body, .. }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_json_non_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client
            .get(&server.uri(), &[("a", "b")], HeaderMap::new())
            .await
            .unwrap();

        let json = read_json("Test", response).await.unwrap();
        assert!(json.as_object().is_some_and(serde_json::Map::is_empty));
    }
}
