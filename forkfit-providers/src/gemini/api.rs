//! Gemini API client.

use std::fmt;

use forkfit_core::{ChatReply, ChatRequest, CoreError};
use forkfit_fetch::{FetchError, HttpClient, endpoint, read_json};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::parser::simplify_response;
use super::tools::build_payload;

// ============================================================================
// Constants
// ============================================================================

/// Gemini API base URL (Generative Language API).
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Label used in upstream errors.
pub const SERVICE_NAME: &str = "Gemini";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// API Client
// ============================================================================

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
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

    /// Returns true if an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends one conversation turn and simplifies the reply.
    ///
    /// Retries once with the fallback model when the primary one is
    /// unavailable (503 or "overloaded"). Any other failure, and any failure
    /// of the retry, is returned as is.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, CoreError> {
        if request.contents.is_empty() {
            return Err(CoreError::InvalidArgument("contents[] required".to_string()));
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CoreError::Configuration("Gemini API key missing".to_string()))?;

        let payload = build_payload(request);

        let json = match self.generate(request.model(), &payload, api_key).await {
            Ok(json) => json,
            Err(err) if is_overloaded(&err) => {
                warn!(
                    error = %err,
                    fallback = %request.fallback_model(),
                    "Primary model unavailable, retrying with fallback model"
                );
                self.generate(request.fallback_model(), &payload, api_key)
                    .await?
            }
            Err(err) => return Err(err.into()),
        };

        Ok(simplify_response(&json))
    }

    /// Calls `generateContent` for one model.
    #[instrument(skip(self, payload, api_key))]
    async fn generate(&self, model: &str, payload: &Value, api_key: &str) -> Result<Value, FetchError> {
        let url = endpoint(&self.base_url, &format!("v1beta/models/{model}:generateContent"))?;

        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| FetchError::Configuration("Gemini API key contains invalid characters".to_string()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, key);

        debug!("Calling generateContent");
        let response = self.http.post_json(&url, payload, headers).await?;
        read_json(SERVICE_NAME, response).await
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

/// Returns true if the failure means "try another model".
fn is_overloaded(err: &FetchError) -> bool {
    err.status() == Some(503)
        || err
            .body()
            .is_some_and(|body| body.to_ascii_lowercase().contains("overloaded"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PRIMARY: &str = "/v1beta/models/gemini-2.0-flash:generateContent";
    const FALLBACK: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn request() -> ChatRequest {
        ChatRequest {
            contents: vec![json!({"role": "user", "parts": [{"text": "Plan my leg day"}]})],
            ..Default::default()
        }
    }

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(HttpClient::new().unwrap(), Some("test-key".into()))
            .with_base_url(server.uri())
    }

    fn reply_body(text: &str) -> serde_json::Value {
        json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]})
    }

    async fn mount(server: &MockServer, route: &str, template: ResponseTemplate, expect: u64) {
        Mock::given(method("POST"))
            .and(path(route))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(template)
            .expect(expect)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_chat_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PRIMARY))
            .and(body_partial_json(json!({
                "toolConfig": {"functionCallingConfig": {"mode": "AUTO"}},
                "generationConfig": {"temperature": 0.2}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Squats first.")))
            .expect(1)
            .mount(&server)
            .await;
        mount(&server, FALLBACK, ResponseTemplate::new(200), 0).await;

        let reply = client(&server).chat(&request()).await.unwrap();
        assert_eq!(reply.text.as_deref(), Some("Squats first."));
    }

    #[tokio::test]
    async fn test_503_retries_fallback_once() {
        let server = MockServer::start().await;
        mount(&server, PRIMARY, ResponseTemplate::new(503), 1).await;
        mount(
            &server,
            FALLBACK,
            ResponseTemplate::new(200).set_body_json(reply_body("From fallback")),
            1,
        )
        .await;

        let reply = client(&server).chat(&request()).await.unwrap();
        assert_eq!(reply.text.as_deref(), Some("From fallback"));
    }

    #[tokio::test]
    async fn test_overloaded_body_retries() {
        let server = MockServer::start().await;
        mount(
            &server,
            PRIMARY,
            ResponseTemplate::new(429)
                .set_body_string(r#"{"error":{"message":"The model is overloaded."}}"#),
            1,
        )
        .await;
        mount(
            &server,
            FALLBACK,
            ResponseTemplate::new(200).set_body_json(reply_body("ok")),
            1,
        )
        .await;

        assert!(client(&server).chat(&request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_second_503_is_upstream_error() {
        let server = MockServer::start().await;
        mount(&server, PRIMARY, ResponseTemplate::new(503), 1).await;
        mount(
            &server,
            FALLBACK,
            ResponseTemplate::new(503).set_body_string("still busy"),
            1,
        )
        .await;

        match client(&server).chat(&request()).await {
            Err(CoreError::Upstream {
                service,
                status,
                body,
            }) => {
                assert_eq!(service, "Gemini");
                assert_eq!(status, 503);
                assert_eq!(body, "still busy");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_errors_do_not_retry() {
        let server = MockServer::start().await;
        mount(
            &server,
            PRIMARY,
            ResponseTemplate::new(400).set_body_string("bad request"),
            1,
        )
        .await;
        mount(&server, FALLBACK, ResponseTemplate::new(200), 0).await;

        let err = client(&server).chat(&request()).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(400));
    }

    #[tokio::test]
    async fn test_custom_models() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/v1beta/models/custom-a:generateContent",
            ResponseTemplate::new(503),
            1,
        )
        .await;
        mount(
            &server,
            "/v1beta/models/custom-b:generateContent",
            ResponseTemplate::new(200).set_body_json(reply_body("b")),
            1,
        )
        .await;

        let request = ChatRequest {
            model: Some("custom-a".into()),
            fallback_model: Some("custom-b".into()),
            ..request()
        };
        let reply = client(&server).chat(&request).await.unwrap();
        assert_eq!(reply.text.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_empty_contents_rejected() {
        let server = MockServer::start().await;
        let err = client(&server)
            .chat(&ChatRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let client = GeminiClient::new(HttpClient::new().unwrap(), Some("  ".into()));
        assert!(!client.is_configured());
        let err = client.chat(&request()).await.unwrap_err();
        assert_eq!(err.code(), "failed-precondition");
        assert!(!format!("{client:?}").contains("test-key"));
    }
}
