//! OAuth2 client-credentials token acquisition.
//!
//! [`TokenAcquirer::get_valid_token`] answers from the [`TokenCache`] when it
//! can and otherwise exchanges the client id/secret for a new bearer token:
//!
//! ```text
//! POST {token_url}
//! Authorization: Basic base64(client_id:client_secret)
//! Content-Type: application/x-www-form-urlencoded
//!
//! grant_type=client_credentials&scope={scope}
//! ```
//!
//! The exchange is idempotent, so concurrent misses may each perform it.

use std::fmt;
use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::client::{HttpClient, read_json};
use crate::error::FetchError;
use crate::token_cache::{CachedToken, TokenCache};

/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3000;

// ============================================================================
// Client Credentials
// ============================================================================

/// Client id/secret pair for the client-credentials grant.
#[derive(Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Builds credentials if both halves are present and non-blank.
    ///
    /// Values are used exactly as given.
    pub fn from_parts(client_id: Option<&str>, client_secret: Option<&str>) -> Option<Self> {
        let id = client_id.filter(|v| !v.trim().is_empty())?;
        let secret = client_secret.filter(|v| !v.trim().is_empty())?;
        Some(Self {
            client_id: id.to_string(),
            client_secret: secret.to_string(),
        })
    }

    /// Returns the client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    fn basic_auth(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Token Acquirer
// ============================================================================

/// Exchanges client credentials for bearer tokens and caches them.
#[derive(Debug, Clone)]
pub struct TokenAcquirer {
    http: HttpClient,
    token_url: String,
    scope: String,
    service: String,
    credentials: Option<ClientCredentials>,
    cache: Arc<TokenCache>,
}

impl TokenAcquirer {
    /// Creates an acquirer with its own empty cache.
    ///
    /// Missing credentials are not an error here; they surface as
    /// [`FetchError::Configuration`] when a token is actually needed.
    pub fn new(
        http: HttpClient,
        token_url: impl Into<String>,
        scope: impl Into<String>,
        credentials: Option<ClientCredentials>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            scope: scope.into(),
            service: "OAuth2 token".to_string(),
            credentials,
            cache: Arc::new(TokenCache::new()),
        }
    }

    /// Sets the label used in upstream errors.
    pub fn with_service_name(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Returns the cache this acquirer fills.
    #[cfg(test)]
    pub(crate) fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Returns true if client credentials are configured.
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Returns a usable bearer token, refreshing it if necessary.
    pub async fn get_valid_token(&self) -> Result<String, FetchError> {
        self.get_valid_token_at(Utc::now()).await
    }

    /// Same as [`Self::get_valid_token`], evaluated at `now`.
    #[instrument(skip(self), fields(service = %self.service))]
    pub async fn get_valid_token_at(&self, now: DateTime<Utc>) -> Result<String, FetchError> {
        if let Some(token) = self.cache.valid_token_at(now).await {
            debug!("Using cached bearer token");
            return Ok(token);
        }

        let credentials = self.credentials.as_ref().ok_or_else(|| {
            FetchError::Configuration(format!("{} client id/secret missing", self.service))
        })?;

        let (token, lifetime_secs) = self.exchange(credentials).await?;
        let entry = CachedToken::issued(token.clone(), lifetime_secs, now);
        self.cache.store(entry).await;

        Ok(token)
    }

    /// Performs the client-credentials exchange.
    async fn exchange(&self, credentials: &ClientCredentials) -> Result<(String, i64), FetchError> {
        info!(client_id = %credentials.client_id(), "Requesting bearer token");

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&credentials.basic_auth()).map_err(|_| {
                FetchError::Configuration(format!(
                    "{} credentials contain invalid characters",
                    self.service
                ))
            })?,
        );

        let form = [
            ("grant_type", "client_credentials"),
            ("scope", self.scope.as_str()),
        ];

        let response = self.http.post_form(&self.token_url, &form, headers).await?;
        let json = read_json(&self.service, response).await?;

        parse_token_response(&json)
    }
}

/// Extracts `(access_token, expires_in)` from a token endpoint response.
///
/// Fractional lifetimes are truncated and out-of-range ones saturate; the
/// cache clamps the result to a sane ceiling.
fn parse_token_response(json: &Value) -> Result<(String, i64), FetchError> {
    let token = json
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            FetchError::InvalidResponse("token response has no access_token".to_string())
        })?;

    let lifetime = json
        .get("expires_in")
        .and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_f64().map(|f| f as i64))
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        })
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);

    Ok((token.to_string(), lifetime))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIFETIME: i64 = 3600;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn acquirer(server: &MockServer, credentials: Option<ClientCredentials>) -> TokenAcquirer {
        TokenAcquirer::new(
            HttpClient::new().unwrap(),
            format!("{}/connect/token", server.uri()),
            "premier barcode",
            credentials,
        )
        .with_service_name("FatSecret token")
    }

    #[tokio::test]
    async fn test_token_reused_until_margin() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/connect/token"))
            .and(header("authorization", "Basic aWQ6c2VjcmV0"))
            .and(header("accept", "application/json"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("scope=premier+barcode"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "tok", "expires_in": LIFETIME})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let tokens = acquirer(&server, ClientCredentials::from_parts(Some("id"), Some("secret")));

        assert_eq!(tokens.get_valid_token_at(t0()).await.unwrap(), "tok");
        // Still inside the usable window: served from cache.
        let cached_at = t0() + Duration::seconds(LIFETIME - 31);
        assert_eq!(tokens.get_valid_token_at(cached_at).await.unwrap(), "tok");
        assert_eq!(server.received_requests().await.unwrap().len(), 1);

        // Past the safety margin: refreshed.
        let refresh_at = t0() + Duration::seconds(LIFETIME - 29);
        tokens.get_valid_token_at(refresh_at).await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 2);

        let entry = tokens.cache().current().await.unwrap();
        assert_eq!(entry.expires_at, refresh_at + Duration::seconds(LIFETIME - 30));
    }

    #[tokio::test]
    async fn test_concurrent_misses_leave_one_entry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/connect/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "tok", "expires_in": LIFETIME})),
            )
            .mount(&server)
            .await;

        let tokens = acquirer(&server, ClientCredentials::from_parts(Some("id"), Some("secret")));
        let (a, b, c) = tokio::join!(
            tokens.get_valid_token_at(t0()),
            tokens.get_valid_token_at(t0()),
            tokens.get_valid_token_at(t0()),
        );

        for token in [a, b, c] {
            assert_eq!(token.unwrap(), "tok");
        }
        let calls = server.received_requests().await.unwrap().len();
        assert!((1..=3).contains(&calls), "unexpected call count {calls}");

        let entry = tokens.cache().current().await.unwrap();
        assert_eq!(entry.token, "tok");
        assert_eq!(entry.expires_at, t0() + Duration::seconds(LIFETIME - 30));

        // Later callers are served from the slot.
        tokens.get_valid_token_at(t0() + Duration::seconds(60)).await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), calls);
    }

    #[tokio::test]
    async fn test_out_of_range_lifetimes_do_not_panic() {
        for (expires_in, usable) in [
            (json!(1e20), crate::token_cache::MAX_TOKEN_LIFETIME_SECS - 30),
            (json!(u64::MAX), crate::token_cache::MAX_TOKEN_LIFETIME_SECS - 30),
            (json!(3599.9), 3599 - 30),
            (json!(-5), 0),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/connect/token"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"access_token": "tok", "expires_in": expires_in})),
                )
                .expect(1)
                .mount(&server)
                .await;

            let tokens =
                acquirer(&server, ClientCredentials::from_parts(Some("id"), Some("secret")));
            assert_eq!(tokens.get_valid_token_at(t0()).await.unwrap(), "tok");

            let entry = tokens.cache().current().await.unwrap();
            assert_eq!(entry.expires_at, t0() + Duration::seconds(usable));
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_make_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tokens = acquirer(&server, ClientCredentials::from_parts(Some("id"), Some("")));
        assert!(!tokens.is_configured());
        assert!(matches!(
            tokens.get_valid_token().await,
            Err(FetchError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_token_endpoint_error() {
        let server = MockServer::start().await;
        let long_body = "x".repeat(5000);
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string(long_body))
            .mount(&server)
            .await;

        let tokens = acquirer(&server, ClientCredentials::from_parts(Some("id"), Some("secret")));
        let err = tokens.get_valid_token().await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(err.body().map(str::len), Some(forkfit_core::MAX_ERROR_BODY_CHARS));
        assert!(tokens.cache().current().await.is_none());
    }

    #[test]
    fn test_parse_token_response() {
        let (token, lifetime) =
            parse_token_response(&json!({"access_token": "abc", "expires_in": 86400})).unwrap();
        assert_eq!(token, "abc");
        assert_eq!(lifetime, 86400);
    }

    #[test]
    fn test_parse_token_response_defaults_lifetime() {
        let (_, lifetime) = parse_token_response(&json!({"access_token": "abc"})).unwrap();
        assert_eq!(lifetime, DEFAULT_TOKEN_LIFETIME_SECS);

        let (_, lifetime) =
            parse_token_response(&json!({"access_token": "abc", "expires_in": "120"})).unwrap();
        assert_eq!(lifetime, 120);
    }

    #[test]
    fn test_parse_token_response_requires_token() {
        assert!(matches!(
            parse_token_response(&json!({"expires_in": 60})),
            Err(FetchError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_credentials_from_parts() {
        assert!(ClientCredentials::from_parts(Some("id"), None).is_none());
        assert!(ClientCredentials::from_parts(Some(" "), Some("secret")).is_none());

        let creds = ClientCredentials::from_parts(Some("id"), Some("secret")).unwrap();
        assert_eq!(creds.basic_auth(), "Basic aWQ6c2VjcmV0");

        let padded = ClientCredentials::from_parts(Some("id"), Some(" secret ")).unwrap();
        assert_eq!(padded.basic_auth(), format!("Basic {}", STANDARD.encode("id: secret ")));
        assert!(!format!("{creds:?}").contains("\"secret\""));
    }
}
