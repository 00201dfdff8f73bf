//! FatSecret domain operations.

use std::fmt;

use forkfit_core::{
    AutocompleteRequest, BarcodeRequest, CoreError, FoodDetails, FoodDetailsRequest,
    FoodSearchRequest, FoodSummary,
};
use forkfit_fetch::{AuthMode, ClientCredentials, FallbackPipeline, HttpClient, TokenAcquirer};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::adapters::{LegacyAdapter, ModernAdapter, Params};
use super::barcode::normalize_gtin13;
use super::parser::{parse_food_details, parse_food_summaries, parse_suggestions, resolved_food_id};
use super::{DEFAULT_API_ROOT, DEFAULT_TOKEN_URL, TOKEN_SCOPE, TOKEN_SERVICE};

// ============================================================================
// Settings
// ============================================================================

/// Endpoints, secrets and mode for a [`FatSecretClient`].
#[derive(Clone, Default)]
pub struct FatSecretSettings {
    /// API root override.
    pub api_root: Option<String>,
    /// Token endpoint override.
    pub token_url: Option<String>,
    /// OAuth2 client id.
    pub client_id: Option<String>,
    /// OAuth2 client secret.
    pub client_secret: Option<String>,
    /// OAuth1 consumer key.
    pub consumer_key: Option<String>,
    /// OAuth1 consumer secret.
    pub consumer_secret: Option<String>,
    /// Protocol selection.
    pub mode: AuthMode,
}

impl fmt::Debug for FatSecretSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FatSecretSettings")
            .field("api_root", &self.api_root)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &self.consumer_secret.as_ref().map(|_| "<redacted>"))
            .field("mode", &self.mode)
            .finish()
    }
}

// ============================================================================
// Client
// ============================================================================

/// Which modern call an operation makes.
#[derive(Debug, Clone, Copy)]
enum ModernCall {
    /// REST GET on a path.
    Get(&'static str),
    /// Method dispatch POST.
    Method(&'static str),
}

/// FatSecret nutrition client.
///
/// Holds one token cache for its whole lifetime; share the client (behind
/// `Arc` or by cloning) to share the cache.
#[derive(Debug, Clone)]
pub struct FatSecretClient {
    modern: ModernAdapter,
    legacy: LegacyAdapter,
    pipeline: FallbackPipeline,
}

impl FatSecretClient {
    /// Builds a client from settings.
    pub fn new(http: HttpClient, settings: FatSecretSettings) -> Self {
        let api_root = settings
            .api_root
            .unwrap_or_else(|| DEFAULT_API_ROOT.to_string());
        let token_url = settings
            .token_url
            .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string());

        let credentials = ClientCredentials::from_parts(
            settings.client_id.as_deref(),
            settings.client_secret.as_deref(),
        );
        let tokens = TokenAcquirer::new(http.clone(), token_url, TOKEN_SCOPE, credentials)
            .with_service_name(TOKEN_SERVICE);

        let modern = ModernAdapter::new(http.clone(), api_root.clone(), tokens);
        let legacy = LegacyAdapter::new(
            http,
            api_root,
            settings.consumer_key.as_deref(),
            settings.consumer_secret.as_deref(),
        );

        Self::from_adapters(modern, legacy, settings.mode)
    }

    /// Builds a client from pre-built adapters.
    pub fn from_adapters(modern: ModernAdapter, legacy: LegacyAdapter, mode: AuthMode) -> Self {
        Self {
            modern,
            legacy,
            pipeline: FallbackPipeline::new(mode),
        }
    }

    /// Returns the protocol selection mode.
    pub fn mode(&self) -> AuthMode {
        self.pipeline.mode()
    }

    /// Runs one operation through the fallback pipeline.
    async fn dispatch(
        &self,
        modern: ModernCall,
        legacy_method: &str,
        params: &Params,
    ) -> Result<Value, CoreError> {
        let outcome = self
            .pipeline
            .execute(
                || async move {
                    match modern {
                        ModernCall::Get(path) => self.modern.get(path, params).await,
                        ModernCall::Method(method) => self.modern.post_method(method, params).await,
                    }
                },
                || self.legacy.call(legacy_method, params),
            )
            .await;

        debug!(
            attempts = outcome.attempts_count(),
            protocol = ?outcome.successful_protocol(),
            duration = ?outcome.duration,
            "FatSecret call finished"
        );

        outcome.into_result().map_err(CoreError::from)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Searches foods by free text.
    ///
    /// A blank query returns an empty list without calling FatSecret.
    #[instrument(skip(self, request))]
    pub async fn search_foods(
        &self,
        request: &FoodSearchRequest,
    ) -> Result<Vec<FoodSummary>, CoreError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let params = param_map([
            ("search_expression", query.to_string()),
            ("max_results", request.max_results().to_string()),
            ("page_number", request.page_number().to_string()),
        ]);

        let json = self
            .dispatch(ModernCall::Get("/foods/search/v3"), "foods.search.v2", &params)
            .await?;
        Ok(parse_food_summaries(&json))
    }

    /// Suggests search expressions for a prefix.
    ///
    /// A blank expression returns an empty list without calling FatSecret.
    #[instrument(skip(self, request))]
    pub async fn autocomplete(
        &self,
        request: &AutocompleteRequest,
    ) -> Result<Vec<String>, CoreError> {
        let expr = request.expr.trim();
        if expr.is_empty() {
            return Ok(Vec::new());
        }

        let params = param_map([
            ("expression", expr.to_string()),
            ("max_results", request.max_results().to_string()),
        ]);

        let json = self
            .dispatch(
                ModernCall::Method("foods.autocomplete"),
                "foods.autocomplete",
                &params,
            )
            .await?;
        Ok(parse_suggestions(&json))
    }

    /// Fetches a food with its servings.
    #[instrument(skip(self, request))]
    pub async fn food_details(&self, request: &FoodDetailsRequest) -> Result<FoodDetails, CoreError> {
        let food_id = request.food_id.trim();
        if food_id.is_empty() {
            return Err(CoreError::InvalidArgument("foodId required".to_string()));
        }

        let params = param_map([("food_id", food_id.to_string())]);

        let json = self
            .dispatch(ModernCall::Get("/food/v4"), "food.get", &params)
            .await?;
        Ok(parse_food_details(&json))
    }

    /// Resolves a scanned barcode and fetches the matching food.
    #[instrument(skip(self, request))]
    pub async fn food_by_barcode(&self, request: &BarcodeRequest) -> Result<FoodDetails, CoreError> {
        let raw = request.raw_code.trim();
        if raw.is_empty() {
            return Err(CoreError::InvalidArgument("rawCode required".to_string()));
        }

        let gtin13 = normalize_gtin13(raw)?;
        let region = non_blank(request.region.as_deref());
        let language = non_blank(request.language.as_deref());

        let mut params = param_map([("barcode", gtin13.clone())]);
        if let Some(region) = region {
            params.insert("region".to_string(), region.to_string());
            if let Some(language) = language {
                params.insert("language".to_string(), language.to_string());
            }
        }

        let json = self
            .dispatch(
                ModernCall::Get("/food/barcode/find-by-id/v1"),
                "food.find_id_for_barcode",
                &params,
            )
            .await?;

        let food_id = resolved_food_id(&json)
            .ok_or_else(|| CoreError::NotFound(format!("No match for barcode {gtin13}")))?;

        info!(barcode = %gtin13, food_id = %food_id, "Barcode resolved");
        self.food_details(&FoodDetailsRequest::new(food_id)).await
    }
}

fn param_map<const N: usize>(pairs: [(&str, String); N]) -> Params {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(server: &MockServer, mode: AuthMode) -> FatSecretSettings {
        FatSecretSettings {
            api_root: Some(format!("{}/rest", server.uri())),
            token_url: Some(format!("{}/connect/token", server.uri())),
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
            consumer_key: Some("ck".into()),
            consumer_secret: Some("cs".into()),
            mode,
        }
    }

    fn client(server: &MockServer, mode: AuthMode) -> FatSecretClient {
        FatSecretClient::new(HttpClient::new().unwrap(), settings(server, mode))
    }

    async fn mount_token(server: &MockServer, status: u16, expect: u64) {
        Mock::given(method("POST"))
            .and(path("/connect/token"))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(json!({"access_token": "tok", "expires_in": 86400})),
            )
            .expect(expect)
            .mount(server)
            .await;
    }

    async fn mount_legacy(server: &MockServer, method_name: &str, body: Value, expect: u64) {
        Mock::given(method("GET"))
            .and(path("/rest/server.api"))
            .and(query_param("method", method_name))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expect)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server, AuthMode::Automatic);
        assert!(client
            .search_foods(&FoodSearchRequest::new("   "))
            .await
            .unwrap()
            .is_empty());
        assert!(client
            .autocomplete(&AutocompleteRequest::new(""))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_search_modern() {
        let server = MockServer::start().await;
        mount_token(&server, 200, 1).await;

        Mock::given(method("GET"))
            .and(path("/rest/foods/search/v3"))
            .and(query_param("search_expression", "banana"))
            .and(query_param("max_results", "20"))
            .and(query_param("page_number", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "foods_search": {"results": {"food": {
                    "food_id": "33691", "food_name": "Banana", "food_type": "Generic"
                }}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let foods = client(&server, AuthMode::Modern)
            .search_foods(&FoodSearchRequest::new("  banana "))
            .await
            .unwrap();

        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].id, "33691");
    }

    #[tokio::test]
    async fn test_automatic_falls_back_to_legacy() {
        let server = MockServer::start().await;
        mount_token(&server, 401, 1).await;
        mount_legacy(
            &server,
            "foods.search.v2",
            json!({"foods": {"food": [{"food_id": "1"}, {"food_id": "2"}]}}),
            1,
        )
        .await;

        let foods = client(&server, AuthMode::Automatic)
            .search_foods(&FoodSearchRequest::new("apple"))
            .await
            .unwrap();
        assert_eq!(foods.len(), 2);
    }

    #[tokio::test]
    async fn test_automatic_surfaces_legacy_error() {
        let server = MockServer::start().await;
        mount_token(&server, 500, 1).await;
        Mock::given(method("GET"))
            .and(path("/rest/server.api"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad signature"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, AuthMode::Automatic)
            .food_details(&FoodDetailsRequest::new("42"))
            .await
            .unwrap_err();

        match err {
            CoreError::Upstream {
                service,
                status,
                body,
            } => {
                assert_eq!(service, "FatSecret OAuth1");
                assert_eq!(status, 400);
                assert_eq!(body, "bad signature");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_modern_only_never_calls_legacy() {
        let server = MockServer::start().await;
        mount_token(&server, 500, 1).await;
        mount_legacy(&server, "food.get", json!({}), 0).await;

        let err = client(&server, AuthMode::Modern)
            .food_details(&FoodDetailsRequest::new("42"))
            .await
            .unwrap_err();
        assert_eq!(err.upstream_status(), Some(500));
    }

    #[tokio::test]
    async fn test_autocomplete_legacy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/server.api"))
            .and(query_param("method", "foods.autocomplete"))
            .and(query_param("expression", "chick"))
            .and(query_param("max_results", "5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"suggestions": {"suggestion": ["chicken", "chickpea"]}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut request = AutocompleteRequest::new("chick");
        request.max = Some(5);
        let suggestions = client(&server, AuthMode::Legacy)
            .autocomplete(&request)
            .await
            .unwrap();
        assert_eq!(suggestions, vec!["chicken", "chickpea"]);
    }

    #[tokio::test]
    async fn test_autocomplete_modern_posts_method() {
        let server = MockServer::start().await;
        mount_token(&server, 200, 1).await;
        Mock::given(method("POST"))
            .and(path("/rest/server.api"))
            .and(body_string_contains("method=foods.autocomplete"))
            .and(body_string_contains("max_results=8"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"suggestions": {"suggestion": "chicken"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let suggestions = client(&server, AuthMode::Modern)
            .autocomplete(&AutocompleteRequest::new("chick"))
            .await
            .unwrap();
        assert_eq!(suggestions, vec!["chicken"]);
    }

    #[tokio::test]
    async fn test_details_requires_id() {
        let server = MockServer::start().await;
        let err = client(&server, AuthMode::Automatic)
            .food_details(&FoodDetailsRequest::new("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_barcode_resolves_then_fetches_details() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/server.api"))
            .and(query_param("method", "food.find_id_for_barcode"))
            .and(query_param("barcode", "0012345678905"))
            .and(query_param("region", "GB"))
            .and(query_param("language", "en"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"food_id": {"value": "4567"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/server.api"))
            .and(query_param("method", "food.get"))
            .and(query_param("food_id", "4567"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "food": {
                    "food_id": "4567",
                    "food_name": "Oat Bar",
                    "servings": {"serving": [{"serving_id": "1"}, {"serving_id": "2"}]}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = BarcodeRequest {
            raw_code: "0 12345 67890 5".into(),
            region: Some("GB".into()),
            language: Some("en".into()),
        };
        let details = client(&server, AuthMode::Legacy)
            .food_by_barcode(&request)
            .await
            .unwrap();

        assert_eq!(details.id, "4567");
        assert_eq!(details.name, "Oat Bar");
        assert_eq!(details.servings.len(), 2);
    }

    #[tokio::test]
    async fn test_barcode_language_needs_region() {
        let server = MockServer::start().await;
        mount_legacy(&server, "food.find_id_for_barcode", json!({"food_id": {"value": "0"}}), 1)
            .await;

        let request = BarcodeRequest {
            raw_code: "12345678".into(),
            region: None,
            language: Some("en".into()),
        };
        let err = client(&server, AuthMode::Legacy)
            .food_by_barcode(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));

        let requests = server.received_requests().await.unwrap();
        let sent: Vec<(String, String)> = requests[0].url.query_pairs().into_owned().collect();
        assert!(sent.iter().any(|(k, v)| k == "barcode" && v == "0000012345678"));
        assert!(!sent.iter().any(|(k, _)| k == "language"));
    }

    #[tokio::test]
    async fn test_barcode_bad_length_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server, AuthMode::Automatic)
            .food_by_barcode(&BarcodeRequest::new("1234567890"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_settings_debug_redacts() {
        let settings = FatSecretSettings {
            client_secret: Some("oauth2-secret".into()),
            consumer_secret: Some("oauth1-secret".into()),
            ..Default::default()
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("oauth2-secret"));
        assert!(!debug.contains("oauth1-secret"));
    }
}
