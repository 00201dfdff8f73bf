//! The caller-facing function surface.
//!
//! Every entry point checks for a caller identity before doing anything
//! else, then coerces its input and delegates to a provider client.

use forkfit_core::{
    AutocompleteRequest, BarcodeRequest, CallContext, ChatReply, ChatRequest, CoreError,
    ExerciseQuery, FoodDetails, FoodDetailsRequest, FoodSearchRequest, FoodSummary,
};
use forkfit_fetch::HttpClient;
use forkfit_providers::{ExercisesClient, FatSecretClient, FatSecretSettings, GeminiClient};
use forkfit_store::FacadeConfig;
use serde_json::Value;
use tracing::{debug, instrument};

// ============================================================================
// Functions
// ============================================================================

/// Upstream clients behind the callable functions.
#[derive(Debug, Clone)]
pub struct Functions {
    gemini: GeminiClient,
    exercises: ExercisesClient,
    fatsecret: FatSecretClient,
}

impl Functions {
    /// Builds every client from the loaded configuration.
    pub fn from_config(config: &FacadeConfig) -> Result<Self, CoreError> {
        let http = HttpClient::with_timeout(config.http_timeout())?;

        let mut gemini = GeminiClient::new(http.clone(), config.gemini.api_key.clone());
        if let Some(base_url) = &config.gemini.base_url {
            gemini = gemini.with_base_url(base_url.clone());
        }

        let mut exercises = ExercisesClient::new(http.clone(), config.ninjas.api_key.clone());
        if let Some(base_url) = &config.ninjas.base_url {
            exercises = exercises.with_base_url(base_url.clone());
        }

        let fatsecret = FatSecretClient::new(
            http,
            FatSecretSettings {
                api_root: config.fatsecret.api_root.clone(),
                token_url: config.fatsecret.token_url.clone(),
                client_id: config.fatsecret.client_id.clone(),
                client_secret: config.fatsecret.client_secret.clone(),
                consumer_key: config.fatsecret.consumer_key.clone(),
                consumer_secret: config.fatsecret.consumer_secret.clone(),
                mode: config.auth_mode(),
            },
        );

        debug!(mode = %fatsecret.mode(), "Functions ready");
        Ok(Self {
            gemini,
            exercises,
            fatsecret,
        })
    }

    /// Generative model chat turn.
    #[instrument(skip_all)]
    pub async fn gemini_chat(
        &self,
        ctx: &CallContext,
        request: &ChatRequest,
    ) -> Result<ChatReply, CoreError> {
        ctx.require_caller()?;
        self.gemini.chat(request).await
    }

    /// Exercise database search.
    #[instrument(skip_all)]
    pub async fn search_exercises(
        &self,
        ctx: &CallContext,
        query: &ExerciseQuery,
    ) -> Result<Value, CoreError> {
        ctx.require_caller()?;
        self.exercises.search(query).await
    }

    /// Food search.
    #[instrument(skip_all)]
    pub async fn search_foods(
        &self,
        ctx: &CallContext,
        request: &FoodSearchRequest,
    ) -> Result<Vec<FoodSummary>, CoreError> {
        ctx.require_caller()?;
        self.fatsecret.search_foods(request).await
    }

    /// Food name autocomplete.
    #[instrument(skip_all)]
    pub async fn autocomplete(
        &self,
        ctx: &CallContext,
        request: &AutocompleteRequest,
    ) -> Result<Vec<String>, CoreError> {
        ctx.require_caller()?;
        self.fatsecret.autocomplete(request).await
    }

    /// Food details by id.
    #[instrument(skip_all)]
    pub async fn food_details(
        &self,
        ctx: &CallContext,
        request: &FoodDetailsRequest,
    ) -> Result<FoodDetails, CoreError> {
        ctx.require_caller()?;
        self.fatsecret.food_details(request).await
    }

    /// Food details by barcode.
    #[instrument(skip_all)]
    pub async fn food_by_barcode(
        &self,
        ctx: &CallContext,
        request: &BarcodeRequest,
    ) -> Result<FoodDetails, CoreError> {
        ctx.require_caller()?;
        self.fatsecret.food_by_barcode(request).await
    }
}

// ============================================================================
// Input Coercion
// ============================================================================

/// Reads a chat request from caller JSON.
///
/// Accepts either a bare `contents` array or an object with `contents` and
/// the optional `model`, `fallbackModel` and `systemInstruction` fields.
/// `contents` must be a non-empty array.
pub fn chat_request_from_json(value: Value) -> Result<ChatRequest, CoreError> {
    let invalid = || CoreError::InvalidArgument("contents[] required".to_string());

    match value {
        Value::Array(contents) if !contents.is_empty() => Ok(ChatRequest {
            contents,
            ..ChatRequest::default()
        }),
        Value::Object(ref map)
            if map
                .get("contents")
                .and_then(Value::as_array)
                .is_some_and(|c| !c.is_empty()) =>
        {
            serde_json::from_value(value)
                .map_err(|e| CoreError::InvalidArgument(format!("invalid chat request: {e}")))
        }
        _ => Err(invalid()),
    }
}

// ============================================================================
// Tests
// ============================================================================
