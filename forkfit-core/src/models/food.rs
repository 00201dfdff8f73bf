//! Nutrition requests and normalized outputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default page size for food search.
pub const DEFAULT_SEARCH_MAX: u32 = 20;

/// Default number of autocomplete suggestions.
pub const DEFAULT_AUTOCOMPLETE_MAX: u32 = 8;

// ============================================================================
// Outputs
// ============================================================================

/// One food search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodSummary {
    /// Provider food id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Provider food type (e.g. "Generic", "Brand").
    #[serde(rename = "type")]
    pub food_type: String,
}

/// A food with all of its servings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodDetails {
    /// Provider food id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Serving objects as returned by the provider, always a sequence.
    #[serde(default)]
    pub servings: Vec<Value>,
}

// ============================================================================
// Inputs
// ============================================================================

/// Input for food search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearchRequest {
    /// Free-text search expression.
    #[serde(default)]
    pub query: String,
    /// Maximum results per page.
    #[serde(default)]
    pub max: Option<u32>,
    /// Zero-based page number.
    #[serde(default)]
    pub page: Option<u32>,
}

impl FoodSearchRequest {
    /// Creates a request for the first page of results.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Effective page size.
    pub fn max_results(&self) -> u32 {
        self.max.unwrap_or(DEFAULT_SEARCH_MAX)
    }

    /// Effective page number.
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(0)
    }
}

/// Input for autocomplete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest {
    /// Partial expression typed so far.
    #[serde(default)]
    pub expr: String,
    /// Maximum number of suggestions.
    #[serde(default)]
    pub max: Option<u32>,
}

impl AutocompleteRequest {
    /// Creates a request with the default suggestion count.
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            max: None,
        }
    }

    /// Effective suggestion count.
    pub fn max_results(&self) -> u32 {
        self.max.unwrap_or(DEFAULT_AUTOCOMPLETE_MAX)
    }
}

/// Input for food details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetailsRequest {
    /// Provider food id.
    #[serde(default)]
    pub food_id: String,
}

impl FoodDetailsRequest {
    /// Creates a request for one food id.
    pub fn new(food_id: impl Into<String>) -> Self {
        Self {
            food_id: food_id.into(),
        }
    }
}

/// Input for barcode lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeRequest {
    /// Barcode as scanned (may contain spaces or dashes).
    #[serde(default)]
    pub raw_code: String,
    /// Optional market region (e.g. "US").
    #[serde(default)]
    pub region: Option<String>,
    /// Optional language; only honoured together with a region.
    #[serde(default)]
    pub language: Option<String>,
}

impl BarcodeRequest {
    /// Creates a request without region/language hints.
    pub fn new(raw_code: impl Into<String>) -> Self {
        Self {
            raw_code: raw_code.into(),
            ..Default::default()
        }
    }
}
