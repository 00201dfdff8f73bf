//! FatSecret nutrition provider.
//!
//! FatSecret accepts two authentication schemes on the same API:
//!
//! - **OAuth2** (modern): client-credentials bearer token, cached until
//!   shortly before it expires
//! - **OAuth1** (legacy): every request signed with HMAC-SHA1
//!
//! Which one is used is controlled by [`AuthMode`](forkfit_fetch::AuthMode).
//! In automatic mode every operation tries OAuth2 first and falls back to
//! OAuth1 once on any failure.
//!
//! ## API Endpoints
//!
//! | Operation | OAuth2 | OAuth1 method |
//! |-----------|--------|---------------|
//! | Search | `GET /foods/search/v3` | `foods.search.v2` |
//! | Autocomplete | `POST /server.api` (`method=foods.autocomplete`) | `foods.autocomplete` |
//! | Details | `GET /food/v4` | `food.get` |
//! | Barcode | `GET /food/barcode/find-by-id/v1` | `food.find_id_for_barcode` |
//!
//! ## Usage
//!
//! ```ignore
//! use forkfit_core::FoodSearchRequest;
//! use forkfit_providers::fatsecret::{FatSecretClient, FatSecretSettings};
//!
//! let client = FatSecretClient::new(http, settings);
//! let foods = client.search_foods(&FoodSearchRequest::new("banana")).await?;
//! ```

mod adapters;
pub mod barcode;
mod client;
pub mod parser;

pub use adapters::{LegacyAdapter, ModernAdapter};
pub use barcode::normalize_gtin13;
pub use client::{FatSecretClient, FatSecretSettings};

// ============================================================================
// Constants
// ============================================================================

/// REST API root.
pub const DEFAULT_API_ROOT: &str = "https://platform.fatsecret.com/rest";

/// OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth.fatsecret.com/connect/token";

/// Scope requested with every OAuth2 token.
pub const TOKEN_SCOPE: &str = "premier barcode";

/// Method-dispatch endpoint, relative to the API root.
pub const SERVER_API_PATH: &str = "/server.api";

/// Service label for OAuth2 token errors.
pub const TOKEN_SERVICE: &str = "FatSecret token";

/// Service label for OAuth2 API errors.
pub const MODERN_SERVICE: &str = "FatSecret OAuth2";

/// Service label for OAuth1 API errors.
pub const LEGACY_SERVICE: &str = "FatSecret OAuth1";
