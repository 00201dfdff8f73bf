// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ForkFit` Providers
//!
//! Upstream API integrations for `ForkFit`.
//!
//! Each provider module owns its endpoints, request building and response
//! normalization. HTTP, signing, token caching and protocol fallback come
//! from `forkfit-fetch`.
//!
//! ## Supported Providers
//!
//! | Provider | Auth | Operations |
//! |----------|------|------------|
//! | FatSecret | OAuth2 bearer, OAuth1 signature | search, autocomplete, details, barcode |
//! | Gemini | API key header | chat (`generateContent`) |
//! | API Ninjas | API key header | exercise search |
//!
//! ## Usage
//!
//! ```ignore
//! use forkfit_fetch::HttpClient;
//! use forkfit_providers::ExercisesClient;
//!
//! let client = ExercisesClient::new(HttpClient::new()?, Some(key));
//! let exercises = client.search(&query).await?;
//! ```

// Provider modules (alphabetical)
pub mod fatsecret;
pub mod gemini;
pub mod ninjas;

// Re-export provider clients
pub use fatsecret::{FatSecretClient, FatSecretSettings};
pub use gemini::GeminiClient;
pub use ninjas::ExercisesClient;
