// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # ForkFit Fetch
//!
//! HTTP plumbing and the dual-protocol authentication layer for ForkFit.
//!
//! This crate knows how to talk to an upstream API, not which API it is.
//! Provider crates plug their endpoints into it.
//!
//! ## Building Blocks
//!
//! - [`client::HttpClient`] - reqwest wrapper with tracing and status checks
//! - [`oauth1`] - Legacy request signing (HMAC-SHA1 signature engine)
//! - [`token_cache::TokenCache`] - Single-slot bearer token cache
//! - [`oauth2::TokenAcquirer`] - Client-credentials exchange that fills the cache
//! - [`mode::AuthMode`] - Which protocol(s) a call may use
//! - [`pipeline::FallbackPipeline`] - Modern-first, legacy-fallback orchestration
//!
//! ## Example
//!
//! ```ignore
//! use forkfit_fetch::{AuthMode, FallbackPipeline};
//!
//! let pipeline = FallbackPipeline::new(AuthMode::Automatic);
//! let outcome = pipeline
//!     .execute(|| modern.get("/food/v4", &params), || legacy.call("food.get", &params))
//!     .await;
//! let json = outcome.into_result()?;
//! ```

// Core modules
pub mod client;
pub mod error;
pub mod mode;
pub mod oauth1;
pub mod oauth2;
pub mod pipeline;
pub mod token_cache;

// Re-export key types at crate root
pub use client::{HttpClient, endpoint, read_json};
pub use error::FetchError;
pub use mode::AuthMode;
pub use oauth1::OAuth1Signer;
pub use oauth2::{ClientCredentials, TokenAcquirer};
pub use pipeline::{FallbackAttempt, FallbackOutcome, FallbackPipeline, Protocol};
pub use token_cache::{CachedToken, TokenCache};
