// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ForkFit` Store
//!
//! Configuration loading for `ForkFit`.
//!
//! This crate provides:
//!
//! - **FacadeConfig**: Upstream secrets, endpoint overrides and transport
//!   settings, from a JSON file and the environment
//! - **Persistence**: Config file location and JSON loading
//!
//! ## Usage
//!
//! ```ignore
//! use forkfit_store::FacadeConfig;
//!
//! let config = FacadeConfig::load(None).await?;
//! let mode = config.auth_mode();
//! println!("{:?}", config); // secrets are redacted
//! ```

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{ConfigSummary, FacadeConfig, FatSecretConfig, GeminiConfig, HttpConfig, NinjasConfig};
pub use error::StoreError;
pub use persistence::{default_config_dir, default_config_path, load_json_if_exists};
