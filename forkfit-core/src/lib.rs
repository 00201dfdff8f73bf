// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ForkFit` Core
//!
//! Core types, models, and the caller-facing error taxonomy for `ForkFit`.
//!
//! This crate provides the foundational abstractions used across all other
//! `ForkFit` crates, including:
//!
//! - Caller identity and the sign-in gate every entry point runs first
//! - Request and response models for each callable function
//! - The [`CoreError`] taxonomy surfaced to callers
//!
//! ## Key Types
//!
//! ### Caller
//! - [`CallContext`] - Per-call context carrying the (optional) caller identity
//! - [`CallerIdentity`] - Opaque identity established by the host
//!
//! ### Food
//! - [`FoodSummary`] - One search hit
//! - [`FoodDetails`] - A food with its servings
//! - [`FoodSearchRequest`], [`AutocompleteRequest`], [`FoodDetailsRequest`],
//!   [`BarcodeRequest`] - Inputs for the nutrition functions
//!
//! ### Chat & Exercise
//! - [`ChatRequest`] / [`ChatReply`] - Generative model conversation turn
//! - [`FunctionCall`] - Structured output requested by the model
//! - [`ExerciseQuery`] - Exercise database filters

pub mod error;
pub mod models;

// Re-export error types
pub use error::{CoreError, MAX_ERROR_BODY_CHARS, truncate_body};

// Re-export all model types
pub use models::{
    // Caller
    CallContext,
    CallerIdentity,
    // Chat
    ChatReply,
    ChatRequest,
    FunctionCall,
    // Exercise
    ExerciseQuery,
    // Food
    AutocompleteRequest,
    BarcodeRequest,
    FoodDetails,
    FoodDetailsRequest,
    FoodSearchRequest,
    FoodSummary,
};
