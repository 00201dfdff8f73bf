//! Domain models for `ForkFit`.
//!
//! ## Submodules
//!
//! - [`caller`] - Caller identity and the sign-in gate
//! - [`food`] - Nutrition requests and normalized outputs
//! - [`chat`] - Generative model requests and simplified replies
//! - [`exercise`] - Exercise database filters

mod caller;
mod chat;
mod exercise;
mod food;

// Re-export everything at the models level
pub use caller::{CallContext, CallerIdentity};
pub use chat::{ChatReply, ChatRequest, FunctionCall};
pub use exercise::ExerciseQuery;
pub use food::{
    AutocompleteRequest, BarcodeRequest, FoodDetails, FoodDetailsRequest, FoodSearchRequest,
    FoodSummary,
};
