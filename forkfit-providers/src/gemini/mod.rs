//! Gemini generative model provider.
//!
//! One call, `generateContent`, with the coaching system instruction and
//! three function declarations attached:
//!
//! - `propose_meal`
//! - `estimate_meal_from_input`
//! - `propose_workout_plan`
//!
//! ## API Endpoints
//!
//! - `POST /v1beta/models/{model}:generateContent` (header `x-goog-api-key`)
//!
//! When the primary model answers 503 or reports that it is overloaded,
//! the request is repeated once against the fallback model.

mod api;
pub mod parser;
pub mod tools;

pub use api::{DEFAULT_BASE_URL, GeminiClient, SERVICE_NAME};
pub use parser::simplify_response;
pub use tools::{DEFAULT_SYSTEM_INSTRUCTION, build_payload, function_declarations};
