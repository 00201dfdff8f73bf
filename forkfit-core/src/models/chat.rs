//! Generative model conversation types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default primary model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default model tried when the primary one is overloaded.
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.5-flash";

/// One conversation turn sent to the generative model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Conversation contents in the provider's wire format.
    #[serde(default)]
    pub contents: Vec<Value>,
    /// Primary model override.
    #[serde(default)]
    pub model: Option<String>,
    /// Fallback model override.
    #[serde(default)]
    pub fallback_model: Option<String>,
    /// System instruction override.
    #[serde(default)]
    pub system_instruction: Option<String>,
}

impl ChatRequest {
    /// Effective primary model.
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Effective fallback model.
    pub fn fallback_model(&self) -> &str {
        self.fallback_model.as_deref().unwrap_or(DEFAULT_FALLBACK_MODEL)
    }
}

/// A function call the model asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Declared function name.
    pub name: String,
    /// Arguments object (empty object when omitted).
    pub args: Value,
}

/// Simplified model reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Text parts joined by newlines, `None` when there was no text.
    pub text: Option<String>,
    /// Raw content of the first candidate.
    pub candidate_content: Option<Value>,
    /// Function calls in the order the model produced them.
    pub function_calls: Vec<FunctionCall>,
}
