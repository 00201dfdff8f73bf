//! Gemini response simplification.

use forkfit_core::{ChatReply, FunctionCall};
use serde_json::{Map, Value};

/// Reduces a `generateContent` response to text, raw content and calls.
///
/// Only the first candidate is considered. Text parts are joined with
/// newlines and trimmed; an empty result becomes `None`.
pub fn simplify_response(json: &Value) -> ChatReply {
    let content = json
        .pointer("/candidates/0/content")
        .filter(|c| !c.is_null())
        .cloned();

    let parts: &[Value] = content
        .as_ref()
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let text = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    let function_calls = parts
        .iter()
        .filter_map(|p| p.get("functionCall").filter(|c| !c.is_null()))
        .map(|call| FunctionCall {
            name: call
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            args: call
                .get("args")
                .filter(|a| !a.is_null())
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
        })
        .collect();

    ChatReply {
        text: (!text.is_empty()).then_some(text),
        candidate_content: content,
        function_calls,
    }
}
