//! System instruction, function declarations and request payload.

use forkfit_core::ChatRequest;
use serde_json::{Value, json};

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f64 = 0.2;

/// Instruction used when the caller does not supply one.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "\
You are a helpful fitness & nutrition assistant. Use mainstream, trusted sports/nutrition science.
Be specific and quantitative. If the user wants a concrete meal or workout, call a function to return structured data.

MEALS
- When proposing meals, include ingredients with amounts and per-ingredient macros (kcal, protein, carbs, fat).
- Also include totals, and 2–4 small low-impact swaps (with brief macro impact).
- If the user sends a description or image of food, estimate the meal via the estimation function and include a confidence 0..1 and a brief disclaimer.

WORKOUTS
- For each exercise, provide sets, reps, RPE (0-10), optional restSeconds, and 1–3 swaps (alternatives targeting similar muscles).
- Use conservative guidance for intensity. RPE is subjective and should align with how hard the user feels the effort (0=rest, 10=max).

Avoid extreme claims; do not diagnose conditions. Keep wording concise.";

fn ingredients_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "amount": {"type": "number"},
                "unit": {"type": "string"},
                "calories": {"type": "number"},
                "protein": {"type": "number"},
                "carbs": {"type": "number"},
                "fat": {"type": "number"}
            },
            "required": ["name", "amount", "unit", "calories", "protein", "carbs", "fat"]
        }
    })
}

fn totals_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "calories": {"type": "number"},
            "protein": {"type": "number"},
            "carbs": {"type": "number"},
            "fat": {"type": "number"}
        },
        "required": ["calories", "protein", "carbs", "fat"]
    })
}

fn swaps_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "why": {"type": "string"},
                "macroImpact": {"type": "string"}
            },
            "required": ["name", "why", "macroImpact"]
        }
    })
}

/// The three structured-output functions offered to the model.
pub fn function_declarations() -> Value {
    json!([
        {
            "name": "propose_meal",
            "description": "Return a specific meal with ingredients, per-ingredient macros, totals, and low-impact swaps.",
            "parametersJsonSchema": {
                "type": "object",
                "properties": {
                    "title": {"type": "string"},
                    "ingredients": ingredients_schema(),
                    "totals": totals_schema(),
                    "swaps": swaps_schema(),
                    "notes": {"type": "string"}
                },
                "required": ["title", "ingredients", "totals", "swaps"]
            }
        },
        {
            "name": "estimate_meal_from_input",
            "description": "Estimate a meal from text and/or images. Return ingredients/macros/totals, swaps, and confidence 0..1 plus an estimation note.",
            "parametersJsonSchema": {
                "type": "object",
                "properties": {
                    "title": {"type": "string"},
                    "ingredients": ingredients_schema(),
                    "totals": totals_schema(),
                    "swaps": swaps_schema(),
                    "confidence": {"type": "number"},
                    "estimationNote": {"type": "string"},
                    "notes": {"type": "string"}
                },
                "required": ["title", "ingredients", "totals", "swaps", "confidence", "estimationNote"]
            }
        },
        {
            "name": "propose_workout_plan",
            "description": "Return a workout plan with exercises (sets, reps, RPE), optional restSeconds, and swaps.",
            "parametersJsonSchema": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "assignToToday": {"type": "boolean"},
                    "notes": {"type": "string"},
                    "exercises": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": {"type": "string"},
                                "sets": {"type": "integer"},
                                "reps": {"type": "integer"},
                                "rpe": {"type": "number"},
                                "restSeconds": {"type": "integer"},
                                "swaps": {"type": "array", "items": {"type": "string"}}
                            },
                            "required": ["name", "sets", "reps", "rpe"]
                        }
                    }
                },
                "required": ["name", "exercises"]
            }
        }
    ])
}

/// Builds the `generateContent` body for a request.
pub fn build_payload(request: &ChatRequest) -> Value {
    let instruction = request
        .system_instruction
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_INSTRUCTION);

    json!({
        "systemInstruction": {"parts": [{"text": instruction}]},
        "contents": request.contents,
        "tools": [{"functionDeclarations": function_declarations()}],
        "toolConfig": {"functionCallingConfig": {"mode": "AUTO"}},
        "generationConfig": {"temperature": TEMPERATURE}
    })
}
