//! FatSecret response normalization.
//!
//! FatSecret collapses single-element lists into bare objects and sends ids
//! as either strings or numbers. Everything here tolerates both.

use forkfit_core::{FoodDetails, FoodSummary};
use serde_json::Value;
use tracing::debug;

/// Coerces an optional node into a list.
///
/// Arrays pass through, any other present value becomes a one-element list,
/// absent and `null` become empty.
pub fn one_or_many(node: Option<&Value>) -> Vec<Value> {
    match node {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

/// Renders a scalar field as a string. Absent and `null` become `""`.
pub fn scalar_string(node: Option<&Value>) -> String {
    match node {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn present<'a>(json: &'a Value, pointer: &str) -> Option<&'a Value> {
    json.pointer(pointer).filter(|v| !v.is_null())
}

/// Extracts search hits from either the v3 or the v2 response shape.
pub fn parse_food_summaries(json: &Value) -> Vec<FoodSummary> {
    let node = present(json, "/foods/food").or_else(|| present(json, "/foods_search/results/food"));

    let foods: Vec<FoodSummary> = one_or_many(node)
        .iter()
        .map(|food| FoodSummary {
            id: scalar_string(food.get("food_id")),
            name: scalar_string(food.get("food_name")),
            food_type: scalar_string(food.get("food_type")),
        })
        .collect();

    debug!(count = foods.len(), "Parsed food search results");
    foods
}

/// Extracts autocomplete suggestions.
pub fn parse_suggestions(json: &Value) -> Vec<String> {
    one_or_many(json.pointer("/suggestions/suggestion"))
        .iter()
        .map(|s| scalar_string(Some(s)))
        .collect()
}

/// Extracts a food and its servings.
pub fn parse_food_details(json: &Value) -> FoodDetails {
    let food = present(json, "/food");

    FoodDetails {
        id: scalar_string(food.and_then(|f| f.get("food_id"))),
        name: scalar_string(food.and_then(|f| f.get("food_name"))),
        servings: one_or_many(food.and_then(|f| f.pointer("/servings/serving"))),
    }
}

/// Extracts the food id a barcode lookup resolved to.
///
/// Accepts `{"food_id": {"value": "123"}}` and `{"food_id": "123"}`.
/// Returns `None` for a missing, empty or `"0"` id.
pub fn resolved_food_id(json: &Value) -> Option<String> {
    let node = json.get("food_id")?;
    let id = match node {
        Value::Object(map) => scalar_string(map.get("value")),
        other => scalar_string(Some(other)),
    };

    let id = id.trim().to_string();
    (!id.is_empty() && id != "0").then_some(id)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_or_many() {
        assert_eq!(one_or_many(Some(&json!({"a": 1}))), vec![json!({"a": 1})]);
        assert_eq!(one_or_many(Some(&json!([1, 2]))).len(), 2);
        assert!(one_or_many(Some(&json!(null))).is_empty());
        assert!(one_or_many(None).is_empty());
    }

    #[test]
    fn test_scalar_string() {
        assert_eq!(scalar_string(Some(&json!("abc"))), "abc");
        assert_eq!(scalar_string(Some(&json!(33691))), "33691");
        assert_eq!(scalar_string(Some(&json!(null))), "");
        assert_eq!(scalar_string(None), "");
    }

    #[test]
    fn test_parse_v3_search() {
        let json = json!({
            "foods_search": {
                "results": {
                    "food": [
                        {"food_id": "1", "food_name": "Banana", "food_type": "Generic"},
                        {"food_id": 2, "food_name": "Banana Bread", "food_type": "Brand"}
                    ]
                }
            }
        });

        let foods = parse_food_summaries(&json);
        assert_eq!(foods.len(), 2);
        assert_eq!(foods[1].id, "2");
        assert_eq!(foods[1].food_type, "Brand");
    }

    #[test]
    fn test_parse_v2_single_result() {
        let json = json!({"foods": {"food": {"food_id": "7", "food_name": "Apple"}}});

        let foods = parse_food_summaries(&json);
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].name, "Apple");
        assert_eq!(foods[0].food_type, "");
    }

    #[test]
    fn test_parse_search_falls_through_null() {
        let json = json!({
            "foods": {"food": null},
            "foods_search": {"results": {"food": {"food_id": "9"}}}
        });
        assert_eq!(parse_food_summaries(&json)[0].id, "9");
        assert!(parse_food_summaries(&json!({"foods": {"total_results": "0"}})).is_empty());
    }

    #[test]
    fn test_parse_suggestions() {
        let json = json!({"suggestions": {"suggestion": ["chicken", "chickpeas"]}});
        assert_eq!(parse_suggestions(&json), vec!["chicken", "chickpeas"]);

        let json = json!({"suggestions": {"suggestion": "chicken"}});
        assert_eq!(parse_suggestions(&json), vec!["chicken"]);

        assert!(parse_suggestions(&json!({})).is_empty());
    }

    #[test]
    fn test_parse_details_single_serving() {
        let json = json!({
            "food": {
                "food_id": 33691,
                "food_name": "Banana",
                "servings": {"serving": {"serving_id": "1", "calories": "105"}}
            }
        });

        let details = parse_food_details(&json);
        assert_eq!(details.id, "33691");
        assert_eq!(details.servings.len(), 1);
        assert_eq!(details.servings[0]["calories"], "105");
    }

    #[test]
    fn test_parse_details_missing_food() {
        let details = parse_food_details(&json!({}));
        assert_eq!(details.id, "");
        assert!(details.servings.is_empty());
    }

    #[test]
    fn test_resolved_food_id() {
        assert_eq!(resolved_food_id(&json!({"food_id": {"value": "4567"}})).as_deref(), Some("4567"));
        assert_eq!(resolved_food_id(&json!({"food_id": 4567})).as_deref(), Some("4567"));
        assert_eq!(resolved_food_id(&json!({"food_id": {"value": "0"}})), None);
        assert_eq!(resolved_food_id(&json!({"food_id": ""})), None);
        assert_eq!(resolved_food_id(&json!({})), None);
    }
}
