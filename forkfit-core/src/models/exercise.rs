//! Exercise database filters.

use serde::{Deserialize, Serialize};

/// Filters for the exercise search. Blank values are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseQuery {
    /// Exercise name fragment.
    #[serde(default)]
    pub name: Option<String>,
    /// Target muscle group.
    #[serde(default)]
    pub muscle: Option<String>,
    /// Exercise type (e.g. "strength").
    #[serde(default, rename = "type")]
    pub exercise_type: Option<String>,
    /// Difficulty level.
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl ExerciseQuery {
    /// Query pairs to send upstream, trimmed, blanks dropped.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("name", &self.name),
            ("muscle", &self.muscle),
            ("type", &self.exercise_type),
            ("difficulty", &self.difficulty),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then(|| (key, value.to_string()))
        })
        .collect()
    }
}
