//! Free-text search over a record
//!
//! A record matches when any of its field values, stringified and lower-cased,
//! contains the search text. Nested objects and arrays are searched through to
//! their leaves; `null` never matches.

use serde::Serialize;
use serde_json::Value;

/// Case-insensitive substring match across every field of `record`
///
/// The text is matched as given, surrounding spaces included. Empty text
/// matches everything.
pub fn matches_search<R: Serialize>(record: &R, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    match serde_json::to_value(record) {
        Ok(value) => value_contains(&value, &needle),
        Err(_) => false,
    }
}

/// `needle` must already be lower-cased
pub(crate) fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => b.to_string().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|v| value_contains(v, needle)),
        Value::Object(fields) => fields.values().any(|v| value_contains(v, needle)),
    }
}

/// Render a scalar field the way it is compared against a filter value
pub(crate) fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Row {
        name: String,
        email: String,
        rating: f32,
        tags: Vec<String>,
        note: Option<String>,
    }

    fn row() -> Row {
        Row {
            name: "Dr. Meera Nair".into(),
            email: "meera@ayursutra.in".into(),
            rating: 4.5,
            tags: vec!["Panchakarma".into()],
            note: None,
        }
    }

    #[test]
    fn test_case_insensitive_match() {
        assert!(matches_search(&row(), "MEERA"));
        assert!(matches_search(&row(), "ayursutra.in"));
        assert!(!matches_search(&row(), "kerala"));
    }

    #[test]
    fn test_numbers_and_nested_values() {
        assert!(matches_search(&row(), "4.5"));
        assert!(matches_search(&row(), "panchakarma"));
    }

    #[test]
    fn test_empty_search_matches_all() {
        assert!(matches_search(&row(), ""));
    }

    #[test]
    fn test_spaces_are_part_of_the_needle() {
        assert!(matches_search(&row(), " meera"));
        assert!(!matches_search(&row(), "  meera"));
        assert!(!matches_search(&row(), "meera "));
    }

    #[test]
    fn test_null_never_matches() {
        assert!(!value_contains(&json!({"note": null}), "null"));
    }
}
