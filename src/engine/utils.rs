//! # Utility Functions Module
//!
//! Small helpers for inspecting record values:
//! - Emptiness checks used by the value-presence rule
//! - Canonical length used by the maximum-length rule
//! - Type names used in error messages

use serde_json::Value;

/// Returns true when a value counts as "no value"
///
/// `null`, the empty string, an empty array and an empty object are empty.
/// `false` and `0` are real values and are not empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(arr) => arr.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Length of a text value in characters (Unicode scalar values)
///
/// Returns None for non-text values, which have no canonical length.
pub fn text_length(value: &Value) -> Option<usize> {
    value.as_str().map(|s| s.chars().count())
}

/// Name of the JSON type of a value, for diagnostics
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!({})));

        assert!(!is_empty_value(&json!(" ")));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(0.0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!([null])));
    }

    #[test]
    fn test_text_length_counts_characters() {
        assert_eq!(text_length(&json!("Alice")), Some(5));
        assert_eq!(text_length(&json!("héllo")), Some(5));
        assert_eq!(text_length(&json!("日本語")), Some(3));
        assert_eq!(text_length(&json!(12345)), None);
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(1)), "integer");
        assert_eq!(json_type_name(&json!(1.5)), "float");
        assert_eq!(json_type_name(&json!("x")), "text");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!({"a": 1})), "object");
    }
}
