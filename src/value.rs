//! Defensive shape coercion for stored values.
//!
//! Every place that assumes an array or object shape goes through these
//! helpers. They never fail: inconsistent data is coerced and the mismatch is
//! reported so callers can surface a warning.

use serde_json::{Map, Value};

/// The JSON type name of a value, for diagnostics.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A coerced value plus the JSON type that had to be discarded, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub mismatch: Option<&'static str>,
}

impl<T> Coerced<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            mismatch: None,
        }
    }

    fn mismatched(value: T, found: &'static str) -> Self {
        Self {
            value,
            mismatch: Some(found),
        }
    }
}

/// Missing or `null` becomes empty, arrays pass through, an object becomes its
/// values in key order, and any other scalar becomes empty (flagged).
pub fn coerce_array(value: Option<&Value>) -> Coerced<Vec<Value>> {
    match value {
        None | Some(Value::Null) => Coerced::clean(Vec::new()),
        Some(Value::Array(items)) => Coerced::clean(items.clone()),
        Some(Value::Object(map)) => Coerced::clean(map.values().cloned().collect()),
        Some(other) => Coerced::mismatched(Vec::new(), kind_name(other)),
    }
}

/// Missing or `null` becomes `{}`, objects pass through, anything else
/// becomes `{}` (flagged).
pub fn coerce_object(value: Option<&Value>) -> Coerced<Map<String, Value>> {
    match value {
        None | Some(Value::Null) => Coerced::clean(Map::new()),
        Some(Value::Object(map)) => Coerced::clean(map.clone()),
        Some(other) => Coerced::mismatched(Map::new(), kind_name(other)),
    }
}

pub fn normalize_to_array(value: Option<&Value>) -> Vec<Value> {
    coerce_array(value).value
}

pub fn normalize_to_object(value: Option<&Value>) -> Map<String, Value> {
    coerce_object(value).value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_normalization_table() {
        assert_eq!(normalize_to_array(None), Vec::<Value>::new());
        assert_eq!(normalize_to_array(Some(&json!(null))), Vec::<Value>::new());
        assert_eq!(normalize_to_array(Some(&json!([1, 2]))), vec![json!(1), json!(2)]);
        assert_eq!(
            normalize_to_array(Some(&json!({"a": 1, "b": 2}))),
            vec![json!(1), json!(2)]
        );
        assert_eq!(normalize_to_array(Some(&json!("x"))), Vec::<Value>::new());
    }

    #[test]
    fn only_scalars_flag_array_mismatch() {
        assert_eq!(coerce_array(None).mismatch, None);
        assert_eq!(coerce_array(Some(&json!({"a": 1}))).mismatch, None);
        assert_eq!(coerce_array(Some(&json!("x"))).mismatch, Some("string"));
        assert_eq!(coerce_array(Some(&json!(7))).mismatch, Some("number"));
    }

    #[test]
    fn object_normalization() {
        assert!(normalize_to_object(Some(&json!(null))).is_empty());
        assert_eq!(
            normalize_to_object(Some(&json!({"city": "Oslo"})))["city"],
            json!("Oslo")
        );
        let coerced = coerce_object(Some(&json!([1])));
        assert!(coerced.value.is_empty());
        assert_eq!(coerced.mismatch, Some("array"));
    }
}
