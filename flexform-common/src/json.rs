//! Deterministic JSON encoding
//!
//! Stable JSON sorts object keys recursively and uses compact separators, so
//! two structurally equal values always encode to the same string. The
//! autocomplete layer relies on this to use an encoded option as its own id.

use serde_json::{Map, Value};

/// Return a copy of `value` with every object's keys in ascending order.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Encode `value` as compact JSON with recursively sorted keys.
///
/// ```rust
/// use flexform_common::stable_json;
/// use serde_json::json;
///
/// let encoded = stable_json(&json!({"text": "Alice", "extra": {}, "value": "5"}));
/// assert_eq!(encoded, r#"{"extra":{},"text":"Alice","value":"5"}"#);
/// ```
pub fn stable_json(value: &Value) -> String {
    // Serializing a serde_json::Value cannot fail: every key is a string.
    serde_json::to_string(&sort_keys(value)).unwrap_or_default()
}
