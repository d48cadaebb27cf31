//! Conversion between JSON values and CEL values

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cel_interpreter::objects::Key;
use cel_interpreter::Value as CelValue;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Convert a JSON value into the equivalent CEL value.
///
/// Integers that fit `i64` become `int`, larger unsigned integers become
/// `uint`, every other number becomes `double`.
pub fn json_to_cel_value(value: &Value) -> CelValue {
    match value {
        Value::Null => CelValue::Null,
        Value::Bool(b) => CelValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                CelValue::Int(i)
            } else if let Some(u) = n.as_u64() {
                CelValue::UInt(u)
            } else {
                CelValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => CelValue::String(Arc::new(s.clone())),
        Value::Array(items) => {
            let list: Vec<CelValue> = items.iter().map(json_to_cel_value).collect();
            CelValue::List(list.into())
        }
        Value::Object(map) => {
            let cel_map: HashMap<String, CelValue> = map
                .iter()
                .map(|(k, v)| (k.clone(), json_to_cel_value(v)))
                .collect();
            CelValue::Map(cel_map.into())
        }
    }
}

/// Convert a CEL value back into JSON.
///
/// Bytes become base64, timestamps RFC 3339 strings and durations
/// fractional seconds. Map keys are stringified.
pub fn cel_value_to_json(value: &CelValue) -> Value {
    match value {
        CelValue::Null => Value::Null,
        CelValue::Bool(b) => Value::Bool(*b),
        CelValue::Int(i) => Value::from(*i),
        CelValue::UInt(u) => Value::from(*u),
        CelValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        CelValue::String(s) => Value::String(s.to_string()),
        CelValue::Bytes(bytes) => Value::String(STANDARD.encode(bytes.as_slice())),
        CelValue::List(items) => Value::Array(items.iter().map(cel_value_to_json).collect()),
        CelValue::Map(map) => Value::Object(
            map.map
                .iter()
                .map(|(key, v)| (key_to_string(key), cel_value_to_json(v)))
                .collect(),
        ),
        CelValue::Timestamp(ts) => Value::String(ts.to_rfc3339()),
        CelValue::Duration(d) => Number::from_f64(d.as_seconds_f64()).map_or(Value::Null, Value::Number),
        CelValue::Function(name, _) => Value::String(format!("<function: {}>", name)),
    }
}

fn key_to_string(key: &Key) -> String {
    match key {
        Key::Int(i) => i.to_string(),
        Key::Uint(u) => u.to_string(),
        Key::Bool(b) => b.to_string(),
        Key::String(s) => s.to_string(),
    }
}
