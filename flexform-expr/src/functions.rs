//! The function allow-list and the functions Flexform adds to it

use serde_json::Value;
use std::sync::Arc;

/// Signature of a function registered on an [`crate::Evaluator`].
///
/// Arguments arrive already evaluated and converted to JSON. An `Err`
/// becomes an expression error carrying the message.
pub type CustomFunction = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// CEL built-ins that modifier expressions may call.
///
/// The interpreter knows more functions than these (`timestamp`,
/// `duration` and friends); anything not listed here is rejected before a
/// program runs.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "all",
    "contains",
    "double",
    "endsWith",
    "exists",
    "exists_one",
    "filter",
    "has",
    "int",
    "map",
    "matches",
    "max",
    "size",
    "startsWith",
    "string",
    "uint",
];

/// True when `value` is absent or a container with no elements.
///
/// `false` and `0` are values, not absences, so they are never empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// `empty(value)`
pub(crate) fn empty() -> CustomFunction {
    Arc::new(|args: &[Value]| match args {
        [value] => Ok(Value::Bool(is_empty(value))),
        _ => Err(format!(
            "empty() takes exactly one argument ({} given)",
            args.len()
        )),
    })
}
