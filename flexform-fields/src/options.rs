//! Option maps and value snapshots

use serde_json::{Map, Value};

/// Keyword options passed to a field, widget or storage constructor.
pub type Options = Map<String, Value>;

/// A snapshot of form values keyed by field name.
pub type Values = flexform_expr::Names;

/// Merge `overrides` on top of `defaults`. Keys in `overrides` win.
///
/// The merge is shallow: a nested object in `overrides` replaces the
/// default object as a whole.
pub fn merge_options(defaults: &Options, overrides: &Options) -> Options {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Truthiness used when a modifier value drives a boolean attribute.
///
/// Null, `false`, zero, the empty string and empty containers are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> Options {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_caller_wins_on_conflict() {
        let defaults = options(json!({"min_value": 0, "max_value": 2147483647}));
        let overrides = options(json!({"max_value": 10, "help_text": "Pick one"}));
        let merged = merge_options(&defaults, &overrides);
        assert_eq!(merged["min_value"], json!(0));
        assert_eq!(merged["max_value"], json!(10));
        assert_eq!(merged["help_text"], json!("Pick one"));
    }

    #[test]
    fn test_truthy() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!([])));
        assert!(truthy(&json!("no")));
        assert!(truthy(&json!(0.5)));
        assert!(truthy(&json!({"a": 1})));
    }
}
