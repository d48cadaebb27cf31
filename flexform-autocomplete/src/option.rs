//! Autocomplete options and submitted selections.
//!
//! An option's id is the stable JSON of the option itself, so a renderer
//! can redraw a saved selection without asking the endpoint again.

use crate::error::{AutocompleteError, Result};
use flexform_common::stable_json;
use flexform_fields::FieldKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One search result.
///
/// `id` is the endpoint's own identifier for the item. When an endpoint
/// has none the text stands in for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteOption {
    #[serde(alias = "value")]
    pub id: Value,
    pub text: String,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl AutocompleteOption {
    pub fn new(id: impl Into<Value>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            extra: Map::new(),
        }
    }

    /// Free text typed into the widget: its own id and text
    pub fn free_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// The option as stored: `{extra, id, text}`
    pub fn to_value(&self) -> Value {
        json!({
            "extra": self.extra,
            "id": self.id,
            "text": self.text,
        })
    }

    /// Stable JSON of [`AutocompleteOption::to_value`], the id a client
    /// selects and posts back
    pub fn encoded_id(&self) -> String {
        stable_json(&self.to_value())
    }

    /// Read an option back from its encoded id
    pub fn from_id(encoded: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(encoded).map_err(|e| AutocompleteError::InvalidSelection {
                message: e.to_string(),
            })?;
        Self::from_value(&value)
    }

    /// Read an option from its stored object form.
    ///
    /// `value` is accepted where `id` is missing. A missing id falls back to
    /// the text, and a missing text to the id.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(AutocompleteError::InvalidSelection {
                message: format!("expected an object, got {}", value),
            });
        };
        let id = ["id", "value"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|v| !v.is_null())
            .cloned();
        let text = match map.get("text") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => id.as_ref().map(display_text).unwrap_or_default(),
            Some(other) => other.to_string(),
        };
        let extra = match map.get("extra") {
            Some(Value::Object(extra)) => extra.clone(),
            _ => Map::new(),
        };
        Ok(Self {
            id: id.unwrap_or_else(|| Value::String(text.clone())),
            text,
            extra,
        })
    }

    /// The select2-style result row: `{id, text, extra}` with the encoded id
    pub fn to_result(&self) -> Value {
        json!({
            "id": self.encoded_id(),
            "text": self.text,
            "extra": self.extra,
        })
    }
}

/// Normalize what an autocomplete widget posted.
///
/// Empty entries (`""`, `"null"`) are dropped, entries that look like JSON
/// objects are parsed and anything else is kept as free text. A single
/// select keeps the first remaining entry or null; a multiple select keeps
/// a list.
pub fn extract_selection(submitted: &Value, multiple: bool) -> Result<Value> {
    let kind = if multiple {
        FieldKind::AutocompleteMultiple
    } else {
        FieldKind::Autocomplete
    };
    kind.coerce(submitted)
        .map_err(|e| AutocompleteError::InvalidSelection { message: e.message })
}

/// The JSON a widget carries as its value
pub fn widget_value(selection: &Value) -> String {
    selection.to_string()
}

/// The options already selected in a stored value, for redrawing a widget.
///
/// Accepts the stored object, a list of them, or their JSON encoding.
pub fn selected_options(stored: &Value) -> Vec<AutocompleteOption> {
    let parsed = match stored {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed) => parsed,
            Err(_) => return Vec::new(),
        },
        other => other.clone(),
    };
    let entries = match parsed {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    entries
        .iter()
        .filter_map(|entry| AutocompleteOption::from_value(entry).ok())
        .collect()
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_id_is_stable_json() {
        let option = AutocompleteOption::new("5", "Alice").with_extra("team", json!("blue"));
        assert_eq!(
            option.encoded_id(),
            r#"{"extra":{"team":"blue"},"id":"5","text":"Alice"}"#
        );
    }

    #[test]
    fn test_id_and_text_round_trip() {
        let option = AutocompleteOption::from_value(&json!({"id": "5", "text": "Alice"})).unwrap();
        assert_eq!(option.id, json!("5"));
        assert_eq!(option.text, "Alice");

        let decoded = AutocompleteOption::from_id(&option.encoded_id()).unwrap();
        assert_eq!(decoded, option);
        assert_eq!(decoded.to_value()["id"], json!("5"));

        let reread = AutocompleteOption::from_id(r#"{"extra":{},"id":"5","text":"Alice"}"#).unwrap();
        assert_eq!(reread.id, json!("5"));
        assert_eq!(reread.encoded_id(), r#"{"extra":{},"id":"5","text":"Alice"}"#);
    }

    #[test]
    fn test_value_key_is_read_as_id() {
        let option =
            AutocompleteOption::from_id(r#"{"extra":{},"text":"User 1","value":1}"#).unwrap();
        assert_eq!(option, AutocompleteOption::new(1, "User 1"));
    }

    #[test]
    fn test_selection_round_trips_through_id() {
        let option = AutocompleteOption::new("5", "Alice");
        let selection = extract_selection(&json!(option.encoded_id()), false).unwrap();
        assert_eq!(AutocompleteOption::from_value(&selection).unwrap(), option);
    }

    #[test]
    fn test_free_text_and_empty_entries() {
        let selection = extract_selection(&json!(["", "null", "pepperoni"]), true).unwrap();
        assert_eq!(selection, json!([{"extra": {}, "id": "pepperoni", "text": "pepperoni"}]));
        assert_eq!(
            AutocompleteOption::from_value(&selection[0]).unwrap(),
            AutocompleteOption::free_text("pepperoni")
        );
        assert_eq!(extract_selection(&json!("null"), false).unwrap(), Value::Null);
    }

    #[test]
    fn test_single_select_keeps_first_option() {
        let first = AutocompleteOption::new(1, "One");
        let second = AutocompleteOption::new(2, "Two");
        let selection =
            extract_selection(&json!([first.encoded_id(), second.encoded_id()]), false).unwrap();
        assert_eq!(AutocompleteOption::from_value(&selection).unwrap(), first);
    }

    #[test]
    fn test_selected_options_from_widget_value() {
        let option = AutocompleteOption::new("5", "Alice");
        let stored = widget_value(&json!([option.to_value()]));
        assert_eq!(selected_options(&json!(stored)), vec![option]);
        assert!(selected_options(&Value::Null).is_empty());
    }

    #[test]
    fn test_missing_id_falls_back_to_text() {
        let option = AutocompleteOption::from_value(&json!({"text": "Same as ID"})).unwrap();
        assert_eq!(option.id, json!("Same as ID"));
    }

    #[test]
    fn test_result_row_carries_encoded_id() {
        let row = AutocompleteOption::new(7, "Ann").to_result();
        assert_eq!(row["id"], json!(r#"{"extra":{},"id":7,"text":"Ann"}"#));
        assert_eq!(row["text"], json!("Ann"));
    }
}
