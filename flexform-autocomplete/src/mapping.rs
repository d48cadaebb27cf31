//! Extracting options from an endpoint's JSON response

use crate::option::AutocompleteOption;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Where the options live in a response and how to read each one.
///
/// Every path is dotted (`airline.name`); numeric segments index arrays.
/// An empty `root` means the response itself is the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMapping {
    #[serde(default)]
    pub root: String,
    /// Path of the item's identifier
    #[serde(default, alias = "value")]
    pub id: String,
    #[serde(default = "default_text_path")]
    pub text: String,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

fn default_text_path() -> String {
    "text".to_string()
}

impl Default for ResultMapping {
    fn default() -> Self {
        Self {
            root: String::new(),
            id: "id".to_string(),
            text: default_text_path(),
            extra: BTreeMap::new(),
        }
    }
}

impl ResultMapping {
    /// The result items of `response`, each paired with its option
    pub fn extract<'a>(&self, response: &'a Value) -> Vec<(&'a Value, AutocompleteOption)> {
        let items = match lookup(response, &self.root) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => {
                tracing::debug!(root = %self.root, "autocomplete response has no result list");
                return Vec::new();
            }
        };
        items.iter().map(|item| (item, self.option(item))).collect()
    }

    /// Build one option from a result item
    pub fn option(&self, item: &Value) -> AutocompleteOption {
        let text = lookup(item, &self.text).map(display_text).unwrap_or_default();
        let id = lookup(item, &self.id)
            .filter(|id| !id.is_null() && !self.id.is_empty())
            .cloned()
            .unwrap_or_else(|| Value::String(text.clone()));
        let extra: Map<String, Value> = self
            .extra
            .iter()
            .map(|(key, path)| (key.clone(), lookup(item, path).cloned().unwrap_or(Value::Null)))
            .collect();
        AutocompleteOption { id, text, extra }
    }
}

/// Follow a dotted path into `value`; an empty path is `value` itself
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Text used for display and for local search
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn passengers() -> Value {
        json!({
            "data": [
                {"_id": "a1", "name": "Phyllis Jessen", "airline": {"name": "Delta"}},
                {"name": "Same as ID"}
            ]
        })
    }

    fn mapping() -> ResultMapping {
        ResultMapping {
            root: "data".into(),
            id: "_id".into(),
            text: "name".into(),
            extra: BTreeMap::from([("Airline".to_string(), "airline.name".to_string())]),
        }
    }

    #[test]
    fn test_extracts_options_along_paths() {
        let response = passengers();
        let options: Vec<_> = mapping()
            .extract(&response)
            .into_iter()
            .map(|(_, option)| option)
            .collect();

        assert_eq!(options[0].id, json!("a1"));
        assert_eq!(options[0].text, "Phyllis Jessen");
        assert_eq!(options[0].extra["Airline"], json!("Delta"));

        assert_eq!(options[1].id, json!("Same as ID"));
        assert_eq!(options[1].extra["Airline"], Value::Null);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let mut mapping = mapping();
        mapping.root = "results".into();
        assert!(mapping.extract(&passengers()).is_empty());
    }

    #[test]
    fn test_lookup_indexes_arrays() {
        let response = passengers();
        assert_eq!(lookup(&response, "data.0.airline.name"), Some(&json!("Delta")));
        assert_eq!(lookup(&response, "data.7"), None);
    }

    #[test]
    fn test_mapping_from_options() {
        let mapping: ResultMapping =
            serde_json::from_value(json!({"root": "data", "text": "name"})).unwrap();
        assert_eq!(mapping.id, "");
        assert_eq!(mapping.option(&json!({"name": "Tandy"})).id, json!("Tandy"));

        let aliased: ResultMapping =
            serde_json::from_value(json!({"value": "_id", "text": "name"})).unwrap();
        assert_eq!(aliased.id, "_id");
    }
}
