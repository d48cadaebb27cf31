//! Validation of a materialized field set

use crate::pipeline::EditableFieldSet;
use flexform_expr::is_empty;
use flexform_fields::{EditableField, FieldKind, Values};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Failed to compile email regex")
});

const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Per-field validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("invalid values for: {}", .errors.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl EditableFieldSet {
    /// Validate the pass-1 values against the final fields.
    ///
    /// Disabled fields clean to their initial value. Hidden fields keep
    /// their value; they are never required because the `hidden`
    /// applicator clears `required`.
    pub fn clean(&self) -> Result<Values, ValidationErrors> {
        let mut cleaned = Values::new();
        let mut errors = ValidationErrors::default();

        for (name, field) in &self.fields {
            if field.disabled {
                let initial = field.kind.coerce(&field.initial).unwrap_or_else(|_| field.initial.clone());
                cleaned.insert(name.clone(), initial);
                continue;
            }
            if let Some(message) = self.coercion_errors.get(name) {
                errors.add(name, message);
                continue;
            }

            let value = self.values.get(name).cloned().unwrap_or(Value::Null);
            match check(field, &value) {
                Ok(()) => {
                    cleaned.insert(name.clone(), value);
                }
                Err(message) => errors.add(name, message),
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            tracing::debug!(form = %self.form, "{}", errors);
            Err(errors)
        }
    }
}

fn check(field: &EditableField, value: &Value) -> Result<(), String> {
    let missing = match field.kind {
        FieldKind::Boolean => value != &Value::Bool(true),
        _ => is_empty(value),
    };
    if missing {
        return if field.required {
            Err("This field is required.".to_string())
        } else {
            Ok(())
        };
    }

    match field.kind {
        FieldKind::Char => check_length(field, value),
        FieldKind::Integer | FieldKind::Decimal => check_bounds(field, value),
        FieldKind::Email => match value.as_str() {
            Some(text) if EMAIL.is_match(text) => Ok(()),
            _ => Err("Enter a valid email address.".to_string()),
        },
        FieldKind::Url => match value.as_str().map(url::Url::parse) {
            Some(Ok(url)) if URL_SCHEMES.contains(&url.scheme()) => Ok(()),
            _ => Err("Enter a valid URL.".to_string()),
        },
        FieldKind::Choice | FieldKind::TypedChoice => check_choice(field, value),
        FieldKind::MultipleChoice => match value {
            Value::Array(items) => items.iter().try_for_each(|item| check_choice(field, item)),
            other => check_choice(field, other),
        },
        _ => Ok(()),
    }
}

fn check_length(field: &EditableField, value: &Value) -> Result<(), String> {
    let (Some(max), Some(text)) = (
        field.options.get("max_length").and_then(Value::as_u64),
        value.as_str(),
    ) else {
        return Ok(());
    };
    let length = text.chars().count() as u64;
    if length > max {
        return Err(format!(
            "Ensure this value has at most {} characters (it has {}).",
            max, length
        ));
    }
    Ok(())
}

fn check_bounds(field: &EditableField, value: &Value) -> Result<(), String> {
    let Some(number) = value.as_f64() else {
        return Ok(());
    };
    if let Some(min) = field.options.get("min_value").filter(|v| v.is_number()) {
        if min.as_f64().is_some_and(|min| number < min) {
            return Err(format!(
                "Ensure this value is greater than or equal to {}.",
                min
            ));
        }
    }
    if let Some(max) = field.options.get("max_value").filter(|v| v.is_number()) {
        if max.as_f64().is_some_and(|max| number > max) {
            return Err(format!("Ensure this value is less than or equal to {}.", max));
        }
    }
    Ok(())
}

fn check_choice(field: &EditableField, value: &Value) -> Result<(), String> {
    let wanted = choice_key(value);
    if field
        .choices()
        .iter()
        .any(|(choice, _)| choice_key(choice) == wanted)
    {
        return Ok(());
    }
    Err(format!(
        "Select a valid choice. {} is not one of the available choices.",
        wanted
    ))
}

fn choice_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
