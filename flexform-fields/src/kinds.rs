//! Editable-field kinds, widget kinds and storage slots
//!
//! A [`FieldKind`] decides how raw input is coerced into a normalized value.
//! A [`WidgetKind`] names the input control a renderer should draw. A
//! [`StorageKind`] names the typed physical slot a record attribute is
//! written to.

use crate::error::CoercionError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The editable-field constructor a field type uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Char,
    Email,
    Url,
    Integer,
    Decimal,
    Date,
    Time,
    DateTime,
    Duration,
    Boolean,
    NullBoolean,
    TypedChoice,
    Choice,
    MultipleChoice,
    File,
    Image,
    Autocomplete,
    AutocompleteMultiple,
}

impl FieldKind {
    /// The widget used when a field type does not choose one.
    pub fn default_widget(&self) -> WidgetKind {
        match self {
            FieldKind::Char | FieldKind::Duration => WidgetKind::TextInput,
            FieldKind::Email => WidgetKind::EmailInput,
            FieldKind::Url => WidgetKind::UrlInput,
            FieldKind::Integer | FieldKind::Decimal => WidgetKind::NumberInput,
            FieldKind::Date => WidgetKind::DateInput,
            FieldKind::Time => WidgetKind::TimeInput,
            FieldKind::DateTime => WidgetKind::DateTimeInput,
            FieldKind::Boolean => WidgetKind::CheckboxInput,
            FieldKind::NullBoolean => WidgetKind::NullBooleanSelect,
            FieldKind::TypedChoice | FieldKind::Choice => WidgetKind::Select,
            FieldKind::MultipleChoice => WidgetKind::SelectMultiple,
            FieldKind::File | FieldKind::Image => WidgetKind::ClearableFileInput,
            FieldKind::Autocomplete => WidgetKind::AutocompleteSelect,
            FieldKind::AutocompleteMultiple => WidgetKind::AutocompleteSelectMultiple,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FieldKind::File | FieldKind::Image)
    }

    /// True for kinds whose value is a list
    pub fn is_multiple(&self) -> bool {
        matches!(
            self,
            FieldKind::MultipleChoice | FieldKind::AutocompleteMultiple
        )
    }

    /// The value a field of this kind holds when nothing was entered.
    pub fn empty_value(&self) -> Value {
        match self {
            FieldKind::Char | FieldKind::Email | FieldKind::Url | FieldKind::Choice => json!(""),
            FieldKind::MultipleChoice | FieldKind::AutocompleteMultiple => json!([]),
            FieldKind::Boolean => json!(false),
            _ => Value::Null,
        }
    }

    /// Coerce raw input into the normalized value for this kind.
    ///
    /// Blank input becomes the kind's empty representation. Choice
    /// membership and bounds are not checked here; that happens when a
    /// submission is cleaned.
    pub fn coerce(&self, raw: &Value) -> Result<Value, CoercionError> {
        match self {
            FieldKind::Char | FieldKind::Email | FieldKind::Url => coerce_text(raw),
            FieldKind::Integer => coerce_integer(raw),
            FieldKind::Decimal => coerce_decimal(raw),
            FieldKind::Date => coerce_date(raw),
            FieldKind::Time => coerce_time(raw),
            FieldKind::DateTime => coerce_datetime(raw),
            FieldKind::Duration => coerce_duration(raw),
            FieldKind::Boolean => Ok(Value::Bool(coerce_boolean(raw))),
            FieldKind::NullBoolean | FieldKind::TypedChoice => Ok(coerce_null_boolean(raw)),
            FieldKind::Choice => coerce_choice(raw),
            FieldKind::MultipleChoice => coerce_multiple_choice(raw),
            FieldKind::File | FieldKind::Image => coerce_file(raw),
            FieldKind::Autocomplete => coerce_autocomplete(raw),
            FieldKind::AutocompleteMultiple => coerce_autocomplete_multiple(raw),
        }
    }
}

/// The input control a renderer should draw for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    TextInput,
    Textarea,
    PasswordInput,
    EmailInput,
    UrlInput,
    NumberInput,
    DateInput,
    TimeInput,
    DateTimeInput,
    CheckboxInput,
    RadioSelect,
    Select,
    SelectMultiple,
    CheckboxSelectMultiple,
    NullBooleanSelect,
    ClearableFileInput,
    HiddenInput,
    AutocompleteSelect,
    AutocompleteSelectMultiple,
}

impl WidgetKind {
    pub fn is_hidden(&self) -> bool {
        matches!(self, WidgetKind::HiddenInput)
    }

    /// Parse a kebab-case widget name, as written in form definitions.
    pub fn parse(name: &str) -> Option<Self> {
        serde_json::from_value(Value::String(name.to_string())).ok()
    }
}

/// The typed physical slot a record attribute value is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageKind {
    Text,
    Email,
    Url,
    Integer,
    PositiveInteger,
    Decimal,
    Boolean,
    Date,
    Time,
    DateTime,
    Duration,
    Json,
    File,
    Image,
}

impl StorageKind {
    /// Column name of the slot on an attribute row
    pub fn slot_name(&self) -> &'static str {
        match self {
            StorageKind::Text => "_textfield_value",
            StorageKind::Email => "_emailfield_value",
            StorageKind::Url => "_urlfield_value",
            StorageKind::Integer => "_integerfield_value",
            StorageKind::PositiveInteger => "_positiveintegerfield_value",
            StorageKind::Decimal => "_decimalfield_value",
            StorageKind::Boolean => "_booleanfield_value",
            StorageKind::Date => "_datefield_value",
            StorageKind::Time => "_timefield_value",
            StorageKind::DateTime => "_datetimefield_value",
            StorageKind::Duration => "_durationfield_value",
            StorageKind::Json => "_jsonfield_value",
            StorageKind::File => "_filefield_value",
            StorageKind::Image => "_imagefield_value",
        }
    }
}

fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce_text(raw: &Value) -> Result<Value, CoercionError> {
    match raw {
        Value::Null => Ok(json!("")),
        Value::String(s) => Ok(json!(s.trim())),
        Value::Number(n) => Ok(json!(n.to_string())),
        Value::Bool(b) => Ok(json!(b.to_string())),
        _ => Err(CoercionError::new("Enter a valid value.")),
    }
}

fn coerce_integer(raw: &Value) -> Result<Value, CoercionError> {
    const MESSAGE: &str = "Enter a whole number.";
    if is_blank(raw) {
        return Ok(Value::Null);
    }
    let whole = |f: f64| -> Result<Value, CoercionError> {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            Ok(json!(f as i64))
        } else {
            Err(CoercionError::new(MESSAGE))
        }
    };
    match raw {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(json!(i)),
            None => whole(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => Ok(json!(i)),
                Err(_) => whole(s.parse::<f64>().map_err(|_| CoercionError::new(MESSAGE))?),
            }
        }
        _ => Err(CoercionError::new(MESSAGE)),
    }
}

fn coerce_decimal(raw: &Value) -> Result<Value, CoercionError> {
    const MESSAGE: &str = "Enter a number.";
    if is_blank(raw) {
        return Ok(Value::Null);
    }
    match raw {
        Value::Number(_) => Ok(raw.clone()),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(json!(f)),
            _ => Err(CoercionError::new(MESSAGE)),
        },
        _ => Err(CoercionError::new(MESSAGE)),
    }
}

fn coerce_date(raw: &Value) -> Result<Value, CoercionError> {
    if is_blank(raw) {
        return Ok(Value::Null);
    }
    let text = raw
        .as_str()
        .map(str::trim)
        .ok_or_else(|| CoercionError::new("Enter a valid date."))?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .map(|date| json!(date.format("%Y-%m-%d").to_string()))
        .ok_or_else(|| CoercionError::new("Enter a valid date."))
}

fn coerce_time(raw: &Value) -> Result<Value, CoercionError> {
    if is_blank(raw) {
        return Ok(Value::Null);
    }
    let text = raw
        .as_str()
        .map(str::trim)
        .ok_or_else(|| CoercionError::new("Enter a valid time."))?;
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
        .map(|time| json!(time.format("%H:%M:%S%.f").to_string()))
        .ok_or_else(|| CoercionError::new("Enter a valid time."))
}

fn coerce_datetime(raw: &Value) -> Result<Value, CoercionError> {
    const MESSAGE: &str = "Enter a valid date/time.";
    if is_blank(raw) {
        return Ok(Value::Null);
    }
    let text = raw
        .as_str()
        .map(str::trim)
        .ok_or_else(|| CoercionError::new(MESSAGE))?;

    if let Ok(aware) = DateTime::parse_from_rfc3339(text) {
        return Ok(json!(aware.to_rfc3339()));
    }
    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| CoercionError::new(MESSAGE))?;
    Ok(json!(naive.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))
}

fn coerce_duration(raw: &Value) -> Result<Value, CoercionError> {
    const MESSAGE: &str = "Enter a valid duration.";
    if is_blank(raw) {
        return Ok(Value::Null);
    }
    let seconds = match raw {
        Value::Number(n) => n.as_f64().ok_or_else(|| CoercionError::new(MESSAGE))?,
        Value::String(s) => parse_duration(s.trim()).ok_or_else(|| CoercionError::new(MESSAGE))?,
        _ => return Err(CoercionError::new(MESSAGE)),
    };
    if seconds.fract() == 0.0 {
        Ok(json!(seconds as i64))
    } else {
        Ok(json!(seconds))
    }
}

/// Seconds in `[D ]HH:MM:SS[.f]`, `MM:SS` or a bare number of seconds
fn parse_duration(text: &str) -> Option<f64> {
    let (days, clock) = match text.split_once(char::is_whitespace) {
        Some((days, clock)) => (days.parse::<f64>().ok()?, clock.trim()),
        None => (0.0, text),
    };
    let parts: Vec<f64> = clock
        .split(':')
        .map(|part| part.parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    let clock_seconds = match parts.as_slice() {
        [s] => *s,
        [m, s] => m * 60.0 + s,
        [h, m, s] => h * 3600.0 + m * 60.0 + s,
        _ => return None,
    };
    let total = days * 86_400.0 + clock_seconds;
    total.is_finite().then_some(total)
}

fn coerce_boolean(raw: &Value) -> bool {
    match raw {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => {
            let lowered = s.trim().to_lowercase();
            !(lowered.is_empty() || lowered == "false" || lowered == "0")
        }
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn coerce_null_boolean(raw: &Value) -> Value {
    match raw {
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) if n.as_i64() == Some(1) => Value::Bool(true),
        Value::Number(n) if n.as_i64() == Some(0) => Value::Bool(false),
        Value::String(s) => match s.trim() {
            "True" | "true" | "1" | "yes" | "Yes" => Value::Bool(true),
            "False" | "false" | "0" | "no" | "No" => Value::Bool(false),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

fn coerce_choice(raw: &Value) -> Result<Value, CoercionError> {
    match raw {
        Value::Null => Ok(json!("")),
        Value::String(s) => Ok(json!(s)),
        Value::Number(n) => Ok(json!(n.to_string())),
        Value::Bool(b) => Ok(json!(b.to_string())),
        _ => Err(CoercionError::new("Select a valid choice.")),
    }
}

fn coerce_multiple_choice(raw: &Value) -> Result<Value, CoercionError> {
    match raw {
        Value::Null => Ok(json!([])),
        Value::String(s) if s.is_empty() => Ok(json!([])),
        Value::Array(items) => items
            .iter()
            .map(coerce_choice)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
            .map_err(|_| CoercionError::new("Enter a list of values.")),
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            Ok(Value::Array(vec![coerce_choice(raw)?]))
        }
        Value::Object(_) => Err(CoercionError::new("Enter a list of values.")),
    }
}

fn coerce_file(raw: &Value) -> Result<Value, CoercionError> {
    match raw {
        Value::Null | Value::Bool(false) => Ok(Value::Null),
        Value::String(s) if s.is_empty() || s == "false" => Ok(Value::Null),
        Value::String(_) | Value::Object(_) => Ok(raw.clone()),
        _ => Err(CoercionError::new(
            "No file was submitted. Check the encoding type on the form.",
        )),
    }
}

/// One autocomplete selection: a stable-JSON option or free text.
fn coerce_autocomplete(raw: &Value) -> Result<Value, CoercionError> {
    const MESSAGE: &str = "Select a valid choice.";
    match raw {
        Value::Null => Ok(Value::Null),
        Value::Object(_) => Ok(raw.clone()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s == "null" {
                Ok(Value::Null)
            } else if s.starts_with('{') && s.ends_with('}') {
                match serde_json::from_str::<Value>(s) {
                    Ok(parsed @ Value::Object(_)) => Ok(parsed),
                    _ => Err(CoercionError::new(MESSAGE)),
                }
            } else {
                Ok(json!({"extra": {}, "id": s, "text": s}))
            }
        }
        Value::Array(items) => items
            .iter()
            .map(coerce_autocomplete)
            .find(|coerced| !matches!(coerced, Ok(Value::Null)))
            .unwrap_or(Ok(Value::Null)),
        Value::Number(n) => {
            let text = n.to_string();
            Ok(json!({"extra": {}, "id": raw, "text": text}))
        }
        Value::Bool(_) => Err(CoercionError::new(MESSAGE)),
    }
}

fn coerce_autocomplete_multiple(raw: &Value) -> Result<Value, CoercionError> {
    let entries: Vec<&Value> = match raw {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    let mut options = Vec::new();
    for entry in entries {
        let coerced = coerce_autocomplete(entry)?;
        if !coerced.is_null() {
            options.push(coerced);
        }
    }
    Ok(Value::Array(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn coerce(kind: FieldKind, raw: Value) -> Result<Value, CoercionError> {
        kind.coerce(&raw)
    }

    #[rstest]
    #[case(json!("42"), json!(42))]
    #[case(json!(" -7 "), json!(-7))]
    #[case(json!("3.0"), json!(3))]
    #[case(json!(12), json!(12))]
    #[case(json!(""), json!(null))]
    #[case(json!(null), json!(null))]
    fn test_integer_coercion(#[case] raw: Value, #[case] expected: Value) {
        assert_eq!(coerce(FieldKind::Integer, raw).unwrap(), expected);
    }

    #[rstest]
    #[case(json!("3.5"))]
    #[case(json!("twelve"))]
    #[case(json!(true))]
    fn test_integer_rejects(#[case] raw: Value) {
        let err = coerce(FieldKind::Integer, raw).unwrap_err();
        assert_eq!(err.message, "Enter a whole number.");
    }

    #[test]
    fn test_decimal_coercion() {
        assert_eq!(coerce(FieldKind::Decimal, json!("2.50")).unwrap(), json!(2.5));
        assert!(coerce(FieldKind::Decimal, json!("abc")).is_err());
    }

    #[rstest]
    #[case(FieldKind::Date, json!("2024-02-29"), json!("2024-02-29"))]
    #[case(FieldKind::Date, json!("02/29/2024"), json!("2024-02-29"))]
    #[case(FieldKind::Time, json!("09:30"), json!("09:30:00"))]
    #[case(FieldKind::Time, json!("09:30:15"), json!("09:30:15"))]
    #[case(FieldKind::DateTime, json!("2024-02-29 09:30"), json!("2024-02-29T09:30:00"))]
    #[case(FieldKind::DateTime, json!("2024-02-29T09:30:00+02:00"), json!("2024-02-29T09:30:00+02:00"))]
    #[case(FieldKind::Duration, json!("1:30"), json!(90))]
    #[case(FieldKind::Duration, json!("1 02:00:00"), json!(93600))]
    #[case(FieldKind::Duration, json!(45), json!(45))]
    fn test_temporal_coercion(#[case] kind: FieldKind, #[case] raw: Value, #[case] expected: Value) {
        assert_eq!(coerce(kind, raw).unwrap(), expected);
    }

    #[test]
    fn test_invalid_date() {
        assert!(coerce(FieldKind::Date, json!("2023-02-29")).is_err());
    }

    #[rstest]
    #[case(json!("false"), false)]
    #[case(json!("0"), false)]
    #[case(json!(""), false)]
    #[case(json!("on"), true)]
    #[case(json!(true), true)]
    fn test_boolean_coercion(#[case] raw: Value, #[case] expected: bool) {
        assert_eq!(coerce(FieldKind::Boolean, raw).unwrap(), json!(expected));
    }

    #[test]
    fn test_null_boolean_keeps_unknown() {
        assert_eq!(coerce(FieldKind::NullBoolean, json!("True")).unwrap(), json!(true));
        assert_eq!(coerce(FieldKind::NullBoolean, json!("unknown")).unwrap(), json!(null));
    }

    #[test]
    fn test_file_sentinel_means_no_file() {
        assert_eq!(coerce(FieldKind::File, json!("false")).unwrap(), json!(null));
        assert_eq!(coerce(FieldKind::Image, json!(false)).unwrap(), json!(null));
        assert_eq!(
            coerce(FieldKind::File, json!("uploads/menu.pdf")).unwrap(),
            json!("uploads/menu.pdf")
        );
    }

    #[test]
    fn test_autocomplete_parses_stable_json_and_free_text() {
        let parsed = coerce(
            FieldKind::Autocomplete,
            json!(r#"{"extra":{},"id":"5","text":"Alice"}"#),
        )
        .unwrap();
        assert_eq!(parsed, json!({"extra": {}, "id": "5", "text": "Alice"}));

        let free = coerce(FieldKind::Autocomplete, json!("Bob")).unwrap();
        assert_eq!(free, json!({"extra": {}, "id": "Bob", "text": "Bob"}));

        assert_eq!(coerce(FieldKind::Autocomplete, json!("null")).unwrap(), json!(null));
    }

    #[test]
    fn test_autocomplete_multiple_skips_empty_entries() {
        let coerced = coerce(
            FieldKind::AutocompleteMultiple,
            json!(["", "null", "Bob", r#"{"extra":{},"id":"5","text":"Alice"}"#]),
        )
        .unwrap();
        assert_eq!(coerced.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_widget_parse() {
        assert_eq!(WidgetKind::parse("hidden-input"), Some(WidgetKind::HiddenInput));
        assert_eq!(WidgetKind::parse("marquee"), None);
    }

    #[test]
    fn test_default_widgets() {
        assert_eq!(FieldKind::Boolean.default_widget(), WidgetKind::CheckboxInput);
        assert_eq!(
            FieldKind::AutocompleteMultiple.default_widget(),
            WidgetKind::AutocompleteSelectMultiple
        );
    }
}
