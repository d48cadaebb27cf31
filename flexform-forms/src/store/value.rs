//! Typed storage slots

use super::StoreError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use flexform_fields::StorageKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A value in exactly one typed slot.
///
/// Email and URL fields share the text slot; image fields share the file
/// slot. Naive date-times are stored at UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slot", content = "value", rename_all = "kebab-case")]
pub enum StoredValue {
    Null,
    Text(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime<FixedOffset>),
    /// Seconds
    Duration(f64),
    Json(Value),
    File(String),
}

impl StoredValue {
    /// Place a cleaned value into the slot for `kind`.
    pub fn from_json(field: &str, kind: StorageKind, value: &Value) -> Result<Self, StoreError> {
        if value.is_null() {
            return Ok(StoredValue::Null);
        }
        let mismatch = |message: &str| StoreError::TypeMismatch {
            field: field.to_string(),
            slot: kind.slot_name().to_string(),
            message: message.to_string(),
        };

        match kind {
            StorageKind::Text | StorageKind::Email | StorageKind::Url => match value {
                Value::String(s) => Ok(StoredValue::Text(s.clone())),
                Value::Number(n) => Ok(StoredValue::Text(n.to_string())),
                Value::Bool(b) => Ok(StoredValue::Text(b.to_string())),
                _ => Err(mismatch("expected text")),
            },
            StorageKind::Integer | StorageKind::PositiveInteger => {
                let number = as_integer(value).ok_or_else(|| mismatch("expected a whole number"))?;
                if kind == StorageKind::PositiveInteger && number < 0 {
                    return Err(mismatch("expected a positive whole number"));
                }
                Ok(StoredValue::Integer(number))
            }
            StorageKind::Decimal => as_float(value)
                .map(StoredValue::Decimal)
                .ok_or_else(|| mismatch("expected a number")),
            StorageKind::Boolean => match value {
                Value::Bool(b) => Ok(StoredValue::Boolean(*b)),
                Value::String(s) if s == "true" || s == "false" => {
                    Ok(StoredValue::Boolean(s == "true"))
                }
                _ => Err(mismatch("expected a boolean")),
            },
            StorageKind::Date => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .map(StoredValue::Date)
                .ok_or_else(|| mismatch("expected a YYYY-MM-DD date")),
            StorageKind::Time => value
                .as_str()
                .and_then(|s| NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok())
                .map(StoredValue::Time)
                .ok_or_else(|| mismatch("expected an HH:MM:SS time")),
            StorageKind::DateTime => value
                .as_str()
                .and_then(parse_datetime)
                .map(StoredValue::DateTime)
                .ok_or_else(|| mismatch("expected an ISO 8601 date/time")),
            StorageKind::Duration => as_float(value)
                .map(StoredValue::Duration)
                .ok_or_else(|| mismatch("expected a number of seconds")),
            StorageKind::Json => Ok(StoredValue::Json(value.clone())),
            StorageKind::File | StorageKind::Image => match value {
                Value::String(s) => Ok(StoredValue::File(s.clone())),
                Value::Object(map) => map
                    .get("name")
                    .and_then(Value::as_str)
                    .map(|name| StoredValue::File(name.to_string()))
                    .ok_or_else(|| mismatch("file object has no name")),
                _ => Err(mismatch("expected a file name")),
            },
        }
    }

    /// The value as it appears in a record's data map
    pub fn to_json(&self) -> Value {
        match self {
            StoredValue::Null => Value::Null,
            StoredValue::Text(s) | StoredValue::File(s) => json!(s),
            StoredValue::Integer(i) => json!(i),
            StoredValue::Decimal(f) => json!(f),
            StoredValue::Boolean(b) => json!(b),
            StoredValue::Date(date) => json!(date.format("%Y-%m-%d").to_string()),
            StoredValue::Time(time) => json!(time.format("%H:%M:%S%.f").to_string()),
            StoredValue::DateTime(datetime) => json!(datetime.to_rfc3339()),
            StoredValue::Duration(seconds) if seconds.fract() == 0.0 => json!(*seconds as i64),
            StoredValue::Duration(seconds) => json!(seconds),
            StoredValue::Json(value) => value.clone(),
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).ok().or_else(|| {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}
