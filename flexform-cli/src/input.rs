//! Parsing of values given on the command line or in JSON files

use anyhow::{bail, Context, Result};
use flexform_fields::Values;
use serde_json::Value;
use std::path::Path;

/// Parse `NAME=JSON`. Text that is not valid JSON is taken as a string, so
/// `crust=thin` and `crust="thin"` mean the same thing.
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("expected NAME=JSON, got '{}'", raw);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("missing field name in '{}'", raw);
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// Collect `NAME=JSON` assignments; later ones win
pub fn parse_assignments(raw: &[String]) -> Result<Values> {
    raw.iter().map(|entry| parse_assignment(entry)).collect()
}

/// Read a JSON object of values from `path`
pub fn read_values_file(path: &Path) -> Result<Values> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?
    {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => bail!(
            "{} must contain a JSON object, found {}",
            path.display(),
            kind_of(&other)
        ),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_and_bare_values() {
        assert_eq!(parse_assignment("diameter=12").unwrap(), ("diameter".into(), json!(12)));
        assert_eq!(parse_assignment("crust=thin").unwrap(), ("crust".into(), json!("thin")));
        assert_eq!(
            parse_assignment("toppings=[\"ham\"]").unwrap(),
            ("toppings".into(), json!(["ham"]))
        );
        assert_eq!(parse_assignment("note=a=b").unwrap(), ("note".into(), json!("a=b")));
    }

    #[test]
    fn test_malformed_assignments() {
        assert!(parse_assignment("crust").is_err());
        assert!(parse_assignment("=thin").is_err());
    }

    #[test]
    fn test_later_assignment_wins() {
        let values = parse_assignments(&["a=1".to_string(), "a=2".to_string()]).unwrap();
        assert_eq!(values.get("a"), Some(&json!(2)));
    }

    #[test]
    fn test_values_file_must_be_object() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("values.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let error = read_values_file(&path).unwrap_err();
        assert!(error.to_string().contains("must contain a JSON object, found an array"));

        std::fs::write(&path, r#"{"crust": "thin"}"#).unwrap();
        assert_eq!(read_values_file(&path).unwrap().get("crust"), Some(&json!("thin")));
    }
}
