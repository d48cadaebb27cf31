//! Logging utilities for Flexform
//!
//! This module provides utilities for formatting and displaying log messages.

use serde::Serialize;
use std::fmt::Debug;

/// Wrapper for pretty-printing types in logs as YAML
///
/// Use this in tracing statements to format complex values (field sets,
/// option maps, record data) as YAML with a newline before the content:
///
/// ```ignore
/// use flexform_common::Pretty;
/// use tracing::debug;
///
/// debug!("materialized values: {}", Pretty(&values));
/// ```
///
/// Debug is used as a fallback if YAML serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_renders_yaml_on_new_line() {
        let rendered = format!("{}", Pretty(json!({"name": "pizza"})));
        assert!(rendered.starts_with('\n'));
        assert!(rendered.contains("name: pizza"));
    }
}
