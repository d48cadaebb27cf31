//! Error types for the field registry and form definitions

use flexform_common::{ErrorSeverity, Severity};
use flexform_expr::ExprError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in field registry and definition operations
#[derive(Debug, Error)]
pub enum FieldsError {
    /// A field type with this name is already registered
    #[error("field type already registered: {name}")]
    DuplicateFieldType { name: String },

    /// No field type is registered under this name
    #[error("unknown field type: {name}")]
    UnknownFieldType { name: String },

    /// Two fields on one form share a machine name
    #[error("duplicate field name: {name}")]
    DuplicateFieldName { name: String },

    /// Field not found on the form
    #[error("field not found: {name}")]
    FieldNotFound { name: String },

    /// A modifier expression failed validation
    #[error("invalid modifier for '{attribute}' on field '{field}': {message}")]
    InvalidModifier {
        field: String,
        attribute: String,
        message: String,
    },

    /// A modifier expression failed while materializing a field
    #[error("modifier for '{attribute}' on field '{field}' failed: {source}")]
    ModifierFailed {
        field: String,
        attribute: String,
        #[source]
        source: ExprError,
    },

    /// A custom applicator rejected the value it was given
    #[error("cannot apply '{attribute}' to field '{field}': {message}")]
    Applicator {
        field: String,
        attribute: String,
        message: String,
    },

    /// A fieldset layout is inconsistent
    #[error("invalid fieldset '{fieldset}': {message}")]
    InvalidFieldset { fieldset: String, message: String },

    /// Form definition file not found
    #[error("form definition not found: {path}")]
    DefinitionNotFound { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl Severity for FieldsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FieldsError::DuplicateFieldType { .. } => ErrorSeverity::Critical,
            FieldsError::ModifierFailed { .. } | FieldsError::Applicator { .. } => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::Error,
        }
    }
}

/// A raw value could not be converted by a field's coercion rule.
///
/// The message is user-facing ("Enter a whole number.").
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CoercionError {
    pub message: String,
}

impl CoercionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldsError::UnknownFieldType {
            name: "ColorPickerField".into(),
        };
        assert_eq!(err.to_string(), "unknown field type: ColorPickerField");
    }

    #[test]
    fn test_invalid_modifier_names_field_and_attribute() {
        let err = FieldsError::InvalidModifier {
            field: "toppings".into(),
            attribute: "hidden".into(),
            message: "'crust' is not defined".into(),
        };
        let text = err.to_string();
        assert!(text.contains("toppings"));
        assert!(text.contains("hidden"));
        assert!(text.contains("'crust' is not defined"));
    }

    #[test]
    fn test_duplicate_type_is_critical() {
        let err = FieldsError::DuplicateFieldType {
            name: "EmailField".into(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
