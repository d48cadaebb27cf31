//! Error types for materialization and record storage

use crate::clean::ValidationErrors;
use crate::store::StoreError;
use flexform_common::{ErrorSeverity, Severity};
use flexform_fields::FieldsError;
use thiserror::Error;

/// Result type for forms operations
pub type Result<T> = std::result::Result<T, FormsError>;

/// Errors that can occur while materializing forms or persisting records
#[derive(Debug, Error)]
pub enum FormsError {
    /// Definition, registry or modifier failure
    #[error(transparent)]
    Fields(#[from] FieldsError),

    /// The storage collaborator failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A record was asked to hold a value for a field its form lacks
    #[error("field '{name}' is not defined on form '{form}'")]
    UnknownField { form: String, name: String },

    /// Submitted data failed cleaning
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl Severity for FormsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FormsError::Fields(e) => e.severity(),
            FormsError::Store(_) => ErrorSeverity::Critical,
            FormsError::UnknownField { .. } => ErrorSeverity::Error,
            FormsError::Validation(_) => ErrorSeverity::Warning,
        }
    }
}
