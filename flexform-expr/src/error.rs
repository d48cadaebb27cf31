//! Error types for expression evaluation

use flexform_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Result type for expression operations
pub type Result<T> = std::result::Result<T, ExprError>;

/// Errors raised while compiling or evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// The expression referenced a name that was not supplied
    #[error("name '{name}' is not defined")]
    NameNotDefined { name: String },

    /// The expression called a function outside the allow-list
    #[error("function '{name}' is not defined")]
    FunctionNotDefined { name: String },

    /// Any other compile or evaluation failure
    #[error("{message}")]
    Expression { message: String },
}

impl ExprError {
    /// Build a generic expression error from anything displayable
    pub fn expression(message: impl std::fmt::Display) -> Self {
        ExprError::Expression {
            message: message.to_string(),
        }
    }
}

impl Severity for ExprError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ExprError::NameNotDefined { .. } => ErrorSeverity::Warning,
            ExprError::FunctionNotDefined { .. } | ExprError::Expression { .. } => {
                ErrorSeverity::Error
            }
        }
    }
}
