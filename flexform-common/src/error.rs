//! Severity classification shared by Flexform error types

/// Severity levels for error classification
///
/// - **Warning**: something looks off but the operation completed.
/// - **Error**: the operation failed and the caller can recover.
/// - **Critical**: the process state is suspect, for example the storage
///   collaborator refused a commit or the registry was built inconsistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,
    /// Operation failed but system can continue
    Error,
    /// System cannot continue, requires immediate attention
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Trait for error types that have severity levels
///
/// Every error enum in the workspace implements this so that callers (the
/// CLI in particular) can pick a log level and exit status without matching
/// on variants from other crates.
///
/// ```rust
/// use flexform_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum LookupError {
///     Missing,
///     Corrupt,
/// }
///
/// impl Severity for LookupError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             LookupError::Missing => ErrorSeverity::Error,
///             LookupError::Corrupt => ErrorSeverity::Critical,
///         }
///     }
/// }
///
/// assert_eq!(LookupError::Corrupt.severity(), ErrorSeverity::Critical);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}
