//! Error types for autocomplete sources

use flexform_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Result type for autocomplete operations
pub type Result<T> = std::result::Result<T, AutocompleteError>;

/// Errors that can occur while searching an autocomplete source
#[derive(Debug, Error)]
pub enum AutocompleteError {
    /// Network or decoding failure talking to the endpoint
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("autocomplete endpoint {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The URL template could not be parsed or rendered
    #[error("invalid URL template: {message}")]
    Template { message: String },

    /// The rendered URL is not a valid absolute URL
    #[error("invalid autocomplete URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// A field's autocomplete options are malformed
    #[error("invalid autocomplete configuration for '{field}': {message}")]
    Config { field: String, message: String },

    /// A submitted selection could not be read
    #[error("invalid selection: {message}")]
    InvalidSelection { message: String },
}

impl Severity for AutocompleteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            AutocompleteError::Http(_) | AutocompleteError::Status { .. } => ErrorSeverity::Warning,
            AutocompleteError::InvalidSelection { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let error = AutocompleteError::Status {
            url: "https://example.com/people".into(),
            status: 503,
        };
        assert_eq!(
            error.to_string(),
            "autocomplete endpoint https://example.com/people returned status 503"
        );
        assert_eq!(error.severity(), ErrorSeverity::Warning);
    }
}
