//! Failure reporting and exit statuses

use flexform_autocomplete::AutocompleteError;
use flexform_common::{ErrorSeverity, Severity};
use flexform_config::ConfigError;
use flexform_expr::ExprError;
use flexform_fields::FieldsError;
use flexform_forms::{FormsError, StoreError};
use std::process::ExitCode;

/// Exit status when a form or its values are invalid, or a command fails
pub const EXIT_FAILURE: u8 = 1;

/// Exit status for critical failures such as a broken configuration file
/// or a storage backend error
pub const EXIT_CRITICAL: u8 = 2;

/// Severity of the first Flexform error in the cause chain.
///
/// Errors from outside the workspace (I/O, JSON input) count as
/// [`ErrorSeverity::Error`].
pub fn failure_severity(error: &anyhow::Error) -> ErrorSeverity {
    error
        .chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<ConfigError>() {
                Some(e.severity())
            } else if let Some(e) = cause.downcast_ref::<FormsError>() {
                Some(e.severity())
            } else if let Some(e) = cause.downcast_ref::<StoreError>() {
                Some(e.severity())
            } else if let Some(e) = cause.downcast_ref::<FieldsError>() {
                Some(e.severity())
            } else if let Some(e) = cause.downcast_ref::<AutocompleteError>() {
                Some(e.severity())
            } else {
                cause.downcast_ref::<ExprError>().map(Severity::severity)
            }
        })
        .unwrap_or(ErrorSeverity::Error)
}

pub fn exit_status(severity: ErrorSeverity) -> u8 {
    match severity {
        ErrorSeverity::Critical => EXIT_CRITICAL,
        ErrorSeverity::Warning | ErrorSeverity::Error => EXIT_FAILURE,
    }
}

/// Log `error` at the level its severity calls for, print it, and pick
/// the process exit code.
pub fn report_failure(error: &anyhow::Error) -> ExitCode {
    let severity = failure_severity(error);
    match severity {
        ErrorSeverity::Warning => tracing::info!(%severity, ?error, "command failed"),
        ErrorSeverity::Error => tracing::warn!(%severity, ?error, "command failed"),
        ErrorSeverity::Critical => tracing::error!(%severity, ?error, "command failed"),
    }
    eprintln!("Error: {:#}", error);
    ExitCode::from(exit_status(severity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use flexform_forms::ValidationErrors;

    #[test]
    fn test_config_parse_failure_is_critical() {
        let figment_error = figment::Error::from("bad toml".to_string());
        let error = anyhow::Error::from(ConfigError::from(figment_error));
        assert_eq!(failure_severity(&error), ErrorSeverity::Critical);
        assert_eq!(exit_status(failure_severity(&error)), EXIT_CRITICAL);
    }

    #[test]
    fn test_store_failure_is_critical_through_context() {
        let error = Err::<(), _>(FormsError::Store(StoreError::Poisoned))
            .context("saving record")
            .unwrap_err();
        assert_eq!(failure_severity(&error), ErrorSeverity::Critical);
    }

    #[test]
    fn test_invalid_input_exits_with_failure() {
        let error = anyhow::Error::from(ConfigError::invalid_value(
            "autocomplete.max_per_page",
            "must be at least 1",
        ));
        assert_eq!(failure_severity(&error), ErrorSeverity::Error);
        assert_eq!(exit_status(failure_severity(&error)), EXIT_FAILURE);

        let error = anyhow::Error::from(FormsError::Validation(ValidationErrors::default()));
        assert_eq!(failure_severity(&error), ErrorSeverity::Warning);
        assert_eq!(exit_status(failure_severity(&error)), EXIT_FAILURE);
    }

    #[test]
    fn test_foreign_errors_default_to_error() {
        let error = anyhow::anyhow!("reading form.yaml: No such file or directory");
        assert_eq!(failure_severity(&error), ErrorSeverity::Error);
    }
}
