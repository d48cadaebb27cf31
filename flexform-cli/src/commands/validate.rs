//! `flexform validate`

use super::load_form;
use anyhow::Result;
use flexform_fields::form_errors;
use flexform_forms::FormsContext;
use std::path::Path;

/// Print every problem with the form. Returns whether it is valid.
pub fn run(context: &FormsContext, path: &Path) -> Result<bool> {
    let form = load_form(path)?;
    let errors = form_errors(&form, context.registry(), context.evaluator());
    if errors.is_empty() {
        println!(
            "{}: form '{}' is valid ({} fields)",
            path.display(),
            form.name,
            form.fields.len()
        );
        return Ok(true);
    }

    for error in &errors {
        println!("{}: {}", path.display(), error);
    }
    tracing::info!(form = %form.name, count = errors.len(), "form definition rejected");
    Ok(false)
}
