//! `flexform materialize`

use super::load_form;
use crate::input::{parse_assignments, read_values_file};
use anyhow::Result;
use flexform_fields::Values;
use flexform_forms::{to_json, FormInput, FormsContext};
use serde_json::json;
use std::path::PathBuf;

/// Arguments of `flexform materialize`
#[derive(Debug, Default)]
pub struct MaterializeArgs {
    pub form: PathBuf,
    pub values: Vec<String>,
    pub values_file: Option<PathBuf>,
    pub stored: Option<PathBuf>,
    pub clean: bool,
}

/// Print the field set, or with `clean` the cleaned values or the errors.
/// Returns false when cleaning found errors.
pub fn run(context: &FormsContext, args: &MaterializeArgs) -> Result<bool> {
    let form = load_form(&args.form)?;

    let mut submitted = match &args.values_file {
        Some(path) => read_values_file(path)?,
        None => Values::new(),
    };
    submitted.extend(parse_assignments(&args.values)?);

    let mut input = FormInput::new();
    if let Some(path) = &args.stored {
        input = input.stored(read_values_file(path)?);
    }
    if !submitted.is_empty() {
        input = input.submitted(submitted);
    }

    let set = context.materialize(&form, &input)?;
    if !args.clean {
        println!("{}", serde_json::to_string_pretty(&to_json(&set))?);
        return Ok(true);
    }

    let (output, valid) = match set.clean() {
        Ok(cleaned) => (json!({"valid": true, "data": cleaned}), true),
        Err(errors) => (json!({"valid": false, "errors": errors.errors}), false),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(valid)
}
