//! Definition-time validation of forms and their modifiers
//!
//! Every field type must be registered, and every modifier must evaluate
//! cleanly against the initial values of the whole form. Failures carry a
//! message that is fit to show to whoever wrote the expression.

use crate::error::{FieldsError, Result};
use crate::options::Values;
use crate::registry::FieldTypeRegistry;
use crate::types::{FieldModifier, FormDefinition};
use flexform_expr::{Evaluator, ExprError};
use std::collections::BTreeSet;

/// Validate `form`, returning the first problem found.
pub fn validate_form(
    form: &FormDefinition,
    registry: &FieldTypeRegistry,
    evaluator: &Evaluator,
) -> Result<()> {
    match form_errors(form, registry, evaluator).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every problem with `form`, in field declaration order
pub fn form_errors(
    form: &FormDefinition,
    registry: &FieldTypeRegistry,
    evaluator: &Evaluator,
) -> Vec<FieldsError> {
    let mut errors = Vec::new();

    let mut seen = BTreeSet::new();
    for field in &form.fields {
        if !seen.insert(field.name.as_str()) {
            errors.push(FieldsError::DuplicateFieldName {
                name: field.name.clone(),
            });
        }
        if let Err(err) = registry.lookup(&field.field_type) {
            errors.push(err);
        }
    }

    let names = coerced_initial_values(form, registry);
    for field in &form.fields {
        for modifier in &field.modifiers {
            if let Err(err) = validate_modifier(&field.name, modifier, &names, evaluator) {
                errors.push(err);
            }
        }
    }

    errors
}

/// Evaluate one modifier against `names`, translating failures into a
/// [`FieldsError::InvalidModifier`] with an actionable message.
pub fn validate_modifier(
    field: &str,
    modifier: &FieldModifier,
    names: &Values,
    evaluator: &Evaluator,
) -> Result<()> {
    let message = match evaluator.evaluate(&modifier.expression, names) {
        Ok(_) => return Ok(()),
        Err(ExprError::NameNotDefined { name }) => {
            let valid: Vec<&str> = names.keys().map(String::as_str).collect();
            format!(
                "'{}' is not defined. Valid names are: {}",
                name,
                valid.join(", ")
            )
        }
        Err(ExprError::FunctionNotDefined { name }) => format!(
            "'{}' is not a valid function. Valid functions are: {}",
            name,
            evaluator.allowed_functions().join(", ")
        ),
        Err(ExprError::Expression { message }) => message,
    };

    Err(FieldsError::InvalidModifier {
        field: field.to_string(),
        attribute: modifier.attribute.clone(),
        message,
    })
}

/// Initial values run through each field's coercion; raw values are kept
/// when coercion fails or the type is unknown.
fn coerced_initial_values(form: &FormDefinition, registry: &FieldTypeRegistry) -> Values {
    form.fields
        .iter()
        .map(|field| {
            let value = registry
                .get(&field.field_type)
                .and_then(|spec| spec.coerce(&field.initial).ok())
                .unwrap_or_else(|| field.initial.clone());
            (field.name.clone(), value)
        })
        .collect()
}
