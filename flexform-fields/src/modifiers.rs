//! Modifier resolution
//!
//! Modifiers are applied one at a time in declaration order. Each one is
//! resolved against the current value snapshot; a modifier whose expression
//! needs a value that is not present yet is skipped. A resolved value goes
//! to the field type's applicator for that attribute if there is one, or is
//! assigned to the field attribute of the same name otherwise. Either way it
//! is recorded in the field's `_modifiers` map.

use crate::editable::EditableField;
use crate::error::{FieldsError, Result};
use crate::options::Values;
use crate::spec::FieldTypeSpec;
use crate::types::FieldModifier;
use flexform_expr::{Evaluator, Resolution};

/// Apply `modifiers` to `field` in order and return the updated field.
///
/// Only a missing name is tolerated; a disallowed function or any other
/// evaluation failure is returned as [`FieldsError::ModifierFailed`].
pub fn apply_modifiers(
    spec: &FieldTypeSpec,
    mut field: EditableField,
    modifiers: &[FieldModifier],
    current: &Values,
    evaluator: &Evaluator,
) -> Result<EditableField> {
    for modifier in modifiers {
        let resolution = evaluator
            .resolve(&modifier.expression, current)
            .map_err(|source| FieldsError::ModifierFailed {
                field: field.name.clone(),
                attribute: modifier.attribute.clone(),
                source,
            })?;

        let value = match resolution {
            Resolution::Resolved(value) => value,
            Resolution::Unresolved { name } => {
                tracing::trace!(
                    field = %field.name,
                    attribute = %modifier.attribute,
                    missing = %name,
                    "modifier skipped"
                );
                continue;
            }
        };

        field = match spec.get_applicator(&modifier.attribute) {
            Some(applicator) => applicator(field, &value, current)?,
            None => {
                if !field.set_attribute(&modifier.attribute, &value) {
                    tracing::trace!(
                        field = %field.name,
                        attribute = %modifier.attribute,
                        "modifier attribute has no direct effect"
                    );
                }
                field
            }
        };
        field.modifiers.insert(modifier.attribute.clone(), value);
    }

    Ok(field)
}
