//! Two-pass form materialization.
//!
//! Pass 1 builds every field without modifiers and coerces the merged raw
//! values into a snapshot. Pass 2 rebuilds every field with its modifiers
//! resolved against that snapshot. A modifier can therefore depend on any
//! other field's value one hop away; longer chains are not followed.

use crate::error::Result;
use flexform_common::Pretty;
use flexform_expr::Evaluator;
use flexform_fields::{
    EditableField, FieldTypeRegistry, FieldsetRow, FormDefinition, Values,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw values offered to a form.
///
/// `stored` holds the values already saved for the record being edited,
/// `submitted` the values just posted and `files` any uploaded files.
/// Keys that are not fields of the form are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub submitted: Values,
    #[serde(default)]
    pub stored: Values,
    #[serde(default)]
    pub files: Values,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(mut self, values: Values) -> Self {
        self.submitted = values;
        self
    }

    pub fn stored(mut self, values: Values) -> Self {
        self.stored = values;
        self
    }

    pub fn files(mut self, values: Values) -> Self {
        self.files = values;
        self
    }

    /// True when the user posted anything
    pub fn is_bound(&self) -> bool {
        !self.submitted.is_empty() || !self.files.is_empty()
    }
}

/// The modifier-resolved fields of one form for one value snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditableFieldSet {
    pub form: String,
    pub label: String,
    pub is_bound: bool,
    /// Fields in declaration order
    pub fields: IndexMap<String, EditableField>,
    /// Coerced value of every field after pass 1
    pub values: Values,
    pub fieldsets: Vec<FieldsetRow>,
    /// Fields whose raw value failed coercion, with the user-facing message
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub coercion_errors: BTreeMap<String, String>,
}

impl EditableFieldSet {
    pub fn field(&self, name: &str) -> Option<&EditableField> {
        self.fields.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Materialize `form` against `input`.
///
/// Definition problems (unknown field types, broken fieldsets) and
/// modifier failures other than an undefined name are returned as errors.
pub fn materialize(
    form: &FormDefinition,
    input: &FormInput,
    registry: &FieldTypeRegistry,
    evaluator: &Evaluator,
) -> Result<EditableFieldSet> {
    let raw = merge_raw_values(form, input);
    let empty = Values::new();

    let mut values = Values::new();
    let mut coercion_errors = BTreeMap::new();
    for definition in &form.fields {
        let spec = registry.lookup(&definition.field_type)?;
        let draft = spec.build_editable_field(
            &definition.name,
            &definition.base_options(),
            &[],
            &empty,
            evaluator,
        )?;

        let raw_value = raw.get(&definition.name).cloned().unwrap_or(Value::Null);
        let value = if draft.kind.is_file() && is_no_file_sentinel(&raw_value) {
            Value::Null
        } else {
            match draft.kind.coerce(&raw_value) {
                Ok(value) => value,
                Err(error) => {
                    tracing::warn!(
                        form = %form.name,
                        field = %definition.name,
                        "keeping raw value after coercion failure: {}",
                        error
                    );
                    coercion_errors.insert(definition.name.clone(), error.message);
                    raw_value
                }
            }
        };
        values.insert(definition.name.clone(), value);
    }
    tracing::debug!(form = %form.name, "pass 1 values: {}", Pretty(&values));

    let mut fields = IndexMap::with_capacity(form.fields.len());
    for definition in &form.fields {
        let spec = registry.lookup(&definition.field_type)?;
        let field = spec.build_editable_field(
            &definition.name,
            &definition.base_options(),
            &definition.modifiers,
            &values,
            evaluator,
        )?;
        fields.insert(definition.name.clone(), field);
    }
    tracing::debug!(form = %form.name, fields = fields.len(), "materialized form");

    Ok(EditableFieldSet {
        form: form.name.clone(),
        label: form.label.clone(),
        is_bound: input.is_bound(),
        fields,
        values,
        fieldsets: form.layout()?,
        coercion_errors,
    })
}

/// `initial ← stored ← submitted ← files`, restricted to the form's fields
fn merge_raw_values(form: &FormDefinition, input: &FormInput) -> Values {
    let mut raw = form.initial_values();
    for layer in [&input.stored, &input.submitted, &input.files] {
        for (name, value) in layer {
            if let Some(slot) = raw.get_mut(name) {
                *slot = value.clone();
            }
        }
    }
    raw
}

/// A cleared file input posts the literal "false"
fn is_no_file_sentinel(value: &Value) -> bool {
    matches!(value, Value::Bool(false)) || value.as_str() == Some("false")
}
