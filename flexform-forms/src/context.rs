//! Explicit dependencies for form processing

use crate::error::Result;
use crate::pipeline::{materialize, EditableFieldSet, FormInput};
use flexform_expr::Evaluator;
use flexform_fields::{validate_form, FieldTypeRegistry, FormDefinition};
use std::sync::Arc;

/// The registry and evaluator every form operation runs against.
///
/// Built once at startup and shared; cloning is cheap.
#[derive(Debug, Clone)]
pub struct FormsContext {
    registry: Arc<FieldTypeRegistry>,
    evaluator: Arc<Evaluator>,
}

impl FormsContext {
    pub fn new(registry: FieldTypeRegistry, evaluator: Evaluator) -> Self {
        Self {
            registry: Arc::new(registry),
            evaluator: Arc::new(evaluator),
        }
    }

    /// Built-in field types and a default evaluator
    pub fn with_builtins() -> Result<Self> {
        Ok(Self::new(FieldTypeRegistry::with_builtins()?, Evaluator::new()))
    }

    pub fn registry(&self) -> &Arc<FieldTypeRegistry> {
        &self.registry
    }

    pub fn evaluator(&self) -> &Arc<Evaluator> {
        &self.evaluator
    }

    /// Check a definition before it is saved
    pub fn validate(&self, form: &FormDefinition) -> Result<()> {
        Ok(validate_form(form, &self.registry, &self.evaluator)?)
    }

    /// Run the two-pass pipeline for `form`
    pub fn materialize(&self, form: &FormDefinition, input: &FormInput) -> Result<EditableFieldSet> {
        materialize(form, input, &self.registry, &self.evaluator)
    }
}
