//! Field type descriptors
//!
//! A [`FieldTypeSpec`] is everything the registry knows about one field type:
//! which editable-field kind and widget it uses, which storage slot holds its
//! values, default options for each, and custom applicators for attributes
//! that need more than a plain assignment.

use crate::editable::{EditableField, Widget};
use crate::error::{CoercionError, Result};
use crate::kinds::{FieldKind, StorageKind, WidgetKind};
use crate::modifiers::apply_modifiers;
use crate::options::{merge_options, truthy, Options, Values};
use crate::types::FieldModifier;
use flexform_expr::Evaluator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Option key carrying per-field widget attributes inside editable options
pub const WIDGET_OPTIONS_KEY: &str = "widget_options";

/// Custom handler for one modifier attribute.
///
/// Receives the field, the value computed for the attribute and the full
/// value snapshot, and returns the updated field.
pub type Applicator =
    Arc<dyn Fn(EditableField, &Value, &Values) -> Result<EditableField> + Send + Sync>;

/// Physical storage descriptor for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageField {
    pub kind: StorageKind,
    #[serde(default)]
    pub options: Options,
}

/// Descriptor for one field type
#[derive(Clone)]
pub struct FieldTypeSpec {
    name: String,
    label: String,
    kind: FieldKind,
    editable_options: Options,
    widget: Option<WidgetKind>,
    widget_options: Options,
    storage: StorageKind,
    storage_options: Options,
    applicators: BTreeMap<String, Applicator>,
    is_abstract: bool,
    replaces: bool,
}

impl std::fmt::Debug for FieldTypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldTypeSpec")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("editable_options", &self.editable_options)
            .field("widget", &self.widget)
            .field("storage", &self.storage)
            .field("applicators", &self.applicators.keys().collect::<Vec<_>>())
            .field("is_abstract", &self.is_abstract)
            .finish()
    }
}

impl FieldTypeSpec {
    /// A concrete spec with no default options.
    ///
    /// Every spec starts with the `hidden` applicator.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
        storage: StorageKind,
    ) -> Self {
        let mut applicators: BTreeMap<String, Applicator> = BTreeMap::new();
        applicators.insert("hidden".to_string(), Arc::new(apply_hidden));
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            editable_options: Options::new(),
            widget: None,
            widget_options: Options::new(),
            storage,
            storage_options: Options::new(),
            applicators,
            is_abstract: false,
            replaces: false,
        }
    }

    pub fn editable_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.editable_options.insert(key.into(), value);
        self
    }

    pub fn widget(mut self, widget: WidgetKind) -> Self {
        self.widget = Some(widget);
        self
    }

    pub fn widget_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.widget_options.insert(key.into(), value);
        self
    }

    pub fn storage_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.storage_options.insert(key.into(), value);
        self
    }

    /// Handle modifiers targeting `attribute` with `applicator`
    pub fn applicator<F>(mut self, attribute: impl Into<String>, applicator: F) -> Self
    where
        F: Fn(EditableField, &Value, &Values) -> Result<EditableField> + Send + Sync + 'static,
    {
        self.applicators.insert(attribute.into(), Arc::new(applicator));
        self
    }

    /// Mark this spec as a base for other specs; it is never registered.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Allow this spec to replace an existing registration of the same name
    pub fn force_replacement(mut self) -> Self {
        self.replaces = true;
        self
    }

    /// A concrete descendant inheriting kind, defaults and applicators.
    pub fn derive(&self, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            is_abstract: false,
            replaces: false,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn widget_kind(&self) -> WidgetKind {
        self.widget.unwrap_or_else(|| self.kind.default_widget())
    }

    pub fn editable_options(&self) -> &Options {
        &self.editable_options
    }

    pub fn widget_options(&self) -> &Options {
        &self.widget_options
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage
    }

    pub fn storage_options(&self) -> &Options {
        &self.storage_options
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn replaces(&self) -> bool {
        self.replaces
    }

    pub fn get_applicator(&self, attribute: &str) -> Option<&Applicator> {
        self.applicators.get(attribute)
    }

    /// Attributes with a custom applicator, sorted
    pub fn applicator_names(&self) -> Vec<&str> {
        self.applicators.keys().map(String::as_str).collect()
    }

    /// Coerce raw input with this type's coercion rule
    pub fn coerce(&self, raw: &Value) -> std::result::Result<Value, CoercionError> {
        self.kind.coerce(raw)
    }

    /// Build the editable field for `name`.
    ///
    /// Default options are merged under `base_options` (caller wins), a
    /// `widget_options` entry is split off into widget attributes, and the
    /// modifiers are resolved against `current`.
    pub fn build_editable_field(
        &self,
        name: &str,
        base_options: &Options,
        modifiers: &[FieldModifier],
        current: &Values,
        evaluator: &Evaluator,
    ) -> Result<EditableField> {
        let mut options = merge_options(&self.editable_options, base_options);
        let widget_overrides = match options.remove(WIDGET_OPTIONS_KEY) {
            Some(Value::Object(map)) => map,
            _ => Options::new(),
        };
        let widget = Widget::new(
            self.widget_kind(),
            merge_options(&self.widget_options, &widget_overrides),
        );

        let field = EditableField::from_options(name, &self.name, self.kind, widget, options);
        apply_modifiers(self, field, modifiers, current, evaluator)
    }

    /// Build the storage descriptor; default options merged under `options`.
    pub fn build_storage_field(&self, options: &Options) -> StorageField {
        StorageField {
            kind: self.storage,
            options: merge_options(&self.storage_options, options),
        }
    }
}

/// The `hidden` applicator every field type carries.
///
/// A hidden field is drawn with a hidden input and can never be required.
/// A falsy value shows the field again with the widget it had before.
pub fn apply_hidden(
    mut field: EditableField,
    value: &Value,
    _current: &Values,
) -> Result<EditableField> {
    field.hidden = truthy(value);
    if field.hidden {
        field.widget.hide();
        field.required = false;
    } else {
        field.widget.show(field.kind.default_widget());
    }
    Ok(field)
}
