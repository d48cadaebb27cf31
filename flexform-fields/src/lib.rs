//! Field types, modifiers and form definitions
//!
//! `flexform-fields` owns the schema side of Flexform: what kinds of fields
//! exist, how a field type turns options into an editable field and a
//! storage column, and how modifier expressions rewrite a field's attributes
//! from the values entered so far.
//!
//! # Architecture
//!
//! - **Explicit registry**: a [`FieldTypeRegistry`] is built once at startup
//!   and passed to whoever needs it; there is no global lookup table
//! - **Data, not types**: an [`EditableField`] is a value describing a field
//!   to a renderer; forms are never compiled into Rust types
//! - **Modifiers**: `(attribute, expression)` pairs applied in declaration
//!   order by [`apply_modifiers`]; custom applicators on a
//!   [`FieldTypeSpec`] take over specific attributes
//! - **YAML definitions**: [`FormDefinition`] loads from and saves to YAML

pub mod builtin;
pub mod editable;
pub mod error;
pub mod kinds;
pub mod modifiers;
pub mod options;
pub mod registry;
pub mod spec;
pub mod types;
pub mod validation;

pub use builtin::builtin_types;
pub use editable::{EditableField, Widget};
pub use error::{CoercionError, FieldsError, Result};
pub use kinds::{FieldKind, StorageKind, WidgetKind};
pub use modifiers::apply_modifiers;
pub use options::{merge_options, truthy, Options, Values};
pub use registry::FieldTypeRegistry;
pub use spec::{Applicator, FieldTypeSpec, StorageField};
pub use types::{
    FieldDefinition, FieldModifier, FieldsetDefinition, FieldsetItem, FieldsetRow,
    FormDefinition,
};
pub use validation::{form_errors, validate_form, validate_modifier};
