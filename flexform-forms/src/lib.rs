//! Form materialization and record storage for Flexform
//!
//! Given a [`FormDefinition`](flexform_fields::FormDefinition) and the values
//! a user has entered, this crate produces the final, modifier-resolved set
//! of editable fields, validates submitted data against it and persists the
//! result as typed per-field attributes.
//!
//! # Architecture
//!
//! - **Two passes**: [`materialize`] coerces values once, then rebuilds every
//!   field with its modifiers resolved against those values
//! - **Explicit context**: [`FormsContext`] carries the registry and the
//!   evaluator; nothing is looked up globally
//! - **Layered record data**: a [`Record`]'s data is initial values,
//!   overridden by durable attributes, overridden by staged changes
//! - **Transactional saves**: staged changes reach a [`RecordStore`] through
//!   one [`Transaction`] per save
//!
//! # Example
//!
//! ```rust
//! use flexform_fields::{FieldDefinition, FormDefinition};
//! use flexform_forms::{FormInput, FormsContext};
//! use serde_json::json;
//!
//! let context = FormsContext::with_builtins().unwrap();
//! let form = FormDefinition::new("Pizza")
//!     .with_field(FieldDefinition::new("Toppings", "SingleLineTextField"))
//!     .unwrap()
//!     .with_field(
//!         FieldDefinition::new("Extra cheese", "CheckboxField")
//!             .modifier("hidden", "empty(toppings)"),
//!     )
//!     .unwrap();
//!
//! let set = context.materialize(&form, &FormInput::new()).unwrap();
//! assert!(set.field("extra_cheese").unwrap().hidden);
//!
//! let mut submitted = flexform_fields::Values::new();
//! submitted.insert("toppings".into(), json!("olives"));
//! let set = context
//!     .materialize(&form, &FormInput::new().submitted(submitted))
//!     .unwrap();
//! assert!(!set.field("extra_cheese").unwrap().hidden);
//! ```

pub mod clean;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod serialize;
pub mod store;

pub use clean::ValidationErrors;
pub use context::FormsContext;
pub use error::{FormsError, Result};
pub use pipeline::{materialize, EditableFieldSet, FormInput};
pub use record::Record;
pub use serialize::{field_to_json, to_json};
pub use store::{MemoryStore, RecordAttribute, RecordStore, StoreError, StoredValue, Transaction};
