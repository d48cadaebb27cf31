//! Durable per-field attribute storage.
//!
//! A record's values are persisted one row per (record, field). Each row
//! carries its value in the typed slot chosen by the field's storage kind,
//! so stored values keep their type instead of collapsing into one text
//! column.
//!
//! The storage collaborator is abstracted behind [`RecordStore`]; writes
//! happen inside a [`Transaction`] so a record save lands all of its
//! attributes or none of them.

mod memory;
mod value;

pub use memory::MemoryStore;
pub use value::StoredValue;

use flexform_common::{ErrorSeverity, Severity};
use flexform_fields::StorageKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

/// Errors raised by storage backends
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A value does not fit the slot its field type writes to
    #[error("value for '{field}' does not fit {slot}: {message}")]
    TypeMismatch {
        field: String,
        slot: String,
        message: String,
    },

    /// The backend rejected an operation
    #[error("storage backend failed: {message}")]
    Backend { message: String },

    /// A lock protecting the store was poisoned by a panicking writer
    #[error("storage lock poisoned")]
    Poisoned,
}

impl Severity for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StoreError::TypeMismatch { .. } => ErrorSeverity::Error,
            StoreError::Backend { .. } | StoreError::Poisoned => ErrorSeverity::Critical,
        }
    }
}

/// One durable (record, field) value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordAttribute {
    pub record: Ulid,
    pub form: String,
    pub field: String,
    pub slot: StorageKind,
    pub value: StoredValue,
}

/// Storage collaborator for record attributes.
///
/// Implementations must upsert by (record, field) and must discard the
/// writes of a transaction that is dropped without being committed.
pub trait RecordStore: Send + Sync {
    /// Every durable attribute of `record`
    fn load(&self, record: &Ulid) -> Result<Vec<RecordAttribute>, StoreError>;

    /// Open a write transaction
    fn begin(&self) -> Result<Box<dyn Transaction + '_>, StoreError>;

    /// Remove every attribute of `record`, returning how many were removed
    fn delete_record(&self, record: &Ulid) -> Result<usize, StoreError>;

    /// Remove one field's attributes across every record of `form`
    fn delete_field(&self, form: &str, field: &str) -> Result<usize, StoreError>;

    /// Remove every attribute written for `form`
    fn delete_form(&self, form: &str) -> Result<usize, StoreError>;
}

/// A unit of writes against a [`RecordStore`]
pub trait Transaction {
    /// Stage an upsert of one attribute row
    fn upsert(&mut self, attribute: RecordAttribute) -> Result<(), StoreError>;

    /// Apply every staged upsert, returning how many rows were written
    fn commit(self: Box<Self>) -> Result<usize, StoreError>;
}
