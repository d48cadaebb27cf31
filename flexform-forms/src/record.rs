//! Records: one set of values for one form.
//!
//! A record's data is never stored as a whole. It is computed by layering
//! each field's initial value, the durable attribute rows and any staged
//! changes that have not been saved yet.

use crate::error::{FormsError, Result};
use crate::store::{RecordAttribute, RecordStore, StoredValue};
use flexform_fields::{FieldDefinition, FieldTypeRegistry, FormDefinition, Values};
use serde_json::Value;
use std::sync::Arc;
use ulid::Ulid;

/// One submission of a form
#[derive(Debug, Clone)]
pub struct Record {
    id: Ulid,
    form: Arc<FormDefinition>,
    registry: Arc<FieldTypeRegistry>,
    staged: Values,
    durable: Option<Values>,
}

impl Record {
    /// A new record with a fresh id
    pub fn new(form: Arc<FormDefinition>, registry: Arc<FieldTypeRegistry>) -> Self {
        Self::with_id(Ulid::new(), form, registry)
    }

    /// Open an existing record
    pub fn with_id(id: Ulid, form: Arc<FormDefinition>, registry: Arc<FieldTypeRegistry>) -> Self {
        Self {
            id,
            form,
            registry,
            staged: Values::new(),
            durable: None,
        }
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    /// Changes not yet written to the store
    pub fn staged(&self) -> &Values {
        &self.staged
    }

    /// Forget the memoized durable values
    pub fn invalidate(&mut self) {
        self.durable = None;
    }

    /// The record's values: one entry per field of its form.
    pub fn data(&mut self, store: &dyn RecordStore) -> Result<Values> {
        let mut data = self.form.initial_values();
        data.extend(self.durable_values(store)?);
        data.extend(self.staged.clone());
        Ok(data)
    }

    /// Set one field's value.
    ///
    /// Without `commit` the value is only staged. With `commit` it is
    /// written in its own transaction and replaces any staged value.
    pub fn set_attribute(
        &mut self,
        store: &dyn RecordStore,
        field: &str,
        value: Value,
        commit: bool,
    ) -> Result<()> {
        let definition = self.definition(field)?;
        if !commit {
            let name = definition.name.clone();
            self.staged.insert(name, value);
            return Ok(());
        }

        let attribute = self.attribute(definition, &value)?;
        let mut tx = store.begin()?;
        tx.upsert(attribute)?;
        tx.commit()?;
        self.staged.remove(field);
        self.invalidate();
        Ok(())
    }

    /// Flush every staged change inside one transaction.
    ///
    /// The stage is cleared only once the commit succeeded; a failed save
    /// leaves every staged change in place. Returns the number of
    /// attributes written.
    pub fn save(&mut self, store: &dyn RecordStore) -> Result<usize> {
        if self.staged.is_empty() {
            return Ok(0);
        }

        let attributes = self
            .staged
            .iter()
            .map(|(name, value)| {
                let definition = self.definition(name)?;
                self.attribute(definition, value)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut tx = store.begin()?;
        for attribute in attributes {
            tx.upsert(attribute)?;
        }
        let written = tx.commit()?;

        self.staged.clear();
        self.invalidate();
        tracing::debug!(record = %self.id, form = %self.form.name, written, "saved record");
        Ok(written)
    }

    /// Stage every cleaned value and save
    pub fn submit(&mut self, store: &dyn RecordStore, cleaned: &Values) -> Result<usize> {
        for (name, value) in cleaned {
            self.set_attribute(store, name, value.clone(), false)?;
        }
        self.save(store)
    }

    /// Remove the record's attributes from the store
    pub fn delete(self, store: &dyn RecordStore) -> Result<usize> {
        Ok(store.delete_record(&self.id)?)
    }

    fn durable_values(&mut self, store: &dyn RecordStore) -> Result<Values> {
        if let Some(values) = &self.durable {
            return Ok(values.clone());
        }
        let form = &self.form;
        let values: Values = store
            .load(&self.id)?
            .into_iter()
            .filter(|row| row.form == form.name && form.field(&row.field).is_some())
            .map(|row| (row.field, row.value.to_json()))
            .collect();
        tracing::trace!(record = %self.id, loaded = values.len(), "loaded durable values");
        self.durable = Some(values.clone());
        Ok(values)
    }

    fn definition(&self, field: &str) -> Result<&FieldDefinition> {
        self.form.field(field).ok_or_else(|| FormsError::UnknownField {
            form: self.form.name.clone(),
            name: field.to_string(),
        })
    }

    fn attribute(&self, definition: &FieldDefinition, value: &Value) -> Result<RecordAttribute> {
        let slot = self.registry.lookup(&definition.field_type)?.storage_kind();
        Ok(RecordAttribute {
            record: self.id,
            form: self.form.name.clone(),
            field: definition.name.clone(),
            slot,
            value: StoredValue::from_json(&definition.name, slot, value)?,
        })
    }
}
