//! In-process attribute store

use super::{RecordAttribute, RecordStore, StoreError, Transaction};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use ulid::Ulid;

type Rows = BTreeMap<(Ulid, String), RecordAttribute>;

/// A [`RecordStore`] kept in memory.
///
/// Counts every committed upsert so callers can check how many durable
/// writes an operation performed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Rows>,
    upserts: AtomicUsize,
    fail_commits: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attribute rows written by committed transactions
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Make every following commit fail with a backend error
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Total attribute rows held
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove_where<F>(&self, keep: F) -> Result<usize, StoreError>
    where
        F: Fn(&RecordAttribute) -> bool,
    {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let before = rows.len();
        rows.retain(|_, attribute| keep(attribute));
        Ok(before - rows.len())
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, record: &Ulid) -> Result<Vec<RecordAttribute>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows
            .values()
            .filter(|attribute| attribute.record == *record)
            .cloned()
            .collect())
    }

    fn begin(&self) -> Result<Box<dyn Transaction + '_>, StoreError> {
        Ok(Box::new(MemoryTransaction {
            store: self,
            pending: Vec::new(),
        }))
    }

    fn delete_record(&self, record: &Ulid) -> Result<usize, StoreError> {
        let removed = self.remove_where(|attribute| attribute.record != *record)?;
        tracing::debug!(record = %record, removed, "deleted record attributes");
        Ok(removed)
    }

    fn delete_field(&self, form: &str, field: &str) -> Result<usize, StoreError> {
        self.remove_where(|attribute| !(attribute.form == form && attribute.field == field))
    }

    fn delete_form(&self, form: &str) -> Result<usize, StoreError> {
        self.remove_where(|attribute| attribute.form != form)
    }
}

struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    pending: Vec<RecordAttribute>,
}

impl Transaction for MemoryTransaction<'_> {
    fn upsert(&mut self, attribute: RecordAttribute) -> Result<(), StoreError> {
        self.pending.push(attribute);
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> Result<usize, StoreError> {
        let pending = std::mem::take(&mut self.pending);
        if self.store.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Backend {
                message: format!("commit of {} attribute(s) rejected", pending.len()),
            });
        }

        let mut rows = self.store.rows.write().map_err(|_| StoreError::Poisoned)?;
        let written = pending.len();
        for attribute in pending {
            rows.insert((attribute.record, attribute.field.clone()), attribute);
        }
        self.store.upserts.fetch_add(written, Ordering::SeqCst);
        tracing::debug!(written, "committed attribute transaction");
        Ok(written)
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(
                discarded = self.pending.len(),
                "transaction dropped without commit"
            );
        }
    }
}
