//! The field-type registry

use crate::builtin::builtin_types;
use crate::error::{FieldsError, Result};
use crate::spec::FieldTypeSpec;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registered field types, keyed by type name.
///
/// Built once during startup and shared read-only afterwards (usually behind
/// an `Arc`). Names are kept sorted so listings are stable across runs.
#[derive(Debug, Default, Clone)]
pub struct FieldTypeRegistry {
    types: BTreeMap<String, Arc<FieldTypeSpec>>,
}

impl FieldTypeRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in field type
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for spec in builtin_types() {
            registry.register(spec)?;
        }
        Ok(registry)
    }

    /// Register a field type.
    ///
    /// Abstract specs are accepted and ignored. A name that is already
    /// registered is a [`FieldsError::DuplicateFieldType`] unless the new
    /// spec was built with [`FieldTypeSpec::force_replacement`].
    pub fn register(&mut self, spec: FieldTypeSpec) -> Result<()> {
        if spec.is_abstract() {
            tracing::debug!(field_type = spec.name(), "skipping abstract field type");
            return Ok(());
        }
        if self.types.contains_key(spec.name()) && !spec.replaces() {
            return Err(FieldsError::DuplicateFieldType {
                name: spec.name().to_string(),
            });
        }
        tracing::debug!(
            field_type = spec.name(),
            kind = ?spec.kind(),
            storage = ?spec.storage_kind(),
            "registered field type"
        );
        self.types.insert(spec.name().to_string(), Arc::new(spec));
        Ok(())
    }

    /// Look up a field type, failing with [`FieldsError::UnknownFieldType`]
    pub fn lookup(&self, name: &str) -> Result<&Arc<FieldTypeSpec>> {
        self.types
            .get(name)
            .ok_or_else(|| FieldsError::UnknownFieldType {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<FieldTypeSpec>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// `(name, label)` for every registered type, sorted by name
    pub fn list_types(&self) -> Vec<(String, String)> {
        self.types
            .values()
            .map(|spec| (spec.name().to_string(), spec.label().to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{FieldKind, StorageKind};
    use serde_json::json;

    fn spec(name: &str) -> FieldTypeSpec {
        FieldTypeSpec::new(name, name, FieldKind::Char, StorageKind::Text)
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = FieldTypeRegistry::new();
        registry.register(spec("NoteField")).unwrap();
        let err = registry.register(spec("NoteField")).unwrap_err();
        assert!(matches!(err, FieldsError::DuplicateFieldType { name } if name == "NoteField"));
    }

    #[test]
    fn test_force_replacement_overrides() {
        let mut registry = FieldTypeRegistry::new();
        registry.register(spec("NoteField")).unwrap();
        registry
            .register(
                spec("NoteField")
                    .editable_option("max_length", json!(280))
                    .force_replacement(),
            )
            .unwrap();
        let found = registry.lookup("NoteField").unwrap();
        assert_eq!(found.editable_options()["max_length"], json!(280));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_abstract_never_registered() {
        let mut registry = FieldTypeRegistry::new();
        let base = spec("BaseNoteField").abstract_type();
        registry.register(base.clone()).unwrap();
        registry.register(base.derive("ShortNoteField", "Short note")).unwrap();
        assert!(!registry.contains("BaseNoteField"));
        assert!(registry.contains("ShortNoteField"));
    }

    #[test]
    fn test_unknown_lookup() {
        let registry = FieldTypeRegistry::new();
        assert!(matches!(
            registry.lookup("Nope"),
            Err(FieldsError::UnknownFieldType { .. })
        ));
    }

    #[test]
    fn test_list_types_sorted() {
        let mut registry = FieldTypeRegistry::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            registry.register(spec(name)).unwrap();
        }
        let names: Vec<String> = registry.list_types().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    }
}
