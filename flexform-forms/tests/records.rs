//! Record data layering and transactional saves

use flexform_fields::{FieldDefinition, FieldTypeRegistry, FormDefinition, Values};
use flexform_forms::{
    FormInput, FormsContext, FormsError, MemoryStore, Record, RecordStore, StoreError,
};
use serde_json::json;
use std::sync::Arc;

fn pizza() -> Arc<FormDefinition> {
    Arc::new(
        FormDefinition::new("Pizza")
            .with_field(FieldDefinition::new("Crust", "SingleLineTextField").initial(json!("thin")))
            .unwrap()
            .with_field(FieldDefinition::new("Slices", "PositiveIntegerField").initial(json!(8)))
            .unwrap()
            .with_field(FieldDefinition::new("Delivery", "CheckboxField"))
            .unwrap(),
    )
}

fn registry() -> Arc<FieldTypeRegistry> {
    Arc::new(FieldTypeRegistry::with_builtins().unwrap())
}

#[test]
fn new_record_data_is_initial_values() {
    let store = MemoryStore::new();
    let mut record = Record::new(pizza(), registry());
    let data = record.data(&store).unwrap();

    assert_eq!(data.len(), 3);
    assert_eq!(data["crust"], json!("thin"));
    assert_eq!(data["slices"], json!(8));
    assert_eq!(data["delivery"], json!(null));
}

#[test]
fn staged_change_is_visible_and_saved_with_one_upsert() {
    let store = MemoryStore::new();
    let mut record = Record::new(pizza(), registry());

    record
        .set_attribute(&store, "crust", json!("deep"), false)
        .unwrap();
    assert_eq!(record.data(&store).unwrap()["crust"], json!("deep"));
    assert_eq!(store.upsert_count(), 0);

    assert_eq!(record.save(&store).unwrap(), 1);
    assert_eq!(store.upsert_count(), 1);
    assert!(record.staged().is_empty());

    let mut reopened = Record::with_id(record.id(), pizza(), registry());
    assert_eq!(reopened.data(&store).unwrap()["crust"], json!("deep"));
    assert_eq!(record.data(&store).unwrap()["crust"], json!("deep"));
}

#[test]
fn committed_write_replaces_staged_value() {
    let store = MemoryStore::new();
    let mut record = Record::new(pizza(), registry());

    record.set_attribute(&store, "slices", json!(6), false).unwrap();
    record.set_attribute(&store, "slices", json!(12), true).unwrap();

    assert!(record.staged().is_empty());
    assert_eq!(store.upsert_count(), 1);
    assert_eq!(record.data(&store).unwrap()["slices"], json!(12));
    assert_eq!(record.save(&store).unwrap(), 0);
}

#[test]
fn durable_values_are_memoized_until_invalidated() {
    let store = MemoryStore::new();
    let mut writer = Record::new(pizza(), registry());
    let mut reader = Record::with_id(writer.id(), pizza(), registry());

    assert_eq!(reader.data(&store).unwrap()["crust"], json!("thin"));
    writer.set_attribute(&store, "crust", json!("stuffed"), true).unwrap();
    assert_eq!(reader.data(&store).unwrap()["crust"], json!("thin"));

    reader.invalidate();
    assert_eq!(reader.data(&store).unwrap()["crust"], json!("stuffed"));
}

#[test]
fn failed_commit_keeps_every_staged_change() {
    let store = MemoryStore::new();
    let mut record = Record::new(pizza(), registry());
    record.set_attribute(&store, "crust", json!("deep"), false).unwrap();
    record.set_attribute(&store, "delivery", json!(true), false).unwrap();

    store.fail_commits(true);
    let error = record.save(&store).unwrap_err();
    assert!(matches!(error, FormsError::Store(StoreError::Backend { .. })));
    assert_eq!(record.staged().len(), 2);
    assert!(store.is_empty());

    store.fail_commits(false);
    assert_eq!(record.save(&store).unwrap(), 2);
    assert_eq!(store.load(&record.id()).unwrap().len(), 2);
}

#[test]
fn values_that_do_not_fit_their_slot_abort_the_save() {
    let store = MemoryStore::new();
    let mut record = Record::new(pizza(), registry());
    record.set_attribute(&store, "crust", json!("deep"), false).unwrap();
    record.set_attribute(&store, "slices", json!(-2), false).unwrap();

    let error = record.save(&store).unwrap_err();
    assert!(matches!(error, FormsError::Store(StoreError::TypeMismatch { .. })));
    assert!(store.is_empty());
    assert_eq!(record.staged().len(), 2);
}

#[test]
fn unknown_fields_are_rejected() {
    let store = MemoryStore::new();
    let mut record = Record::new(pizza(), registry());
    let error = record
        .set_attribute(&store, "anchovies", json!(true), false)
        .unwrap_err();
    assert!(matches!(error, FormsError::UnknownField { ref name, .. } if name == "anchovies"));
}

#[test]
fn removed_fields_drop_out_of_record_data() {
    let store = MemoryStore::new();
    let mut record = Record::new(pizza(), registry());
    record.set_attribute(&store, "delivery", json!(true), true).unwrap();

    let mut trimmed = (*pizza()).clone();
    trimmed.remove_field("delivery").unwrap();
    let mut reopened = Record::with_id(record.id(), Arc::new(trimmed), registry());
    let data = reopened.data(&store).unwrap();
    assert_eq!(data.len(), 2);
    assert!(!data.contains_key("delivery"));

    assert_eq!(store.delete_field("pizza", "delivery").unwrap(), 1);
}

#[test]
fn submit_cleans_then_persists() {
    let context = FormsContext::with_builtins().unwrap();
    let store = MemoryStore::new();
    let form = pizza();

    let mut submitted = Values::new();
    submitted.insert("crust".into(), json!("  deep  "));
    submitted.insert("slices".into(), json!("6"));
    submitted.insert("delivery".into(), json!("on"));

    let mut record = Record::new(form.clone(), context.registry().clone());
    let stored = record.data(&store).unwrap();
    let set = context
        .materialize(&form, &FormInput::new().stored(stored).submitted(submitted))
        .unwrap();
    let cleaned = set.clean().unwrap();

    assert_eq!(record.submit(&store, &cleaned).unwrap(), 3);
    let data = record.data(&store).unwrap();
    assert_eq!(data["crust"], json!("deep"));
    assert_eq!(data["slices"], json!(6));
    assert_eq!(data["delivery"], json!(true));

    assert_eq!(record.delete(&store).unwrap(), 3);
    assert!(store.is_empty());
}
