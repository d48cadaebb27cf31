//! Registry behaviour across every built-in field type

use flexform_expr::Evaluator;
use flexform_fields::{
    FieldDefinition, FieldKind, FieldTypeRegistry, FieldTypeSpec, FieldsError, FormDefinition,
    Options, StorageKind, Values, WidgetKind,
};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn caller_options_win_for_every_registered_type() {
    let registry = FieldTypeRegistry::with_builtins().unwrap();
    let evaluator = Evaluator::new();

    for (name, _label) in registry.list_types() {
        let spec = registry.lookup(&name).unwrap();
        let mut overrides = Options::new();
        overrides.insert("help_text".into(), json!("from caller"));
        for key in spec.editable_options().keys() {
            overrides.insert(key.clone(), json!("caller value"));
        }

        let field = spec
            .build_editable_field("probe", &overrides, &[], &Values::new(), &evaluator)
            .unwrap();

        assert_eq!(field.help_text, "from caller", "{name}");
        for key in spec.editable_options().keys() {
            assert_eq!(field.options[key], json!("caller value"), "{name}: {key}");
        }
    }
}

#[test]
fn replacement_requires_explicit_flag() {
    let mut registry = FieldTypeRegistry::with_builtins().unwrap();
    let custom = FieldTypeSpec::new("EmailField", "Work email", FieldKind::Email, StorageKind::Email)
        .editable_option("domain", json!("example.com"));

    let err = registry.register(custom.clone()).unwrap_err();
    assert!(matches!(err, FieldsError::DuplicateFieldType { .. }));
    assert_eq!(registry.lookup("EmailField").unwrap().label(), "Email Address");

    registry.register(custom.force_replacement()).unwrap();
    let replaced = registry.lookup("EmailField").unwrap();
    assert_eq!(replaced.label(), "Work email");
    assert_eq!(replaced.editable_options()["domain"], json!("example.com"));
}

#[test]
fn listing_is_sorted_and_stable() {
    let first = FieldTypeRegistry::with_builtins().unwrap().list_types();
    let second = FieldTypeRegistry::with_builtins().unwrap().list_types();
    assert_eq!(first, second);

    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(first, sorted);
    assert!(first.contains(&("URLField".to_string(), "URL".to_string())));
}

#[test]
fn custom_applicator_registered_with_type() {
    let mut registry = FieldTypeRegistry::new();
    registry
        .register(
            FieldTypeSpec::new("RatingField", "Rating", FieldKind::Integer, StorageKind::Integer)
                .editable_option("max_value", json!(5))
                .applicator("stars", |mut field, value, _current| {
                    field.options.insert("max_value".into(), value.clone());
                    field.widget.kind = WidgetKind::RadioSelect;
                    Ok(field)
                }),
        )
        .unwrap();

    let form = FormDefinition::new("Review")
        .with_field(FieldDefinition::new("Score", "RatingField").modifier("stars", "10"))
        .unwrap();
    let definition = &form.fields[0];
    let spec = registry.lookup(&definition.field_type).unwrap();
    let field = spec
        .build_editable_field(
            &definition.name,
            &definition.base_options(),
            &definition.modifiers,
            &Values::new(),
            &Evaluator::new(),
        )
        .unwrap();

    assert_eq!(field.options["max_value"], json!(10));
    assert_eq!(field.widget.kind, WidgetKind::RadioSelect);
    assert_eq!(field.modifiers["stars"], json!(10));
}

#[test]
fn storage_field_follows_required_and_initial() {
    let registry = FieldTypeRegistry::with_builtins().unwrap();
    let field = FieldDefinition::new("Website", "URLField")
        .initial(json!("https://example.com"))
        .with_name("website");
    let storage = field.build_storage_field(&registry).unwrap();
    assert_eq!(storage.kind, StorageKind::Url);
    assert_eq!(storage.options["null"], json!(true));
    assert_eq!(storage.options["default"], json!("https://example.com"));
    assert_eq!(storage.options["max_length"], json!(2083));
}

#[test]
fn form_definitions_save_and_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("forms").join("pizza.yaml");

    let form = FormDefinition::new("Pizza Order")
        .with_field(
            FieldDefinition::new("Crust", "SingleChoiceSelectField")
                .option("choices", json!([["thin", "Thin"], ["deep", "Deep dish"]]))
                .required(true),
        )
        .and_then(|f| {
            f.with_field(
                FieldDefinition::new("Toppings", "MultipleChoiceCheckboxField")
                    .modifier("hidden", "empty(crust)")
                    .modifier("required", "!empty(crust)"),
            )
        })
        .unwrap();
    form.save(&path).unwrap();

    let loaded = FormDefinition::load(&path).unwrap();
    assert_eq!(loaded, form);

    let missing = FormDefinition::load(&temp.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(missing, FieldsError::DefinitionNotFound { .. }));
}
