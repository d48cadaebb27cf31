//! Autocomplete field types

use crate::error::Result;
use crate::settings::AutocompleteSettings;
use crate::source::UrlSource;
use flexform_fields::{EditableField, FieldKind, FieldTypeRegistry, FieldTypeSpec, StorageKind};
use serde_json::json;

/// Abstract base every autocomplete type derives from
pub fn base_autocomplete_type() -> FieldTypeSpec {
    autocomplete_type(
        "BaseAutocompleteSelectField",
        "Autocomplete",
        FieldKind::Autocomplete,
    )
    .abstract_type()
}

fn autocomplete_type(name: &str, label: &str, kind: FieldKind) -> FieldTypeSpec {
    FieldTypeSpec::new(name, label, kind, StorageKind::Json)
        .editable_option("url", json!(""))
        .editable_option("mapping", json!({"root": "", "id": "id", "text": "text"}))
        .editable_option("search_fields", json!([]))
        .widget_option("allow_freetext", json!(false))
        .widget_option("placeholder", json!(""))
}

/// Register the URL-backed autocomplete types.
///
/// The abstract base is offered to the registry too, which skips it.
pub fn register_autocomplete_types(registry: &mut FieldTypeRegistry) -> flexform_fields::Result<()> {
    let base = base_autocomplete_type();
    registry.register(base.clone())?;
    registry.register(base.derive("URLAutocompleteSelectField", "URL Autocomplete"))?;
    registry.register(autocomplete_type(
        "URLAutocompleteSelectMultipleField",
        "URL Autocomplete (multiple)",
        FieldKind::AutocompleteMultiple,
    ))?;
    Ok(())
}

/// The search source configured on a materialized autocomplete field
pub fn source_for_field(field: &EditableField, settings: &AutocompleteSettings) -> Result<UrlSource> {
    UrlSource::from_options(&field.name, &field.options, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexform_expr::Evaluator;
    use flexform_fields::{Options, Values, WidgetKind};

    #[test]
    fn test_registers_concrete_types_only() {
        let mut registry = FieldTypeRegistry::new();
        register_autocomplete_types(&mut registry).unwrap();

        assert!(!registry.contains("BaseAutocompleteSelectField"));
        assert_eq!(
            registry.lookup("URLAutocompleteSelectField").unwrap().kind(),
            FieldKind::Autocomplete
        );
        assert_eq!(
            registry
                .lookup("URLAutocompleteSelectMultipleField")
                .unwrap()
                .widget_kind(),
            WidgetKind::AutocompleteSelectMultiple
        );
    }

    #[test]
    fn test_source_reads_field_options() {
        let mut registry = FieldTypeRegistry::new();
        register_autocomplete_types(&mut registry).unwrap();
        let spec = registry.lookup("URLAutocompleteSelectField").unwrap();

        let mut options = Options::new();
        options.insert("url".into(), json!("https://api.example.com/people?page={{page}}"));
        options.insert("mapping".into(), json!({"root": "data", "id": "_id", "text": "name"}));
        let field = spec
            .build_editable_field("person", &options, &[], &Values::new(), &Evaluator::new())
            .unwrap();

        let source = source_for_field(&field, &AutocompleteSettings::default()).unwrap();
        assert!(source.paginates_remotely());
        assert_eq!(
            source.url_template(),
            "https://api.example.com/people?page={{page}}"
        );
    }
}
