//! JSON export of materialized forms for renderers

use crate::pipeline::EditableFieldSet;
use flexform_fields::EditableField;
use serde_json::{json, Map, Value};

/// Export a whole field set.
///
/// `fields` is an object keyed by name; `order` keeps declaration order
/// since JSON objects do not.
pub fn to_json(set: &EditableFieldSet) -> Value {
    let fields: Map<String, Value> = set
        .fields
        .iter()
        .map(|(name, field)| (name.clone(), field_to_json(field)))
        .collect();
    json!({
        "form": set.form,
        "label": set.label,
        "is_bound": set.is_bound,
        "order": set.fields.keys().collect::<Vec<_>>(),
        "fields": fields,
        "fieldsets": set.fieldsets,
        "data": set.values,
    })
}

/// Export one field, including the modifier values applied to it
pub fn field_to_json(field: &EditableField) -> Value {
    let choices: Vec<Value> = field
        .choices()
        .into_iter()
        .map(|(value, text)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            json!({"value": value, "text": text})
        })
        .collect();

    json!({
        "field_type": field.field_type,
        "kind": field.kind,
        "required": field.required,
        "hidden": field.hidden,
        "disabled": field.disabled,
        "label": field.label,
        "label_suffix": field.label_suffix,
        "help_text": field.help_text,
        "initial": field.initial,
        "widget": {
            "kind": field.widget.kind,
            "is_hidden": field.widget.is_hidden(),
            "needs_multipart_form": field.kind.is_file(),
            "is_required": field.required,
            "attrs": field.widget.attrs,
        },
        "options": field.options,
        "choices": choices,
        "_modifiers": field.modifiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{materialize, FormInput};
    use flexform_expr::Evaluator;
    use flexform_fields::{FieldDefinition, FieldTypeRegistry, FormDefinition};

    #[test]
    fn test_export_shape() {
        let form = FormDefinition::new("Lunch")
            .with_field(FieldDefinition::new("Hungry", "YesNoRadioField"))
            .unwrap()
            .with_field(
                FieldDefinition::new("Dish", "SingleLineTextField")
                    .modifier("hidden", "hungry != true")
                    .modifier("shout", "'dish'"),
            )
            .unwrap();
        let registry = FieldTypeRegistry::with_builtins().unwrap();
        let set = materialize(&form, &FormInput::new(), &registry, &Evaluator::new()).unwrap();
        let exported = to_json(&set);

        assert_eq!(exported["order"], json!(["hungry", "dish"]));
        assert_eq!(exported["is_bound"], json!(false));

        let hungry = &exported["fields"]["hungry"];
        assert_eq!(hungry["widget"]["kind"], json!("radio-select"));
        assert_eq!(
            hungry["choices"],
            json!([{"value": "true", "text": "Yes"}, {"value": "false", "text": "No"}])
        );

        let dish = &exported["fields"]["dish"];
        assert_eq!(dish["hidden"], json!(true));
        assert_eq!(dish["widget"]["is_hidden"], json!(true));
        assert_eq!(dish["_modifiers"], json!({"hidden": true, "shout": "dish"}));
    }
}
