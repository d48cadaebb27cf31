//! Form, field, modifier and fieldset definitions.
//!
//! All types serialize to/from YAML via serde. A form definition is plain
//! data: an ordered list of fields, each naming a registered field type and
//! carrying its own options and modifiers.

use crate::error::{FieldsError, Result};
use crate::options::{merge_options, Options, Values};
use crate::registry::FieldTypeRegistry;
use crate::spec::{StorageField, WIDGET_OPTIONS_KEY};
use flexform_common::machine_name;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A dynamic override of one field attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldModifier {
    pub attribute: String,
    pub expression: String,
}

impl FieldModifier {
    pub fn new(attribute: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            expression: expression.into(),
        }
    }
}

/// A single field on a form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDefinition {
    /// Machine name; derived from the label when left empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help_text: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub initial: Value,
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub field_options: Options,
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub widget_options: Options,
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub storage_options: Options,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<FieldModifier>,
}

impl FieldDefinition {
    pub fn new(label: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            label: label.into(),
            label_suffix: None,
            help_text: String::new(),
            required: false,
            initial: Value::Null,
            field_type: field_type.into(),
            field_options: Options::new(),
            widget_options: Options::new(),
            storage_options: Options::new(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn initial(mut self, initial: Value) -> Self {
        self.initial = initial;
        self
    }

    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.field_options.insert(key.into(), value);
        self
    }

    pub fn modifier(mut self, attribute: impl Into<String>, expression: impl Into<String>) -> Self {
        self.modifiers.push(FieldModifier::new(attribute, expression));
        self
    }

    /// Derive the machine name from the label if none is set yet.
    ///
    /// An existing name is never recomputed, so later label edits do not
    /// rename stored data.
    pub fn ensure_name(&mut self) {
        if self.name.is_empty() {
            self.name = machine_name(&self.label);
        }
    }

    /// Options passed to the field type's editable-field constructor.
    ///
    /// Field-level options win over the named attributes, so a definition
    /// can still override e.g. `required` through `field_options`.
    pub fn base_options(&self) -> Options {
        let mut named = Options::new();
        named.insert("label".into(), json!(self.label));
        if let Some(suffix) = &self.label_suffix {
            named.insert("label_suffix".into(), json!(suffix));
        }
        named.insert("help_text".into(), json!(self.help_text));
        named.insert("required".into(), json!(self.required));
        named.insert("initial".into(), self.initial.clone());
        if !self.widget_options.is_empty() {
            named.insert(
                WIDGET_OPTIONS_KEY.into(),
                Value::Object(self.widget_options.clone()),
            );
        }
        merge_options(&named, &self.field_options)
    }

    /// Build the storage descriptor for this field.
    ///
    /// Optional fields are nullable and the initial value is the column
    /// default.
    pub fn build_storage_field(&self, registry: &FieldTypeRegistry) -> Result<StorageField> {
        let spec = registry.lookup(&self.field_type)?;
        let mut options = Options::new();
        options.insert("null".into(), json!(!self.required));
        options.insert("blank".into(), json!(!self.required));
        options.insert("default".into(), self.initial.clone());
        options.insert("help_text".into(), json!(self.help_text));
        Ok(spec.build_storage_field(&merge_options(&options, &self.storage_options)))
    }
}

/// One field placement inside a fieldset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldsetItem {
    pub field: String,
    #[serde(default)]
    pub vertical_order: i32,
    #[serde(default)]
    pub horizontal_order: i32,
}

/// A titled group of fields laid out in rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldsetDefinition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default)]
    pub items: Vec<FieldsetItem>,
}

/// A fieldset with its items arranged into rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldsetRow {
    pub name: String,
    pub description: String,
    pub classes: Vec<String>,
    /// Field names per row, top to bottom, left to right
    pub rows: Vec<Vec<String>>,
}

impl FieldsetDefinition {
    /// Arrange items into rows by vertical order, each row sorted by
    /// horizontal order.
    pub fn layout(&self) -> Result<FieldsetRow> {
        let invalid = |message: String| FieldsError::InvalidFieldset {
            fieldset: self.name.clone(),
            message,
        };

        let mut seen = BTreeSet::new();
        let mut rows: BTreeMap<i32, BTreeMap<i32, String>> = BTreeMap::new();
        for item in &self.items {
            if !seen.insert(item.field.as_str()) {
                return Err(invalid(format!("field '{}' appears more than once", item.field)));
            }
            let row = rows.entry(item.vertical_order).or_default();
            if row.insert(item.horizontal_order, item.field.clone()).is_some() {
                return Err(invalid(format!(
                    "two fields share row {} column {}",
                    item.vertical_order, item.horizontal_order
                )));
            }
        }

        Ok(FieldsetRow {
            name: self.name.clone(),
            description: self.description.clone(),
            classes: self.classes.clone(),
            rows: rows
                .into_values()
                .map(|row| row.into_values().collect())
                .collect(),
        })
    }
}

/// A named, ordered collection of fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FormDefinition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fieldsets: Vec<FieldsetDefinition>,
}

impl FormDefinition {
    pub fn new(label: impl Into<String>) -> Self {
        let mut form = Self {
            label: label.into(),
            ..Default::default()
        };
        form.name = machine_name(&form.label);
        form
    }

    /// Append a field, deriving its name if needed.
    ///
    /// Fails with [`FieldsError::DuplicateFieldName`] if the name is taken.
    pub fn add_field(&mut self, mut field: FieldDefinition) -> Result<()> {
        field.ensure_name();
        if self.field(&field.name).is_some() {
            return Err(FieldsError::DuplicateFieldName { name: field.name });
        }
        self.fields.push(field);
        Ok(())
    }

    /// Builder-style [`FormDefinition::add_field`]
    pub fn with_field(mut self, field: FieldDefinition) -> Result<Self> {
        self.add_field(field)?;
        Ok(self)
    }

    /// Remove a field together with its modifiers and fieldset placements.
    pub fn remove_field(&mut self, name: &str) -> Result<FieldDefinition> {
        let index = self
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| FieldsError::FieldNotFound {
                name: name.to_string(),
            })?;
        for fieldset in &mut self.fieldsets {
            fieldset.items.retain(|item| item.field != name);
        }
        Ok(self.fields.remove(index))
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Each field's initial value, keyed by name
    pub fn initial_values(&self) -> Values {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.initial.clone()))
            .collect()
    }

    /// Derive missing names and reject duplicates and unknown fieldset
    /// entries.
    pub fn normalize(&mut self) -> Result<()> {
        if self.name.is_empty() {
            self.name = machine_name(&self.label);
        }
        let mut seen = BTreeSet::new();
        for field in &mut self.fields {
            field.ensure_name();
            if !seen.insert(field.name.clone()) {
                return Err(FieldsError::DuplicateFieldName {
                    name: field.name.clone(),
                });
            }
        }
        for fieldset in &self.fieldsets {
            if let Some(item) = fieldset.items.iter().find(|i| !seen.contains(&i.field)) {
                return Err(FieldsError::InvalidFieldset {
                    fieldset: fieldset.name.clone(),
                    message: format!("unknown field '{}'", item.field),
                });
            }
        }
        Ok(())
    }

    /// Every fieldset laid out into rows
    pub fn layout(&self) -> Result<Vec<FieldsetRow>> {
        self.fieldsets.iter().map(FieldsetDefinition::layout).collect()
    }

    /// Parse and normalize a YAML form definition
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut form: FormDefinition = serde_yaml_ng::from_str(yaml)?;
        form.normalize()?;
        Ok(form)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FieldsError::DefinitionNotFound {
                path: path.to_path_buf(),
            });
        }
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_yaml()?)?;
        tracing::debug!(form = %self.name, path = %path.display(), "saved form definition");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza_form() -> FormDefinition {
        FormDefinition::new("Pizza Order")
            .with_field(FieldDefinition::new("Crust", "SingleChoiceSelectField"))
            .and_then(|f| {
                f.with_field(
                    FieldDefinition::new("Extra Toppings", "MultipleChoiceCheckboxField")
                        .modifier("hidden", "empty(crust)"),
                )
            })
            .unwrap()
    }

    #[test]
    fn names_derived_from_labels() {
        let form = pizza_form();
        assert_eq!(form.name, "pizza_order");
        assert_eq!(form.field_names(), vec!["crust", "extra_toppings"]);
    }

    #[test]
    fn derived_names_are_expression_identifiers() {
        let form = FormDefinition::new("Survey")
            .with_field(FieldDefinition::new("2nd choice", "SingleLineTextField"))
            .and_then(|f| f.with_field(FieldDefinition::new("In", "SingleLineTextField")))
            .unwrap();
        assert_eq!(form.field_names(), vec!["field_2nd_choice", "field_in"]);

        let names: Values = [
            ("field_2nd_choice".to_string(), serde_json::json!("olives")),
            ("field_in".to_string(), serde_json::json!("yes")),
        ]
        .into_iter()
        .collect();
        let value = flexform_expr::Evaluator::new()
            .evaluate("field_in == 'yes' && size(field_2nd_choice) > 0", &names)
            .unwrap();
        assert_eq!(value, serde_json::json!(true));
    }

    #[test]
    fn existing_name_survives_label_edit() {
        let mut field = FieldDefinition::new("Crust", "SingleLineTextField");
        field.ensure_name();
        field.label = "Crust style".into();
        field.ensure_name();
        assert_eq!(field.name, "crust");
    }

    #[test]
    fn duplicate_field_name_rejected() {
        let mut form = pizza_form();
        let err = form
            .add_field(FieldDefinition::new("crust", "SingleLineTextField"))
            .unwrap_err();
        assert!(matches!(err, FieldsError::DuplicateFieldName { name } if name == "crust"));
    }

    #[test]
    fn removing_field_drops_its_modifiers_and_placements() {
        let mut form = pizza_form();
        form.fieldsets.push(FieldsetDefinition {
            name: "Order".into(),
            description: String::new(),
            classes: vec![],
            items: vec![FieldsetItem {
                field: "extra_toppings".into(),
                vertical_order: 0,
                horizontal_order: 0,
            }],
        });
        let removed = form.remove_field("extra_toppings").unwrap();
        assert_eq!(removed.modifiers.len(), 1);
        assert!(form.field("extra_toppings").is_none());
        assert!(form.fieldsets[0].items.is_empty());
    }

    #[test]
    fn base_options_field_options_win() {
        let field = FieldDefinition::new("Slices", "IntegerField")
            .required(true)
            .option("required", json!(false))
            .option("max_value", json!(16));
        let options = field.base_options();
        assert_eq!(options["required"], json!(false));
        assert_eq!(options["label"], json!("Slices"));
        assert_eq!(options["max_value"], json!(16));
    }

    #[test]
    fn fieldset_rows_ordered() {
        let fieldset = FieldsetDefinition {
            name: "Contact".into(),
            description: String::new(),
            classes: vec!["wide".into()],
            items: vec![
                FieldsetItem { field: "email".into(), vertical_order: 1, horizontal_order: 0 },
                FieldsetItem { field: "last".into(), vertical_order: 0, horizontal_order: 2 },
                FieldsetItem { field: "first".into(), vertical_order: 0, horizontal_order: 1 },
            ],
        };
        let layout = fieldset.layout().unwrap();
        assert_eq!(
            layout.rows,
            vec![vec!["first".to_string(), "last".to_string()], vec!["email".to_string()]]
        );
    }

    #[test]
    fn fieldset_position_collision_rejected() {
        let fieldset = FieldsetDefinition {
            name: "Contact".into(),
            description: String::new(),
            classes: vec![],
            items: vec![
                FieldsetItem { field: "a".into(), vertical_order: 0, horizontal_order: 0 },
                FieldsetItem { field: "b".into(), vertical_order: 0, horizontal_order: 0 },
            ],
        };
        assert!(matches!(fieldset.layout(), Err(FieldsError::InvalidFieldset { .. })));
    }

    #[test]
    fn form_yaml_round_trip() {
        let form = pizza_form();
        let yaml = form.to_yaml().unwrap();
        let parsed = FormDefinition::from_yaml(&yaml).unwrap();
        assert_eq!(form, parsed);
    }

    #[test]
    fn yaml_without_names_is_normalized() {
        let yaml = r#"
label: Quiz
fields:
  - label: Your Name
    field_type: SingleLineTextField
    required: true
  - label: Your Name
    name: your_name_again
    field_type: SingleLineTextField
"#;
        let form = FormDefinition::from_yaml(yaml).unwrap();
        assert_eq!(form.name, "quiz");
        assert_eq!(form.field_names(), vec!["your_name", "your_name_again"]);
        assert!(form.fields[0].required);
    }
}
