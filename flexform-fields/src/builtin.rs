//! Built-in field types

use crate::kinds::{FieldKind, StorageKind, WidgetKind};
use crate::spec::FieldTypeSpec;
use serde_json::{json, Value};

const INT_MIN: i64 = -2_147_483_648;
const INT_MAX: i64 = 2_147_483_647;

fn empty_choices() -> Value {
    json!([["EMPTY", "Select a value."]])
}

fn yes_no_choices() -> Value {
    json!([[true, "Yes"], [false, "No"]])
}

/// Every field type Flexform ships with
pub fn builtin_types() -> Vec<FieldTypeSpec> {
    vec![
        FieldTypeSpec::new(
            "SingleLineTextField",
            "Single-line Text",
            FieldKind::Char,
            StorageKind::Text,
        ),
        FieldTypeSpec::new(
            "MultiLineTextField",
            "Multi-line Text",
            FieldKind::Char,
            StorageKind::Text,
        )
        .widget(WidgetKind::Textarea),
        FieldTypeSpec::new("EmailField", "Email Address", FieldKind::Email, StorageKind::Email),
        FieldTypeSpec::new("URLField", "URL", FieldKind::Url, StorageKind::Url)
            .storage_option("max_length", json!(2083)),
        FieldTypeSpec::new(
            "SensitiveTextField",
            "Sensitive text",
            FieldKind::Char,
            StorageKind::Text,
        )
        .widget(WidgetKind::PasswordInput),
        FieldTypeSpec::new("IntegerField", "Integer", FieldKind::Integer, StorageKind::Integer)
            .editable_option("min_value", json!(INT_MIN))
            .editable_option("max_value", json!(INT_MAX)),
        FieldTypeSpec::new(
            "PositiveIntegerField",
            "Positive Integer",
            FieldKind::Integer,
            StorageKind::PositiveInteger,
        )
        .editable_option("min_value", json!(0))
        .editable_option("max_value", json!(INT_MAX)),
        FieldTypeSpec::new(
            "DecimalField",
            "Decimal Number",
            FieldKind::Decimal,
            StorageKind::Decimal,
        )
        .editable_option("max_digits", json!(15))
        .editable_option("decimal_places", json!(6))
        .storage_option("max_digits", json!(15))
        .storage_option("decimal_places", json!(6)),
        FieldTypeSpec::new("DateField", "Date", FieldKind::Date, StorageKind::Date),
        FieldTypeSpec::new("TimeField", "Time", FieldKind::Time, StorageKind::Time),
        FieldTypeSpec::new(
            "DateTimeField",
            "Date & Time",
            FieldKind::DateTime,
            StorageKind::DateTime,
        ),
        FieldTypeSpec::new(
            "DurationField",
            "Duration",
            FieldKind::Duration,
            StorageKind::Duration,
        ),
        FieldTypeSpec::new("CheckboxField", "Checkbox", FieldKind::Boolean, StorageKind::Boolean),
        FieldTypeSpec::new(
            "YesNoRadioField",
            "Yes/No Radio Buttons",
            FieldKind::TypedChoice,
            StorageKind::Boolean,
        )
        .editable_option("choices", yes_no_choices())
        .widget(WidgetKind::RadioSelect),
        FieldTypeSpec::new(
            "YesNoSelectField",
            "Yes/No Dropdown",
            FieldKind::TypedChoice,
            StorageKind::Boolean,
        )
        .editable_option("choices", yes_no_choices()),
        FieldTypeSpec::new(
            "YesNoUnknownRadioField",
            "Yes/No/Unknown Radio Buttons",
            FieldKind::NullBoolean,
            StorageKind::Boolean,
        )
        .widget(WidgetKind::RadioSelect)
        .storage_option("null", json!(true)),
        FieldTypeSpec::new(
            "YesNoUnknownSelectField",
            "Yes/No/Unknown Dropdown",
            FieldKind::NullBoolean,
            StorageKind::Boolean,
        )
        .storage_option("null", json!(true)),
        FieldTypeSpec::new(
            "SingleChoiceSelectField",
            "Single-choice Dropdown",
            FieldKind::Choice,
            StorageKind::Text,
        )
        .editable_option("choices", empty_choices()),
        FieldTypeSpec::new(
            "SingleChoiceRadioSelectField",
            "Radio Buttons",
            FieldKind::Choice,
            StorageKind::Text,
        )
        .editable_option("choices", empty_choices())
        .widget(WidgetKind::RadioSelect),
        FieldTypeSpec::new(
            "MultipleChoiceSelectField",
            "Multiple-choice Dropdown",
            FieldKind::MultipleChoice,
            StorageKind::Json,
        )
        .editable_option("choices", empty_choices()),
        FieldTypeSpec::new(
            "MultipleChoiceCheckboxField",
            "Multiple-choice Checkboxes",
            FieldKind::MultipleChoice,
            StorageKind::Json,
        )
        .editable_option("choices", empty_choices())
        .widget(WidgetKind::CheckboxSelectMultiple),
        FieldTypeSpec::new("FileUploadField", "File Upload", FieldKind::File, StorageKind::File),
        FieldTypeSpec::new(
            "ImageUploadField",
            "Image Upload",
            FieldKind::Image,
            StorageKind::Image,
        ),
    ]
}
