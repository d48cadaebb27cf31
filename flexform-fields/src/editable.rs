//! The editable representation of a field handed to renderers

use crate::kinds::{FieldKind, WidgetKind};
use crate::options::{truthy, Options};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attributes lifted out of the option map into named properties
const NAMED_ATTRIBUTES: &[&str] = &[
    "label",
    "label_suffix",
    "help_text",
    "required",
    "hidden",
    "disabled",
    "initial",
];

/// The input control for a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub kind: WidgetKind,
    #[serde(default)]
    pub attrs: Options,
    /// Kind to restore when a hidden widget is shown again
    #[serde(skip)]
    shown_as: Option<WidgetKind>,
}

impl Widget {
    pub fn new(kind: WidgetKind, attrs: Options) -> Self {
        Self {
            kind,
            attrs,
            shown_as: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.kind.is_hidden()
    }

    /// Swap to a hidden input, remembering the visible kind
    pub fn hide(&mut self) {
        if !self.kind.is_hidden() {
            self.shown_as = Some(self.kind);
        }
        self.kind = WidgetKind::HiddenInput;
    }

    /// Undo [`Widget::hide`]; falls back to `default` when the widget was
    /// never visible.
    pub fn show(&mut self, default: WidgetKind) {
        if self.kind.is_hidden() {
            self.kind = self.shown_as.take().unwrap_or(default);
        }
    }
}

/// A fully built field, ready for a renderer.
///
/// `modifiers` records every modifier value applied to the field, keyed by
/// attribute, whether or not the attribute changed anything. It serializes
/// as `_modifiers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditableField {
    pub name: String,
    pub field_type: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_suffix: Option<String>,
    #[serde(default)]
    pub help_text: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub initial: Value,
    pub widget: Widget,
    /// Constructor options without a named property (`choices`,
    /// `min_value`, `max_digits`, ...)
    #[serde(default)]
    pub options: Options,
    #[serde(rename = "_modifiers", default)]
    pub modifiers: Options,
}

impl EditableField {
    /// Build a field from merged constructor options.
    ///
    /// Named attributes are taken out of `options`; whatever remains is kept
    /// as type-specific options.
    pub fn from_options(
        name: impl Into<String>,
        field_type: impl Into<String>,
        kind: FieldKind,
        widget: Widget,
        options: Options,
    ) -> Self {
        let mut field = Self {
            name: name.into(),
            field_type: field_type.into(),
            kind,
            label: None,
            label_suffix: None,
            help_text: String::new(),
            required: false,
            hidden: false,
            disabled: false,
            initial: Value::Null,
            widget,
            options: Options::new(),
            modifiers: Options::new(),
        };
        for (key, value) in options {
            if NAMED_ATTRIBUTES.contains(&key.as_str()) {
                field.set_attribute(&key, &value);
            } else {
                field.options.insert(key, value);
            }
        }
        field
    }

    /// Set `attribute` directly from a modifier value.
    ///
    /// Returns false when the field has no attribute by that name, in which
    /// case nothing changes. Type-specific options count as attributes once
    /// the field type has declared them.
    pub fn set_attribute(&mut self, attribute: &str, value: &Value) -> bool {
        match attribute {
            "label" => self.label = optional_text(value),
            "label_suffix" => self.label_suffix = optional_text(value),
            "help_text" => self.help_text = optional_text(value).unwrap_or_default(),
            "required" => self.required = truthy(value),
            "hidden" => self.hidden = truthy(value),
            "disabled" => self.disabled = truthy(value),
            "initial" => self.initial = value.clone(),
            "widget" => match value.as_str().and_then(WidgetKind::parse) {
                Some(kind) => self.widget.kind = kind,
                None => return false,
            },
            other if self.options.contains_key(other) => {
                self.options.insert(other.to_string(), value.clone());
            }
            _ => return false,
        }
        true
    }

    /// The choices declared for this field, as `(value, label)` pairs.
    ///
    /// Choices may be written as `[value, label]` pairs, `{value, label}`
    /// objects or bare values.
    pub fn choices(&self) -> Vec<(Value, String)> {
        let Some(Value::Array(choices)) = self.options.get("choices") else {
            return Vec::new();
        };
        choices
            .iter()
            .map(|choice| match choice {
                Value::Array(pair) if pair.len() == 2 => {
                    (pair[0].clone(), display_text(&pair[1]))
                }
                Value::Object(map) => {
                    let value = map.get("value").cloned().unwrap_or(Value::Null);
                    let label = map
                        .get("label")
                        .map(display_text)
                        .unwrap_or_else(|| display_text(&value));
                    (value, label)
                }
                other => (other.clone(), display_text(other)),
            })
            .collect()
    }
}

fn optional_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(display_text(other)),
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
