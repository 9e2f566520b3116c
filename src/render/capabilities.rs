//! Leaf capabilities for the input kinds the builtin catalog uses.

use serde_json::{Number, Value};

use crate::schema::{Metadata, value_to_string};

use super::registry::{Capability, EditorView, LeafProps};

/// Single-line (or multi-line, for `textarea`) free text. Also the fallback
/// for unmapped input kinds.
#[derive(Debug, Clone)]
pub struct TextCapability {
    widget: String,
}

impl TextCapability {
    pub fn new(widget: impl Into<String>) -> Self {
        Self {
            widget: widget.into(),
        }
    }
}

impl Default for TextCapability {
    fn default() -> Self {
        Self::new("text")
    }
}

impl Capability for TextCapability {
    fn name(&self) -> &str {
        &self.widget
    }

    fn render(&self, props: LeafProps<'_>) -> EditorView {
        let text = value_to_string(props.value);
        let max_length = props.input_config.get("maxLength").and_then(Value::as_u64);
        let view = EditorView::new(self.widget.clone(), props, text);
        match max_length {
            Some(max) => view.with_hint(format!("max {max} characters")),
            None => view,
        }
    }
}

/// Numeric entry. The currency variant prefixes read-mode values with the
/// `inputConfig.currency` code.
#[derive(Debug, Clone)]
pub struct NumberCapability {
    currency: bool,
}

impl NumberCapability {
    pub fn plain() -> Self {
        Self { currency: false }
    }

    pub fn currency() -> Self {
        Self { currency: true }
    }
}

impl Capability for NumberCapability {
    fn name(&self) -> &str {
        if self.currency { "currency" } else { "number" }
    }

    fn render(&self, props: LeafProps<'_>) -> EditorView {
        let text = value_to_string(props.value);
        let code = currency_code(props.input_config).map(str::to_string);
        let view = EditorView::new(self.name(), props, text);
        match code {
            Some(code) if self.currency => view.with_hint(code),
            _ => view,
        }
    }

    fn display(&self, value: &Value, input_config: &Metadata) -> String {
        let text = value_to_string(value);
        match currency_code(input_config) {
            Some(code) if self.currency && !text.is_empty() => format!("{code} {text}"),
            _ => text,
        }
    }

    /// Numbers that parse are stored as numbers; anything else is kept as the
    /// raw text so no input is lost.
    fn parse(&self, raw: &str) -> Value {
        let trimmed = raw.trim();
        if let Ok(int) = trimmed.parse::<i64>() {
            return Value::Number(int.into());
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string()))
    }
}

fn currency_code(input_config: &Metadata) -> Option<&str> {
    input_config.get("currency").and_then(Value::as_str)
}

/// Choice among `inputConfig.options`. Options may be plain values or
/// `{label, value}` objects.
#[derive(Debug, Clone, Default)]
pub struct SelectCapability;

impl Capability for SelectCapability {
    fn name(&self) -> &str {
        "select"
    }

    fn render(&self, props: LeafProps<'_>) -> EditorView {
        let choices = props.options.iter().map(option_label).collect();
        let text = selected_label(props.options, props.value);
        EditorView::new("select", props, text).with_choices(choices)
    }

    fn display(&self, value: &Value, input_config: &Metadata) -> String {
        let options = input_config
            .get("options")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        selected_label(options, value)
    }
}

fn option_label(option: &Value) -> String {
    match option {
        Value::Object(map) => map
            .get("label")
            .or_else(|| map.get("value"))
            .map(value_to_string)
            .unwrap_or_default(),
        other => value_to_string(other),
    }
}

fn option_value(option: &Value) -> &Value {
    match option {
        Value::Object(map) => map.get("value").unwrap_or(option),
        other => other,
    }
}

fn selected_label(options: &[Value], value: &Value) -> String {
    options
        .iter()
        .find(|option| option_value(option) == value)
        .map(option_label)
        .unwrap_or_else(|| value_to_string(value))
}

/// Yes/no switch.
#[derive(Debug, Clone, Default)]
pub struct ToggleCapability;

impl Capability for ToggleCapability {
    fn name(&self) -> &str {
        "toggle"
    }

    fn render(&self, props: LeafProps<'_>) -> EditorView {
        let text = self.display(props.value, props.input_config);
        EditorView::new("toggle", props, text).with_choices(vec!["Yes".into(), "No".into()])
    }

    fn display(&self, value: &Value, _input_config: &Metadata) -> String {
        match value {
            Value::Bool(true) => "Yes".to_string(),
            Value::Bool(false) => "No".to_string(),
            other => value_to_string(other),
        }
    }

    fn parse(&self, raw: &str) -> Value {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Value::Bool(true),
            "false" | "no" | "n" | "0" | "off" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        }
    }
}
