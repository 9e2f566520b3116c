use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::form::{FormMutation, Mode};
use crate::path::FieldPath;
use crate::schema::{Metadata, value_to_string};

use super::capabilities::{NumberCapability, SelectCapability, TextCapability, ToggleCapability};

/// Callback handed to a leaf capability. It turns a new leaf value into the
/// correctly addressed mutation; the capability never sees the path.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeHandle {
    path: FieldPath,
}

impl ChangeHandle {
    pub(crate) fn new(path: FieldPath) -> Self {
        Self { path }
    }

    pub fn on_change_text(&self, value: Value) -> FormMutation {
        FormMutation::set(&self.path, value)
    }
}

/// Everything a leaf capability gets to render an editor.
#[derive(Debug, Clone)]
pub struct LeafProps<'a> {
    pub value: &'a Value,
    pub on_change_text: ChangeHandle,
    pub mode: Mode,
    pub label: String,
    pub placeholder: Option<&'a str>,
    pub options: &'a [Value],
    pub input_config: &'a Metadata,
}

/// Editor produced by a capability in add/edit mode.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView {
    pub widget: String,
    pub label: String,
    pub text: String,
    pub placeholder: Option<String>,
    pub choices: Vec<String>,
    pub hint: Option<String>,
    pub on_change_text: ChangeHandle,
}

impl EditorView {
    pub fn new(widget: impl Into<String>, props: LeafProps<'_>, text: String) -> Self {
        Self {
            widget: widget.into(),
            label: props.label,
            text,
            placeholder: props.placeholder.map(str::to_string),
            choices: Vec::new(),
            hint: None,
            on_change_text: props.on_change_text,
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// A leaf renderer keyed by input kind.
pub trait Capability: Send + Sync {
    fn name(&self) -> &str;

    fn render(&self, props: LeafProps<'_>) -> EditorView;

    /// Static text for read mode.
    fn display(&self, value: &Value, _input_config: &Metadata) -> String {
        value_to_string(value)
    }

    /// Turn raw user text into the leaf value handed to `on_change_text`.
    fn parse(&self, raw: &str) -> Value {
        Value::String(raw.to_string())
    }
}

/// Lookup from input kind to capability. `None` means unmapped; the renderer
/// falls back to plain text.
pub trait RendererRegistry: Send + Sync {
    fn lookup(&self, input: &str) -> Option<Arc<dyn Capability>>;
}

#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    entries: HashMap<String, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capabilities for every input kind used by the builtin catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for input in [
            "text", "textarea", "email", "phone", "link", "date", "time", "image", "video",
        ] {
            registry.register(input, Arc::new(TextCapability::new(input)));
        }
        registry.register("number", Arc::new(NumberCapability::plain()));
        registry.register("currency", Arc::new(NumberCapability::currency()));
        registry.register("select", Arc::new(SelectCapability));
        registry.register("toggle", Arc::new(ToggleCapability));
        registry.register("boolean", Arc::new(ToggleCapability));
        registry
    }

    pub fn register(&mut self, input: impl Into<String>, capability: Arc<dyn Capability>) {
        self.entries.insert(input.into(), capability);
    }

    pub fn with(mut self, input: impl Into<String>, capability: Arc<dyn Capability>) -> Self {
        self.register(input, capability);
        self
    }

    pub fn contains(&self, input: &str) -> bool {
        self.entries.contains_key(input)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RendererRegistry for CapabilityRegistry {
    fn lookup(&self, input: &str) -> Option<Arc<dyn Capability>> {
        self.entries.get(input).cloned()
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("CapabilityRegistry")
            .field("inputs", &keys)
            .finish()
    }
}
