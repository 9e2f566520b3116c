//! Field definitions: the resolved description of every addressable value in
//! a record.

mod metadata;
mod patch;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use metadata::{is_empty_value, prettify_label, value_to_string};
pub use patch::{AppFieldDeclaration, ArrayConfigPatch, FieldPatch};

/// Free-form, ordered key/value metadata (`display`, `validations`, `inputConfig`).
pub type Metadata = IndexMap<String, Value>;

/// The declared `type` tag of a definition document.
///
/// Any tag other than `array` or `object` (for example `string`, `date`,
/// `number`) describes a scalar leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum FieldType {
    Scalar,
    Array,
    Object,
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "array" => FieldType::Array,
            "object" => FieldType::Object,
            _ => FieldType::Scalar,
        }
    }
}

impl From<FieldType> for &'static str {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Scalar => "scalar",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }
}

/// Nested item shape and size bounds of an array field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayConfig {
    pub object: Vec<FieldDefinition>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

/// Shape of a definition. Exactly one of the three holds for any definition.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Leaf value rendered by the capability registered for `input`.
    Scalar { input: Option<String> },
    /// Ordered sequence of nested objects shaped by `ArrayConfig::object`.
    Array(ArrayConfig),
    /// Single nested object with a fixed member list.
    Object(Vec<FieldDefinition>),
}

impl FieldKind {
    pub fn text() -> Self {
        FieldKind::Scalar { input: None }
    }

    pub fn scalar(input: impl Into<String>) -> Self {
        FieldKind::Scalar {
            input: Some(input.into()),
        }
    }

    /// Assemble a kind from loosely declared parts. An `array` tag without an
    /// array config, or an `object` tag without members (or shadowed by an
    /// array config), falls back to a scalar leaf.
    pub fn from_parts(
        field_type: FieldType,
        input: Option<String>,
        array_config: Option<ArrayConfig>,
        object_fields: Option<Vec<FieldDefinition>>,
    ) -> Self {
        match (field_type, array_config, object_fields) {
            (FieldType::Array, Some(config), _) => FieldKind::Array(config),
            (FieldType::Object, None, Some(fields)) => FieldKind::Object(fields),
            _ => FieldKind::Scalar { input },
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Scalar { .. } => FieldType::Scalar,
            FieldKind::Array(_) => FieldType::Array,
            FieldKind::Object(_) => FieldType::Object,
        }
    }

    pub fn input(&self) -> Option<&str> {
        match self {
            FieldKind::Scalar { input } => input.as_deref(),
            _ => None,
        }
    }

    pub fn array_config(&self) -> Option<&ArrayConfig> {
        match self {
            FieldKind::Array(config) => Some(config),
            _ => None,
        }
    }

    pub fn object_fields(&self) -> Option<&[FieldDefinition]> {
        match self {
            FieldKind::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Nested definitions of an array item or object; empty for scalars.
    pub fn children(&self) -> &[FieldDefinition] {
        match self {
            FieldKind::Scalar { .. } => &[],
            FieldKind::Array(config) => &config.object,
            FieldKind::Object(fields) => fields,
        }
    }
}

/// One addressable piece of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FieldPatch", into = "FieldPatch")]
pub struct FieldDefinition {
    /// Output key: where the value lives in the record.
    pub field: String,
    pub kind: FieldKind,
    pub label: Option<String>,
    pub required: bool,
    pub default_value: Option<Value>,
    pub display: Metadata,
    pub validations: Metadata,
    pub input_config: Metadata,
}

impl FieldDefinition {
    pub fn new(field: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            field: field.into(),
            kind,
            label: None,
            required: false,
            default_value: None,
            display: Metadata::new(),
            validations: Metadata::new(),
            input_config: Metadata::new(),
        }
    }

    pub fn scalar(field: impl Into<String>, input: impl Into<String>) -> Self {
        Self::new(field, FieldKind::scalar(input))
    }

    pub fn array(field: impl Into<String>, items: Vec<FieldDefinition>) -> Self {
        Self::new(
            field,
            FieldKind::Array(ArrayConfig {
                object: items,
                ..ArrayConfig::default()
            }),
        )
    }

    pub fn object(field: impl Into<String>, members: Vec<FieldDefinition>) -> Self {
        Self::new(field, FieldKind::Object(members))
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_display(mut self, key: impl Into<String>, value: Value) -> Self {
        self.display.insert(key.into(), value);
        self
    }

    pub fn with_validation(mut self, key: impl Into<String>, value: Value) -> Self {
        self.validations.insert(key.into(), value);
        self
    }

    pub fn with_input_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.input_config.insert(key.into(), value);
        self
    }

    pub fn with_item_bounds(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        if let FieldKind::Array(config) = &mut self.kind {
            config.min_items = min;
            config.max_items = max;
        }
        self
    }

    /// Build a definition from a document/override patch. `fallback_key`
    /// names the field when the patch carries no `field` of its own.
    pub fn from_patch(fallback_key: &str, patch: &FieldPatch) -> Self {
        let field_type = patch.field_type.unwrap_or(if patch.array_config.is_some() {
            FieldType::Array
        } else if patch.object_config.is_some() {
            FieldType::Object
        } else {
            FieldType::Scalar
        });
        let array_config = patch
            .array_config
            .as_ref()
            .map(|config| config.merged_over(None));
        let object_fields = patch
            .object_config
            .as_ref()
            .map(|fields| definitions_from_patches(fields));

        Self {
            field: patch
                .field
                .clone()
                .unwrap_or_else(|| fallback_key.to_string()),
            kind: FieldKind::from_parts(field_type, patch.input.clone(), array_config, object_fields),
            label: patch.label.clone(),
            required: patch.required.unwrap_or(false),
            default_value: patch.default_value.clone(),
            display: patch.display.clone(),
            validations: patch.validations.clone(),
            input_config: patch.input_config.clone(),
        }
    }

    pub fn to_patch(&self) -> FieldPatch {
        FieldPatch {
            field: Some(self.field.clone()),
            field_type: Some(self.kind.field_type()),
            input: self.kind.input().map(str::to_string),
            label: self.label.clone(),
            required: self.required.then_some(true),
            default_value: self.default_value.clone(),
            display: self.display.clone(),
            validations: self.validations.clone(),
            input_config: self.input_config.clone(),
            array_config: self.kind.array_config().map(|config| ArrayConfigPatch {
                object: Some(config.object.iter().map(FieldDefinition::to_patch).collect()),
                min_items: config.min_items,
                max_items: config.max_items,
            }),
            object_config: self
                .kind
                .object_fields()
                .map(|fields| fields.iter().map(FieldDefinition::to_patch).collect()),
        }
    }

    /// Human label: the declared label, or the prettified output key.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => prettify_label(&self.field),
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.display.get("placeholder").and_then(Value::as_str)
    }

    /// `display.order`, treating a missing or non-numeric order as `0`.
    pub fn display_order(&self) -> f64 {
        self.display
            .get("order")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    /// Selectable options declared in `inputConfig.options`.
    pub fn options(&self) -> &[Value] {
        self.input_config
            .get("options")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find a direct child definition by output key.
    pub fn child(&self, field: &str) -> Option<&FieldDefinition> {
        self.kind.children().iter().find(|child| child.field == field)
    }
}

impl From<FieldPatch> for FieldDefinition {
    fn from(patch: FieldPatch) -> Self {
        FieldDefinition::from_patch("", &patch)
    }
}

impl From<FieldDefinition> for FieldPatch {
    fn from(definition: FieldDefinition) -> Self {
        definition.to_patch()
    }
}

/// JSON Schema describing declaration documents (`[{ field, override? }]`).
pub fn declarations_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(Vec<AppFieldDeclaration>)).unwrap_or_default()
}

/// JSON Schema describing catalog documents (a list of field definitions).
pub fn catalog_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(Vec<FieldPatch>)).unwrap_or_default()
}

pub(crate) fn definitions_from_patches(patches: &[FieldPatch]) -> Vec<FieldDefinition> {
    patches
        .iter()
        .map(|patch| FieldDefinition::from_patch("", patch))
        .collect()
}
