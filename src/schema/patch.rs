use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ArrayConfig, FieldDefinition, FieldType, Metadata, definitions_from_patches};

/// A partial field definition, as written in catalog and declaration
/// documents. Every key is optional; when merged over a base definition the
/// present keys win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    /// Output key. Supplying a different key renames the base field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// `array`, `object`, or any scalar tag (`string`, `date`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub field_type: Option<FieldType>,
    /// Leaf capability key, e.g. `text`, `date`, `currency`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Placeholder, order and other presentation hints.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub display: Metadata,
    /// Declared constraints (length, pattern, numeric bounds).
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub validations: Metadata,
    /// Options passed through to the leaf capability.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub input_config: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_config: Option<ArrayConfigPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_config: Option<Vec<FieldPatch>>,
}

impl FieldPatch {
    pub fn renamed(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArrayConfigPatch {
    /// Item shape. When present it replaces the base item list entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Vec<FieldPatch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl ArrayConfigPatch {
    /// Merge over an optional base config: `object` replaces wholesale, the
    /// item bounds merge key by key.
    pub fn merged_over(&self, base: Option<&ArrayConfig>) -> ArrayConfig {
        ArrayConfig {
            object: match &self.object {
                Some(items) => definitions_from_patches(items),
                None => base.map(|config| config.object.clone()).unwrap_or_default(),
            },
            min_items: self.min_items.or(base.and_then(|config| config.min_items)),
            max_items: self.max_items.or(base.and_then(|config| config.max_items)),
        }
    }
}

/// Per-application reference to a catalog entry plus an optional override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AppFieldDeclaration {
    /// Catalog key of the base template.
    pub field: String,
    #[serde(
        rename = "override",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub patch: Option<FieldPatch>,
}

impl AppFieldDeclaration {
    pub fn new(base_key: impl Into<String>) -> Self {
        Self {
            field: base_key.into(),
            patch: None,
        }
    }

    pub fn with_override(mut self, patch: FieldPatch) -> Self {
        self.patch = Some(patch);
        self
    }

    /// Shorthand for reusing a base template under another output key.
    pub fn renamed(base_key: impl Into<String>, output_key: impl Into<String>) -> Self {
        Self::new(base_key).with_override(FieldPatch::renamed(output_key))
    }

    /// Output key this declaration resolves to, before catalog lookup.
    pub fn output_key(&self) -> &str {
        self.patch
            .as_ref()
            .and_then(|patch| patch.field.as_deref())
            .unwrap_or(&self.field)
    }
}

impl From<&FieldDefinition> for AppFieldDeclaration {
    fn from(definition: &FieldDefinition) -> Self {
        AppFieldDeclaration::new(definition.field.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn declaration_reads_override_key() {
        let decl: AppFieldDeclaration = serde_json::from_value(json!({
            "field": "name",
            "override": {"field": "firstName", "label": "First name"}
        }))
        .unwrap();
        assert_eq!(decl.field, "name");
        assert_eq!(decl.output_key(), "firstName");
        assert_eq!(
            decl.patch.as_ref().and_then(|p| p.label.as_deref()),
            Some("First name")
        );
    }

    #[test]
    fn array_patch_keeps_base_items_when_absent() {
        let base = ArrayConfig {
            object: vec![FieldDefinition::scalar("value", "text")],
            min_items: Some(1),
            max_items: Some(4),
        };
        let patch = ArrayConfigPatch {
            object: None,
            min_items: None,
            max_items: Some(8),
        };
        let merged = patch.merged_over(Some(&base));
        assert_eq!(merged.object, base.object);
        assert_eq!(merged.min_items, Some(1));
        assert_eq!(merged.max_items, Some(8));
    }
}
