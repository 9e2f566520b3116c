//! Schema composition: merging catalog templates with per-application
//! overrides into concrete field definitions.

mod registry;

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::FieldCatalog;
use crate::error::Diagnostic;
use crate::schema::{
    AppFieldDeclaration, FieldDefinition, FieldKind, FieldPatch, FieldType, Metadata,
    definitions_from_patches,
};

pub use registry::RecordTypeRegistry;

/// Renaming of a base template to the output key a record type stores it
/// under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub base_key: String,
    pub output_key: String,
}

impl Alias {
    pub fn new(base_key: impl Into<String>, output_key: impl Into<String>) -> Self {
        Self {
            base_key: base_key.into(),
            output_key: output_key.into(),
        }
    }

    /// `patch.field`, when present, renames; otherwise the base key is kept.
    pub fn for_patch(base: &FieldDefinition, patch: Option<&FieldPatch>) -> Self {
        let output = patch
            .and_then(|patch| patch.field.clone())
            .unwrap_or_else(|| base.field.clone());
        Self::new(base.field.clone(), output)
    }

    pub fn is_rename(&self) -> bool {
        self.base_key != self.output_key
    }

    pub fn apply(&self, mut definition: FieldDefinition) -> FieldDefinition {
        definition.field = self.output_key.clone();
        definition
    }
}

/// Merge `patch` over `base`.
///
/// Top-level properties take the override when present. `display`,
/// `validations` and `inputConfig` merge key by key; a null `pattern`
/// override keeps the base pattern. A supplied `arrayConfig.object` replaces
/// the base item list while item bounds merge key by key. Object members are
/// only carried when the resolved type is `object` and no array config
/// applies.
pub fn resolve(base: &FieldDefinition, patch: Option<&FieldPatch>) -> FieldDefinition {
    let Some(patch) = patch else {
        return base.clone();
    };

    let field_type = patch.field_type.unwrap_or_else(|| base.kind.field_type());
    let input = patch
        .input
        .clone()
        .or_else(|| base.kind.input().map(str::to_string));
    let array_config = match (&patch.array_config, base.kind.array_config()) {
        (Some(config), base_config) => Some(config.merged_over(base_config)),
        (None, Some(base_config)) => Some(base_config.clone()),
        (None, None) => None,
    };
    let object_fields = if field_type == FieldType::Object && array_config.is_none() {
        match &patch.object_config {
            Some(fields) => Some(definitions_from_patches(fields)),
            None => base.kind.object_fields().map(<[FieldDefinition]>::to_vec),
        }
    } else {
        None
    };

    let merged = FieldDefinition {
        field: base.field.clone(),
        kind: FieldKind::from_parts(field_type, input, array_config, object_fields),
        label: patch.label.clone().or_else(|| base.label.clone()),
        required: patch.required.unwrap_or(base.required),
        default_value: patch
            .default_value
            .clone()
            .or_else(|| base.default_value.clone()),
        display: merge_metadata(&base.display, &patch.display),
        validations: merge_validations(&base.validations, &patch.validations),
        input_config: merge_metadata(&base.input_config, &patch.input_config),
    };

    Alias::for_patch(base, Some(patch)).apply(merged)
}

fn merge_metadata(base: &Metadata, patch: &Metadata) -> Metadata {
    let mut merged = base.clone();
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

fn merge_validations(base: &Metadata, patch: &Metadata) -> Metadata {
    let mut merged = base.clone();
    for (key, value) in patch {
        if key == "pattern" && value.is_null() {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Output of composing one record type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    pub fields: Vec<FieldDefinition>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Composition {
    pub fn missing_keys(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|diagnostic| match diagnostic {
                Diagnostic::Configuration { base_key } => Some(base_key.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The fields, or the first recorded degradation as an error.
    pub fn into_strict(self) -> crate::Result<Vec<FieldDefinition>> {
        match self.diagnostics.first() {
            Some(diagnostic) => Err(diagnostic.into()),
            None => Ok(self.fields),
        }
    }
}

/// Resolves declaration lists against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct SchemaComposer<'a> {
    catalog: &'a FieldCatalog,
}

impl<'a> SchemaComposer<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        Self { catalog }
    }

    pub fn compose(&self, declarations: &[AppFieldDeclaration]) -> Vec<FieldDefinition> {
        self.compose_report(declarations).fields
    }

    /// Resolve every declaration in order. Unknown base keys fall back to the
    /// declaration's own override and are reported, never rejected.
    pub fn compose_report(&self, declarations: &[AppFieldDeclaration]) -> Composition {
        let mut composition = Composition::default();
        for declaration in declarations {
            let definition = match self.catalog.get(&declaration.field) {
                Some(base) => resolve(base, declaration.patch.as_ref()),
                None => {
                    warn!(
                        base_key = %declaration.field,
                        "no catalog entry for declared field; using declaration as-is"
                    );
                    composition.diagnostics.push(Diagnostic::Configuration {
                        base_key: declaration.field.clone(),
                    });
                    let patch = declaration.patch.clone().unwrap_or_default();
                    FieldDefinition::from_patch(&declaration.field, &patch)
                }
            };
            lint_patterns(&definition, &mut composition.diagnostics);
            composition.fields.push(definition);
        }
        debug!(
            fields = composition.fields.len(),
            issues = composition.diagnostics.len(),
            "composed record type"
        );
        composition
    }
}

fn lint_patterns(definition: &FieldDefinition, diagnostics: &mut Vec<Diagnostic>) {
    if let Some(Value::String(pattern)) = definition.validations.get("pattern") {
        if let Err(err) = Regex::new(pattern) {
            warn!(field = %definition.field, %pattern, "declared pattern does not compile");
            diagnostics.push(Diagnostic::InvalidPattern {
                field: definition.field.clone(),
                pattern: pattern.clone(),
                message: err.to_string(),
            });
        }
    }
    for child in definition.kind.children() {
        lint_patterns(child, diagnostics);
    }
}

/// Definitions ordered by `display.order` ascending (missing order is `0`),
/// keeping declaration order among equal orders.
pub fn sort_by_display_order(fields: &[FieldDefinition]) -> Vec<&FieldDefinition> {
    let mut ordered: Vec<&FieldDefinition> = fields.iter().collect();
    ordered.sort_by(|a, b| {
        a.display_order()
            .partial_cmp(&b.display_order())
            .unwrap_or(Ordering::Equal)
    });
    ordered
}
