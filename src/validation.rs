//! Opt-in checking of declared `validations` and `required` flags.
//!
//! Nothing in composition, rendering or the form store calls this; callers
//! that want enforcement run [`check_record`] themselves (for example before
//! saving).

use anyhow::{Context, Result};
use jsonschema::validator_for;
use serde_json::{Map, Value, json};

use crate::error::RecordUiError;
use crate::schema::{FieldDefinition, FieldKind, Metadata};

/// One failed constraint, addressed by JSON pointer into the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub pointer: String,
    pub message: String,
}

impl From<ValidationIssue> for RecordUiError {
    fn from(issue: ValidationIssue) -> Self {
        RecordUiError::Validation {
            path: issue.pointer,
            message: issue.message,
        }
    }
}

/// Evaluate `record` against the constraints declared on `fields`.
pub fn check_record(fields: &[FieldDefinition], record: &Value) -> Result<Vec<ValidationIssue>> {
    let schema = record_schema(fields);
    let validator = validator_for(&schema).context("failed to compile declared validations")?;
    Ok(validator
        .iter_errors(record)
        .map(|error| ValidationIssue {
            pointer: error.instance_path.to_string(),
            message: error.to_string(),
        })
        .collect())
}

/// JSON Schema equivalent of the declared constraints.
pub fn record_schema(fields: &[FieldDefinition]) -> Value {
    let mut schema = object_schema(fields);
    schema.insert("type".into(), json!("object"));
    Value::Object(schema)
}

fn object_schema(fields: &[FieldDefinition]) -> Map<String, Value> {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|definition| (definition.field.clone(), field_schema(definition)))
        .collect();
    let required: Vec<Value> = fields
        .iter()
        .filter(|definition| definition.required)
        .map(|definition| Value::String(definition.field.clone()))
        .collect();
    let mut schema = Map::new();
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    schema
}

fn field_schema(definition: &FieldDefinition) -> Value {
    let mut schema = match &definition.kind {
        FieldKind::Scalar { .. } => scalar_schema(&definition.validations, definition.required),
        FieldKind::Object(members) => {
            let mut schema = object_schema(members);
            schema.insert("type".into(), json!(["object", "null"]));
            schema
        }
        FieldKind::Array(config) => {
            let mut items = object_schema(&config.object);
            items.insert("type".into(), json!("object"));
            let mut schema = Map::new();
            schema.insert("type".into(), json!(["array", "null"]));
            schema.insert("items".into(), Value::Object(items));
            if let Some(min) = config.min_items {
                schema.insert("minItems".into(), json!(min));
            }
            if let Some(max) = config.max_items {
                schema.insert("maxItems".into(), json!(max));
            }
            schema
        }
    };
    if definition.required && !definition.kind.children().is_empty() {
        schema.insert("not".into(), json!({"type": "null"}));
    }
    Value::Object(schema)
}

fn scalar_schema(validations: &Metadata, required: bool) -> Map<String, Value> {
    let mut schema = Map::new();
    for (key, target) in [
        ("minLength", "minLength"),
        ("maxLength", "maxLength"),
        ("pattern", "pattern"),
        ("min", "minimum"),
        ("minimum", "minimum"),
        ("max", "maximum"),
        ("maximum", "maximum"),
    ] {
        if let Some(value) = validations.get(key).filter(|value| !value.is_null()) {
            schema.insert(target.into(), value.clone());
        }
    }
    if required {
        schema.entry("minLength").or_insert(json!(1));
        schema.insert("not".into(), json!({"type": "null"}));
    }
    schema
}
