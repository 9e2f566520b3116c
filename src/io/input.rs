use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;

use super::DocumentFormat;
use crate::catalog::FieldCatalog;
use crate::schema::{AppFieldDeclaration, FieldDefinition, FieldPatch};

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Try every compiled-in format in turn, JSON first.
pub fn parse_document_auto(contents: &str) -> Result<Value> {
    let mut failures = Vec::new();
    for format in DocumentFormat::available() {
        match parse_document_str(contents, *format) {
            Ok(value) => return Ok(value),
            Err(err) => failures.push(format!("{format}: {err:#}")),
        }
    }
    Err(anyhow!(
        "document is not valid in any supported format ({})",
        failures.join("; ")
    ))
}

/// Read a document from disk, picking the format from the file extension.
pub fn read_document(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match DocumentFormat::from_path(path) {
        Some(format) => parse_document_str(&contents, format),
        None => parse_document_auto(&contents),
    }
    .with_context(|| format!("failed to parse {}", path.display()))
}

/// Build a catalog from either a list of definitions, `{ "fields": [...] }`,
/// or a map of base key to definition (the key stands in for a missing
/// `field`).
pub fn load_catalog(document: &Value) -> Result<FieldCatalog> {
    let definitions = match document {
        Value::Array(entries) => definitions_from_list(entries)?,
        Value::Object(map) => match map.get("fields") {
            Some(Value::Array(entries)) => definitions_from_list(entries)?,
            Some(_) => bail!("catalog 'fields' must be an array"),
            None => map
                .iter()
                .map(|(key, entry)| {
                    let patch: FieldPatch = serde_json::from_value(entry.clone())
                        .with_context(|| format!("catalog entry '{key}' is not a field definition"))?;
                    Ok(FieldDefinition::from_patch(key, &patch))
                })
                .collect::<Result<Vec<_>>>()?,
        },
        other => bail!("catalog must be an array or object, found {}", crate::value::kind_name(other)),
    };
    Ok(FieldCatalog::from_definitions(definitions))
}

fn definitions_from_list(entries: &[Value]) -> Result<Vec<FieldDefinition>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let patch: FieldPatch = serde_json::from_value(entry.clone())
                .with_context(|| format!("catalog entry #{index} is not a field definition"))?;
            let Some(field) = patch.field.clone().filter(|field| !field.is_empty()) else {
                bail!("catalog entry #{index} has no 'field' key");
            };
            Ok(FieldDefinition::from_patch(&field, &patch))
        })
        .collect()
}

/// Declarations from a list or `{ "fields": [...] }`. A bare string entry is
/// shorthand for a declaration without override.
pub fn load_declarations(document: &Value) -> Result<Vec<AppFieldDeclaration>> {
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("fields") {
            Some(Value::Array(entries)) => entries,
            _ => bail!("declarations object must carry a 'fields' array"),
        },
        other => bail!(
            "declarations must be an array or object, found {}",
            crate::value::kind_name(other)
        ),
    };
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::String(base_key) => Ok(AppFieldDeclaration::new(base_key.clone())),
            other => serde_json::from_value(other.clone())
                .with_context(|| format!("declaration #{index} is not valid")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use serde_json::json;

    #[test]
    fn catalog_accepts_list_and_map_forms() {
        let list = load_catalog(&json!([{"field": "name", "input": "text"}])).unwrap();
        assert!(list.contains("name"));

        let map = load_catalog(&json!({"phone": {"input": "phone"}, "tags": {
            "type": "array",
            "arrayConfig": {"object": [{"field": "value", "defaultValue": ""}]}
        }}))
        .unwrap();
        assert_eq!(map.get("phone").map(|def| def.field.as_str()), Some("phone"));
        assert_eq!(map.get("tags").map(|def| def.kind.field_type()), Some(FieldType::Array));
    }

    #[test]
    fn catalog_list_entries_need_a_field() {
        let err = load_catalog(&json!([{"input": "text"}])).unwrap_err();
        assert!(err.to_string().contains("#0"));
    }

    #[test]
    fn declarations_accept_wrapped_and_shorthand_entries() {
        let decls = load_declarations(&json!({"fields": [
            "email",
            {"field": "name", "override": {"field": "firstName"}}
        ]}))
        .unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].field, "email");
        assert_eq!(decls[1].output_key(), "firstName");
        assert!(load_declarations(&json!(3)).is_err());
    }

    #[test]
    fn auto_detection_prefers_json() {
        assert_eq!(parse_document_auto("{\"a\": 1}").unwrap(), json!({"a": 1}));
    }
}
