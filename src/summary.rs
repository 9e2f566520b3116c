//! One-line-per-field summaries used by list views.

use serde_json::{Map, Value};

use crate::compose::sort_by_display_order;
use crate::options::EngineOptions;
use crate::schema::{FieldDefinition, FieldKind, is_empty_value, value_to_string};
use crate::value::{normalize_to_array, normalize_to_object};

/// Summary lines for `record`, one per non-empty field. Identity fields
/// (see [`EngineOptions::summary_skip_fields`]) are left to [`identity_line`].
pub fn summary_lines(fields: &[FieldDefinition], record: &Value, options: &EngineOptions) -> Vec<String> {
    let Some(record) = record.as_object() else {
        return Vec::new();
    };
    let ordered = if options.sort_by_display_order {
        sort_by_display_order(fields)
    } else {
        fields.iter().collect()
    };
    ordered
        .into_iter()
        .filter(|definition| !options.skips_in_summary(&definition.field))
        .filter_map(|definition| {
            let value = record.get(&definition.field)?;
            if is_empty_value(value) {
                return None;
            }
            let text = summarize_value(definition, value);
            (!text.is_empty()).then(|| format!("{}: {text}", definition.display_label()))
        })
        .collect()
}

/// `firstName lastName`, or `None` when both are empty.
pub fn identity_line(record: &Value) -> Option<String> {
    let part = |key: &str| {
        record
            .get(key)
            .map(value_to_string)
            .unwrap_or_default()
            .trim()
            .to_string()
    };
    let joined = [part("firstName"), part("lastName")]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

fn summarize_value(definition: &FieldDefinition, value: &Value) -> String {
    match (&definition.kind, value) {
        (FieldKind::Array(_), value) => summarize_items(&normalize_to_array(Some(value))),
        (FieldKind::Object(members), value) => {
            summarize_object(members, &normalize_to_object(Some(value)))
        }
        (FieldKind::Scalar { .. }, Value::Array(items)) => summarize_items(items),
        (FieldKind::Scalar { .. }, other) => value_to_string(other),
    }
}

fn summarize_items(items: &[Value]) -> String {
    let entries: Vec<String> = items
        .iter()
        .filter(|item| !is_empty_value(item))
        .filter_map(|item| {
            let text = match item {
                Value::Object(map) if map.contains_key("label") && map.contains_key("value") => {
                    let label = map.get("label").map(value_to_string).unwrap_or_default();
                    let value = map.get("value").map(value_to_string).unwrap_or_default();
                    match (label.is_empty(), value.is_empty()) {
                        (true, true) => String::new(),
                        (true, false) => value,
                        (false, true) => label,
                        (false, false) => format!("{label} • {value}"),
                    }
                }
                Value::Object(map) if map.contains_key("name") => {
                    map.get("name").map(value_to_string).unwrap_or_default()
                }
                Value::Object(map) if map.contains_key("value") => {
                    map.get("value").map(value_to_string).unwrap_or_default()
                }
                other => value_to_string(other),
            };
            (!text.is_empty()).then_some(text)
        })
        .collect();
    entries.join(", ")
}

fn summarize_object(members: &[FieldDefinition], map: &Map<String, Value>) -> String {
    members
        .iter()
        .filter_map(|member| {
            let value = map.get(&member.field).filter(|value| !is_empty_value(value))?;
            let text = summarize_value(member, value);
            (!text.is_empty()).then(|| format!("{}: {text}", member.display_label()))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
