use serde_json::{Map, Value};

use crate::schema::{ArrayConfig, FieldDefinition, FieldKind};

/// Initial value of a field in a fresh record.
///
/// Scalars take `defaultValue` or `""`. Objects are populated member by
/// member. Arrays start empty (or with an array `defaultValue`) and are
/// padded with exactly `minItems` defaulted items when that would leave them
/// empty.
pub fn default_value(definition: &FieldDefinition) -> Value {
    match &definition.kind {
        FieldKind::Scalar { .. } => definition
            .default_value
            .clone()
            .unwrap_or_else(|| Value::String(String::new())),
        FieldKind::Object(members) => Value::Object(default_object(members)),
        FieldKind::Array(config) => {
            let items = match &definition.default_value {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            };
            Value::Array(pad_to_min_items(items, config))
        }
    }
}

/// One freshly defaulted array item.
pub fn default_item(config: &ArrayConfig) -> Value {
    Value::Object(default_object(&config.object))
}

pub fn default_object(fields: &[FieldDefinition]) -> Map<String, Value> {
    fields
        .iter()
        .map(|definition| (definition.field.clone(), default_value(definition)))
        .collect()
}

/// Default record for add mode.
pub fn default_record(fields: &[FieldDefinition]) -> Value {
    Value::Object(default_object(fields))
}

/// Seed a loaded record: fields that are missing or `null` get their
/// defaults, nested objects and array items are filled member by member,
/// and empty arrays honour `minItems`. Keys the definitions don't mention
/// are kept, and values of the wrong shape are left for the renderer to
/// coerce.
pub fn fill_defaults(fields: &[FieldDefinition], record: &Value) -> Value {
    let map = match record {
        Value::Object(map) => fill_object(fields, map),
        _ => default_object(fields),
    };
    Value::Object(map)
}

fn fill_object(fields: &[FieldDefinition], existing: &Map<String, Value>) -> Map<String, Value> {
    let mut filled = existing.clone();
    for definition in fields {
        let next = match (existing.get(&definition.field), &definition.kind) {
            (None | Some(Value::Null), _) => default_value(definition),
            (Some(Value::Object(inner)), FieldKind::Object(members)) => {
                Value::Object(fill_object(members, inner))
            }
            (Some(Value::Array(items)), FieldKind::Array(config)) if items.is_empty() => {
                Value::Array(pad_to_min_items(Vec::new(), config))
            }
            (Some(Value::Array(items)), FieldKind::Array(config)) => Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(inner) => Value::Object(fill_object(&config.object, inner)),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            (Some(value), _) => value.clone(),
        };
        filled.insert(definition.field.clone(), next);
    }
    filled
}

fn pad_to_min_items(items: Vec<Value>, config: &ArrayConfig) -> Vec<Value> {
    match config.min_items {
        Some(min) if min > 0 && items.is_empty() => (0..min).map(|_| default_item(config)).collect(),
        _ => items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value_item() -> FieldDefinition {
        FieldDefinition::scalar("value", "text").with_default(json!(""))
    }

    #[test]
    fn scalars_default_to_empty_string() {
        let def = FieldDefinition::scalar("name", "text");
        assert_eq!(default_value(&def), json!(""));
        let def = def.with_default(json!("Jane"));
        assert_eq!(default_value(&def), json!("Jane"));
    }

    #[test]
    fn min_items_prepopulates_exactly() {
        let def = FieldDefinition::array("phones", vec![value_item()]).with_item_bounds(Some(1), None);
        assert_eq!(default_value(&def), json!([{"value": ""}]));

        let two = FieldDefinition::array("phones", vec![value_item()]).with_item_bounds(Some(2), None);
        assert_eq!(default_value(&two), json!([{"value": ""}, {"value": ""}]));

        let none = FieldDefinition::array("phones", vec![value_item()]);
        assert_eq!(default_value(&none), json!([]));
    }

    #[test]
    fn objects_default_recursively() {
        let def = FieldDefinition::object(
            "address",
            vec![
                FieldDefinition::scalar("city", "text"),
                FieldDefinition::array("lines", vec![value_item()]).with_item_bounds(Some(1), None),
            ],
        );
        assert_eq!(
            default_value(&def),
            json!({"city": "", "lines": [{"value": ""}]})
        );
    }

    #[test]
    fn fill_keeps_existing_and_unknown_keys() {
        let fields = vec![
            FieldDefinition::scalar("name", "text"),
            FieldDefinition::object(
                "address",
                vec![
                    FieldDefinition::scalar("city", "text"),
                    FieldDefinition::scalar("country", "text").with_default(json!("NO")),
                ],
            ),
            FieldDefinition::array("phones", vec![value_item()]).with_item_bounds(Some(1), None),
        ];
        let record = json!({"id": "r1", "name": "Ada", "address": {"city": "Oslo"}, "phones": []});
        let filled = fill_defaults(&fields, &record);
        assert_eq!(
            filled,
            json!({
                "id": "r1",
                "name": "Ada",
                "address": {"city": "Oslo", "country": "NO"},
                "phones": [{"value": ""}]
            })
        );
    }

    #[test]
    fn fill_reaches_into_array_items() {
        let fields = vec![
            FieldDefinition::object("address", vec![FieldDefinition::scalar("city", "text")]),
            FieldDefinition::array(
                "links",
                vec![
                    FieldDefinition::scalar("label", "text"),
                    FieldDefinition::scalar("value", "link").with_default(json!("")),
                ],
            ),
        ];
        let record = json!({"address": {}, "links": [{"label": "a"}, "loose", {"value": "v", "extra": 1}]});
        assert_eq!(
            fill_defaults(&fields, &record),
            json!({
                "address": {"city": ""},
                "links": [
                    {"label": "a", "value": ""},
                    "loose",
                    {"value": "v", "extra": 1, "label": ""}
                ]
            })
        );
    }

    #[test]
    fn fill_leaves_mismatched_shapes_alone() {
        let fields = vec![FieldDefinition::array("phones", vec![value_item()])];
        let filled = fill_defaults(&fields, &json!({"phones": "555"}));
        assert_eq!(filled["phones"], json!("555"));
    }
}
