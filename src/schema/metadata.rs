use serde_json::Value;

/// Turn an output key into a readable label: `postal_code`, `postal-code`
/// and `postalCode` all become `Postal Code`.
pub fn prettify_label(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(raw.len() + 4);
    let mut capitalize = true;
    let mut previous_lower = false;
    for ch in raw.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !result.ends_with(' ') {
                result.push(' ');
            }
            capitalize = true;
            previous_lower = false;
            continue;
        }

        if ch.is_uppercase() && previous_lower {
            result.push(' ');
        }

        if capitalize {
            result.extend(ch.to_uppercase());
            capitalize = false;
        } else {
            result.push(ch);
        }
        previous_lower = ch.is_lowercase() || ch.is_ascii_digit();
    }

    result.trim().to_string()
}

/// Stringify a stored value for display.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// `null`, empty strings, empty arrays and empty objects count as empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
