//! Path-addressed edits on a record value. Each function works on a copy and
//! hands back the edited copy; the input is never touched.

use serde_json::{Map, Value};

use crate::error::PathError;
use crate::path::{FieldPath, PathSegment};
use crate::value::{kind_name, normalize_to_array};

/// A record value that is only ever edited by producing a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    value: Value,
}

impl FormDraft {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path.lookup(&self.value)
    }

    pub fn set(&self, path: &FieldPath, value: Value) -> Result<Self, PathError> {
        set_at(&self.value, path, value).map(Self::new)
    }

    pub fn push(&self, path: &FieldPath, element: Value) -> Result<Self, PathError> {
        push_at(&self.value, path, element).map(Self::new)
    }

    /// Remove the array item or object key that `path` ends on.
    pub fn remove(&self, path: &FieldPath) -> Result<Self, PathError> {
        match path.last() {
            None => Err(PathError::Empty),
            Some(PathSegment::Index(index)) => {
                remove_at(&self.value, &path.parent(), *index).map(Self::new)
            }
            Some(PathSegment::Key(key)) => {
                let parent = path.parent();
                let mut next = self.value.clone();
                let slot = if parent.is_empty() {
                    &mut next
                } else {
                    slot_mut(&mut next, &parent)?
                };
                match slot.as_object_mut().and_then(|map| map.shift_remove(key)) {
                    Some(_) => Ok(Self::new(next)),
                    None => Err(PathError::UnknownField {
                        path: path.to_string(),
                    }),
                }
            }
        }
    }

    pub fn len_at(&self, path: &FieldPath) -> usize {
        array_len(&self.value, path)
    }
}

fn set_at(root: &Value, path: &FieldPath, value: Value) -> Result<Value, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    let mut next = root.clone();
    *slot_mut(&mut next, path)? = value;
    Ok(next)
}

fn push_at(root: &Value, path: &FieldPath, element: Value) -> Result<Value, PathError> {
    let mut next = root.clone();
    let items = array_mut(&mut next, path)?;
    items.push(element);
    Ok(next)
}

fn remove_at(root: &Value, path: &FieldPath, index: usize) -> Result<Value, PathError> {
    let mut next = root.clone();
    let items = array_mut(&mut next, path)?;
    if index >= items.len() {
        return Err(PathError::IndexOutOfRange {
            path: path.to_string(),
            index,
            len: items.len(),
        });
    }
    items.remove(index);
    Ok(next)
}

fn array_len(root: &Value, path: &FieldPath) -> usize {
    match path.lookup(root) {
        Some(Value::Array(items)) => items.len(),
        other => normalize_to_array(other).len(),
    }
}

fn array_mut<'a>(root: &'a mut Value, path: &FieldPath) -> Result<&'a mut Vec<Value>, PathError> {
    let slot = if path.is_empty() {
        root
    } else {
        slot_mut(root, path)?
    };
    if !slot.is_array() {
        *slot = Value::Array(normalize_to_array(Some(&*slot)));
    }
    match slot {
        Value::Array(items) => Ok(items),
        other => Err(PathError::NotAnArray {
            path: path.to_string(),
            found: kind_name(other),
        }),
    }
}

/// Walk to the slot addressed by `path`, creating missing object levels.
/// Keys coerce a non-object level into an object; indices coerce a
/// non-array level into an array (object values in key order) but never
/// extend it.
fn slot_mut<'a>(root: &'a mut Value, path: &FieldPath) -> Result<&'a mut Value, PathError> {
    let mut current = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = match segment {
            PathSegment::Key(key) => {
                if !current.is_object() {
                    *current = Value::Object(Map::new());
                }
                match current {
                    Value::Object(map) => map.entry(key.clone()).or_insert(Value::Null),
                    _ => unreachable!("slot coerced to an object above"),
                }
            }
            PathSegment::Index(index) => {
                if !current.is_array() {
                    *current = Value::Array(normalize_to_array(Some(&*current)));
                }
                let prefix: FieldPath = path.segments()[..depth].iter().cloned().collect();
                match current {
                    Value::Array(items) => {
                        let len = items.len();
                        items.get_mut(*index).ok_or(PathError::IndexOutOfRange {
                            path: prefix.to_string(),
                            index: *index,
                            len,
                        })?
                    }
                    other => {
                        return Err(PathError::NotAnArray {
                            path: prefix.to_string(),
                            found: kind_name(other),
                        });
                    }
                }
            }
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_creates_missing_object_levels() {
        let root = json!({"name": "Ada"});
        let next = set_at(&root, &FieldPath::parse("address.city"), json!("Oslo")).unwrap();
        assert_eq!(next, json!({"name": "Ada", "address": {"city": "Oslo"}}));
        assert_eq!(root, json!({"name": "Ada"}));
    }

    #[test]
    fn set_inside_array_item_keeps_siblings() {
        let root = json!({"links": [{"label": "a", "value": "1"}, {"label": "b", "value": "2"}]});
        let next = set_at(&root, &FieldPath::parse("links[1].value"), json!("3")).unwrap();
        assert_eq!(
            next,
            json!({"links": [{"label": "a", "value": "1"}, {"label": "b", "value": "3"}]})
        );
    }

    #[test]
    fn index_past_end_is_an_error() {
        let root = json!({"links": []});
        let err = set_at(&root, &FieldPath::parse("links[0].value"), json!("x")).unwrap_err();
        assert_eq!(
            err,
            PathError::IndexOutOfRange {
                path: "links".into(),
                index: 0,
                len: 0
            }
        );
    }

    #[test]
    fn object_shaped_arrays_are_coerced_before_indexing() {
        let root = json!({"links": {"x": {"value": "1"}, "y": {"value": "2"}}});
        let next = set_at(&root, &FieldPath::parse("links[1].value"), json!("9")).unwrap();
        assert_eq!(next["links"], json!([{"value": "1"}, {"value": "9"}]));
    }

    #[test]
    fn push_and_remove() {
        let root = json!({"tags": [{"value": "a"}]});
        let pushed = push_at(&root, &FieldPath::parse("tags"), json!({"value": "b"})).unwrap();
        assert_eq!(array_len(&pushed, &FieldPath::parse("tags")), 2);
        let removed = remove_at(&pushed, &FieldPath::parse("tags"), 0).unwrap();
        assert_eq!(removed["tags"], json!([{"value": "b"}]));
        assert!(remove_at(&removed, &FieldPath::parse("tags"), 3).is_err());
    }

    #[test]
    fn draft_remove_handles_keys_and_indices() {
        let draft = FormDraft::new(json!({"a": 1, "b": {"c": 2, "d": 3}, "list": [1, 2, 3]}));
        let without_c = draft.remove(&FieldPath::parse("b.c")).unwrap();
        assert_eq!(without_c.value()["b"], json!({"d": 3}));
        let without_item = draft.remove(&FieldPath::parse("list.1")).unwrap();
        assert_eq!(without_item.value()["list"], json!([1, 3]));
        assert_eq!(draft.remove(&FieldPath::root()), Err(PathError::Empty));
        assert!(draft.remove(&FieldPath::parse("b.zz")).is_err());
        assert_eq!(draft.get(&FieldPath::parse("b.d")), Some(&json!(3)));
    }

    #[test]
    fn push_creates_missing_array() {
        let next = push_at(&json!({}), &FieldPath::parse("tags"), json!({"value": ""})).unwrap();
        assert_eq!(next, json!({"tags": [{"value": ""}]}));
    }
}
