use serde_json::Value;

use crate::path::{FieldPath, PathSegment};

/// A single edit to a record draft.
///
/// The first three variants are the shapes today's forms produce (top-level
/// leaf, object member, array item member); `SetAt` covers any deeper path.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMutation {
    SetScalar {
        key: String,
        value: Value,
    },
    SetObjectKey {
        parent: String,
        child: String,
        value: Value,
    },
    SetArrayElementKey {
        parent: String,
        index: usize,
        child: String,
        value: Value,
    },
    SetAt {
        path: FieldPath,
        value: Value,
    },
    AddArrayElement {
        path: FieldPath,
    },
    RemoveArrayElement {
        path: FieldPath,
        index: usize,
    },
}

impl FormMutation {
    /// Replace the value at `path`, using the narrowest named variant that
    /// fits the path's shape.
    pub fn set(path: &FieldPath, value: Value) -> Self {
        match path.segments() {
            [PathSegment::Key(key)] => FormMutation::SetScalar {
                key: key.clone(),
                value,
            },
            [PathSegment::Key(parent), PathSegment::Key(child)] => FormMutation::SetObjectKey {
                parent: parent.clone(),
                child: child.clone(),
                value,
            },
            [
                PathSegment::Key(parent),
                PathSegment::Index(index),
                PathSegment::Key(child),
            ] => FormMutation::SetArrayElementKey {
                parent: parent.clone(),
                index: *index,
                child: child.clone(),
                value,
            },
            _ => FormMutation::SetAt {
                path: path.clone(),
                value,
            },
        }
    }

    /// Path of the slot this mutation writes to.
    pub fn target(&self) -> FieldPath {
        match self {
            FormMutation::SetScalar { key, .. } => FieldPath::root().key(key.as_str()),
            FormMutation::SetObjectKey { parent, child, .. } => {
                FieldPath::root().key(parent.as_str()).key(child.as_str())
            }
            FormMutation::SetArrayElementKey {
                parent,
                index,
                child,
                ..
            } => FieldPath::root()
                .key(parent.as_str())
                .index(*index)
                .key(child.as_str()),
            FormMutation::SetAt { path, .. } => path.clone(),
            FormMutation::AddArrayElement { path } => path.clone(),
            FormMutation::RemoveArrayElement { path, index } => path.index(*index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_picks_variant_by_path_shape() {
        assert!(matches!(
            FormMutation::set(&FieldPath::parse("name"), json!("x")),
            FormMutation::SetScalar { ref key, .. } if key == "name"
        ));
        assert!(matches!(
            FormMutation::set(&FieldPath::parse("address.city"), json!("x")),
            FormMutation::SetObjectKey { ref parent, ref child, .. } if parent == "address" && child == "city"
        ));
        assert!(matches!(
            FormMutation::set(&FieldPath::parse("links[2].label"), json!("x")),
            FormMutation::SetArrayElementKey { index: 2, .. }
        ));
        assert!(matches!(
            FormMutation::set(&FieldPath::parse("a.b[0].c.d"), json!("x")),
            FormMutation::SetAt { .. }
        ));
    }

    #[test]
    fn target_round_trips_through_set() {
        let path = FieldPath::parse("links[2].label");
        assert_eq!(FormMutation::set(&path, json!(1)).target(), path);
    }
}
