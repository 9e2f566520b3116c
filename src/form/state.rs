use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::error::PathError;
use crate::path::{FieldPath, PathSegment};
use crate::schema::{FieldDefinition, FieldKind};

use super::Mode;
use super::defaults::{default_item, default_record, fill_defaults};
use super::draft::FormDraft;

/// Draft of one record plus the baseline it started from.
///
/// Every mutation returns a new store; the receiver is left as it was, so a
/// caller can keep the previous state around (for example to retry a failed
/// save).
#[derive(Debug, Clone)]
pub struct FormStateStore {
    fields: Arc<[FieldDefinition]>,
    mode: Mode,
    baseline: Value,
    draft: FormDraft,
}

impl FormStateStore {
    /// Seed a store. In add mode (or without a record) every field takes its
    /// default; otherwise the record is loaded and missing fields defaulted.
    pub fn new(
        fields: impl Into<Arc<[FieldDefinition]>>,
        mode: Mode,
        initial: Option<&Value>,
    ) -> Self {
        let fields = fields.into();
        let draft = match initial {
            None => default_record(&fields),
            Some(record) => fill_defaults(&fields, record),
        };
        Self {
            fields,
            mode,
            baseline: draft.clone(),
            draft: FormDraft::new(draft),
        }
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn shared_fields(&self) -> Arc<[FieldDefinition]> {
        Arc::clone(&self.fields)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn draft(&self) -> &Value {
        self.draft.value()
    }

    pub fn baseline(&self) -> &Value {
        &self.baseline
    }

    pub fn into_draft(self) -> Value {
        self.draft.into_value()
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.value() != &self.baseline
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        self.draft.get(path)
    }

    pub fn definition_at(&self, path: &FieldPath) -> Option<&FieldDefinition> {
        definition_at(&self.fields, path)
    }

    pub fn with_mode(&self, mode: Mode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    /// Adopt `record` as both baseline and draft (after a successful save).
    pub fn rebase(&self, record: &Value) -> Self {
        let draft = fill_defaults(&self.fields, record);
        Self {
            fields: Arc::clone(&self.fields),
            mode: self.mode,
            baseline: draft.clone(),
            draft: FormDraft::new(draft),
        }
    }

    /// Throw away edits and return to the baseline.
    pub fn reset(&self) -> Self {
        Self {
            draft: FormDraft::new(self.baseline.clone()),
            ..self.clone()
        }
    }

    pub fn set_scalar(&self, key: &str, value: Value) -> Self {
        self.set_at(&FieldPath::root().key(key), value)
    }

    pub fn set_object_key(&self, parent: &str, child: &str, value: Value) -> Self {
        self.set_at(&FieldPath::root().key(parent).key(child), value)
    }

    pub fn set_array_element_key(&self, parent: &str, index: usize, child: &str, value: Value) -> Self {
        self.set_at(&FieldPath::root().key(parent).index(index).key(child), value)
    }

    pub fn add_array_element(&self, parent: &str) -> Self {
        self.add_element_at(&FieldPath::root().key(parent))
    }

    pub fn remove_array_element(&self, parent: &str, index: usize) -> Self {
        self.remove_element_at(&FieldPath::root().key(parent), index)
    }

    pub fn set_at(&self, path: &FieldPath, value: Value) -> Self {
        self.try_set_at(path, value)
            .unwrap_or_else(|err| self.unchanged("set", path, err))
    }

    pub fn add_element_at(&self, path: &FieldPath) -> Self {
        self.try_add_element_at(path)
            .unwrap_or_else(|err| self.unchanged("add item", path, err))
    }

    pub fn remove_element_at(&self, path: &FieldPath, index: usize) -> Self {
        self.try_remove_element_at(path, index)
            .unwrap_or_else(|err| self.unchanged("remove item", path, err))
    }

    pub fn try_set_at(&self, path: &FieldPath, value: Value) -> Result<Self, PathError> {
        let draft = self.draft.set(path, value)?;
        Ok(self.with_draft(draft))
    }

    /// Append one item defaulted from the array's item definitions.
    pub fn try_add_element_at(&self, path: &FieldPath) -> Result<Self, PathError> {
        let config = self
            .definition_at(path)
            .and_then(|definition| definition.kind.array_config())
            .ok_or_else(|| PathError::UnknownField {
                path: path.to_string(),
            })?;
        if let Some(max) = config.max_items
            && self.draft.len_at(path) >= max
        {
            return Err(PathError::MaxItemsReached {
                path: path.to_string(),
                max,
            });
        }
        let draft = self.draft.push(path, default_item(config))?;
        Ok(self.with_draft(draft))
    }

    pub fn try_remove_element_at(&self, path: &FieldPath, index: usize) -> Result<Self, PathError> {
        let draft = self.draft.remove(&path.index(index))?;
        Ok(self.with_draft(draft))
    }

    fn with_draft(&self, draft: FormDraft) -> Self {
        Self {
            fields: Arc::clone(&self.fields),
            mode: self.mode,
            baseline: self.baseline.clone(),
            draft,
        }
    }

    fn unchanged(&self, action: &str, path: &FieldPath, err: PathError) -> Self {
        warn!(%path, %action, error = %err, "draft mutation ignored");
        self.clone()
    }
}

/// Definition addressed by `path`, walking object members and array items.
/// A path ending on an array index names an item, which has no definition of
/// its own.
pub fn definition_at<'a>(
    fields: &'a [FieldDefinition],
    path: &FieldPath,
) -> Option<&'a FieldDefinition> {
    let mut scope: &[FieldDefinition] = fields;
    let mut current: Option<&FieldDefinition> = None;
    for segment in path.segments() {
        match segment {
            PathSegment::Key(key) => {
                let definition = scope.iter().find(|candidate| &candidate.field == key)?;
                scope = match &definition.kind {
                    FieldKind::Object(members) => members,
                    _ => &[],
                };
                current = Some(definition);
            }
            PathSegment::Index(_) => {
                scope = &current?.kind.array_config()?.object;
                current = None;
            }
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::scalar("name", "text"),
            FieldDefinition::object(
                "obj",
                vec![
                    FieldDefinition::scalar("a", "number"),
                    FieldDefinition::scalar("b", "number"),
                ],
            ),
            FieldDefinition::array(
                "phones",
                vec![FieldDefinition::scalar("value", "phone").with_default(json!(""))],
            )
            .with_item_bounds(None, Some(2)),
        ]
    }

    fn store(record: Value) -> FormStateStore {
        FormStateStore::new(fields(), Mode::Edit, Some(&record))
    }

    #[test]
    fn add_mode_derives_defaults() {
        let store = FormStateStore::new(fields(), Mode::Add, None);
        assert_eq!(
            store.draft(),
            &json!({"name": "", "obj": {"a": "", "b": ""}, "phones": []})
        );
        assert!(!store.is_dirty());
    }

    #[test]
    fn set_object_key_keeps_siblings() {
        let before = store(json!({"obj": {"a": 1, "b": 2}}));
        let after = before.set_object_key("obj", "b", json!(3));
        assert_eq!(after.draft()["obj"], json!({"a": 1, "b": 3}));
        assert_eq!(before.draft()["obj"], json!({"a": 1, "b": 2}));
        assert!(after.is_dirty());
    }

    #[test]
    fn set_array_element_key_touches_one_item() {
        let before = store(json!({"phones": [{"value": "1", "kind": "work"}, {"value": "2"}]}));
        let after = before.set_array_element_key("phones", 0, "value", json!("9"));
        assert_eq!(
            after.draft()["phones"],
            json!([{"value": "9", "kind": "work"}, {"value": "2"}])
        );
    }

    #[test]
    fn add_appends_defaulted_item_until_max() {
        let empty = store(json!({"phones": []}));
        let one = empty.add_array_element("phones");
        assert_eq!(one.draft()["phones"], json!([{"value": ""}]));
        let two = one.add_array_element("phones");
        let capped = two.add_array_element("phones");
        assert_eq!(capped.draft()["phones"].as_array().map(Vec::len), Some(2));
        assert!(matches!(
            two.try_add_element_at(&FieldPath::parse("phones")),
            Err(PathError::MaxItemsReached { max: 2, .. })
        ));
    }

    #[test]
    fn remove_keeps_relative_order() {
        let before = store(json!({"phones": [{"value": "a"}, {"value": "b"}, {"value": "c"}]}));
        let after = before.remove_array_element("phones", 1);
        assert_eq!(after.draft()["phones"], json!([{"value": "a"}, {"value": "c"}]));
        let ignored = after.remove_array_element("phones", 7);
        assert_eq!(ignored.draft(), after.draft());
    }

    #[test]
    fn definition_lookup_walks_nested_shapes() {
        let fields = fields();
        assert_eq!(
            definition_at(&fields, &FieldPath::parse("phones[0].value")).map(|d| d.field.as_str()),
            Some("value")
        );
        assert_eq!(
            definition_at(&fields, &FieldPath::parse("obj.b")).map(|d| d.field.as_str()),
            Some("b")
        );
        assert!(definition_at(&fields, &FieldPath::parse("phones[0]")).is_none());
        assert!(definition_at(&fields, &FieldPath::parse("missing")).is_none());
    }

    #[test]
    fn rebase_and_reset() {
        let edited = store(json!({"name": "Ada"})).set_scalar("name", json!("Grace"));
        assert_eq!(edited.reset().draft()["name"], json!("Ada"));
        let saved = edited.rebase(&json!({"id": "1", "name": "Grace"}));
        assert!(!saved.is_dirty());
        assert_eq!(saved.baseline()["id"], json!("1"));
    }
}
