use serde_json::Value;

use crate::error::PathError;

use super::actions::FormMutation;
use super::state::FormStateStore;

impl FormStateStore {
    /// Apply one mutation. Failures (an index past the end, a full array)
    /// are logged and leave the draft as it was.
    pub fn apply(&self, mutation: &FormMutation) -> Self {
        match mutation {
            FormMutation::AddArrayElement { path } => self.add_element_at(path),
            FormMutation::RemoveArrayElement { path, index } => self.remove_element_at(path, *index),
            other => self.set_at(&other.target(), written_value(other)),
        }
    }

    pub fn try_apply(&self, mutation: &FormMutation) -> Result<Self, PathError> {
        match mutation {
            FormMutation::AddArrayElement { path } => self.try_add_element_at(path),
            FormMutation::RemoveArrayElement { path, index } => {
                self.try_remove_element_at(path, *index)
            }
            other => self.try_set_at(&other.target(), written_value(other)),
        }
    }

    /// Apply mutations in order, stopping at the first failure.
    pub fn try_apply_all<'a>(
        &self,
        mutations: impl IntoIterator<Item = &'a FormMutation>,
    ) -> Result<Self, PathError> {
        mutations
            .into_iter()
            .try_fold(self.clone(), |store, mutation| store.try_apply(mutation))
    }
}

fn written_value(mutation: &FormMutation) -> Value {
    match mutation {
        FormMutation::SetScalar { value, .. }
        | FormMutation::SetObjectKey { value, .. }
        | FormMutation::SetArrayElementKey { value, .. }
        | FormMutation::SetAt { value, .. } => value.clone(),
        FormMutation::AddArrayElement { .. } | FormMutation::RemoveArrayElement { .. } => Value::Null,
    }
}
