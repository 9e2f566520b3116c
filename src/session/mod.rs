//! Lifecycle of one record-editing session and the persistence contract it
//! saves through.

mod store;

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::error::PersistenceError;
use crate::form::{FormMutation, FormStateStore, Mode};
use crate::schema::{FieldDefinition, value_to_string};

pub use store::{MemoryStore, RecordStore};

/// Caller identity passed through to persistence. The engine never reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub user_id: Option<String>,
    pub attributes: IndexMap<String, String>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// What [`EditSession::cancel`] did with the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// An add session ended; nothing was persisted.
    Discarded,
    /// An edit session went back to reading the last saved record.
    Reverted,
    /// Already read-only, nothing to cancel.
    Unchanged,
}

/// One live draft plus the identity of the record it edits.
#[derive(Debug, Clone)]
pub struct EditSession {
    type_name: String,
    record_id: Option<String>,
    state: FormStateStore,
}

impl EditSession {
    /// Start creating a new record; every field takes its default.
    pub fn create(fields: impl Into<Arc<[FieldDefinition]>>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        debug!(%type_name, "new add session");
        Self {
            type_name,
            record_id: None,
            state: FormStateStore::new(fields, Mode::Add, None),
        }
    }

    /// View an existing record. When `id` is `None` the record's own `id`
    /// key is used.
    pub fn open(
        fields: impl Into<Arc<[FieldDefinition]>>,
        type_name: impl Into<String>,
        id: Option<String>,
        record: &Value,
    ) -> Self {
        let record_id = id.or_else(|| record_id_of(record));
        Self {
            type_name: type_name.into(),
            record_id,
            state: FormStateStore::new(fields, Mode::Read, Some(record)),
        }
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn state(&self) -> &FormStateStore {
        &self.state
    }

    pub fn draft(&self) -> &Value {
        self.state.draft()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// Switch a read session to editing. Returns `false` when the session was
    /// already editable.
    pub fn begin_edit(&mut self) -> bool {
        if self.mode() != Mode::Read {
            return false;
        }
        debug!(type_name = %self.type_name, id = ?self.record_id, "begin edit");
        self.state = self.state.with_mode(Mode::Edit);
        true
    }

    /// Apply a mutation to the draft. Read sessions ignore mutations.
    pub fn apply(&mut self, mutation: &FormMutation) -> bool {
        if !self.mode().is_editable() {
            debug!(type_name = %self.type_name, ?mutation, "mutation ignored in read mode");
            return false;
        }
        self.state = self.state.apply(mutation);
        true
    }

    /// Drop the draft without writing anything.
    pub fn cancel(&mut self) -> CancelOutcome {
        match self.mode() {
            Mode::Add => {
                self.state = self.state.reset();
                CancelOutcome::Discarded
            }
            Mode::Edit => {
                self.state = self.state.reset().with_mode(Mode::Read);
                CancelOutcome::Reverted
            }
            Mode::Read => CancelOutcome::Unchanged,
        }
    }

    /// Persist the draft: `create` in add mode, `update` in edit mode. On
    /// success the stored record becomes the baseline and the session reads
    /// it; on failure the draft is left exactly as it was.
    pub async fn save<S>(&mut self, store: &S, ctx: &SessionContext) -> Result<&Value, PersistenceError>
    where
        S: RecordStore + ?Sized,
    {
        let saved = match self.mode() {
            Mode::Read => return Ok(self.state.draft()),
            Mode::Add => {
                store
                    .create(self.state.draft(), &self.type_name, ctx)
                    .await?
            }
            Mode::Edit => {
                let id = self.record_id.as_deref().ok_or(PersistenceError::MissingId)?;
                store.update(id, self.state.draft(), ctx).await?
            }
        };
        if let Some(id) = record_id_of(&saved) {
            self.record_id = Some(id);
        }
        debug!(type_name = %self.type_name, id = ?self.record_id, "record saved");
        self.state = self.state.rebase(&saved).with_mode(Mode::Read);
        Ok(self.state.draft())
    }

    /// Remove the persisted record. Sessions without an id cannot delete.
    pub async fn delete<S>(&self, store: &S, ctx: &SessionContext) -> Result<(), PersistenceError>
    where
        S: RecordStore + ?Sized,
    {
        let id = self.record_id.as_deref().ok_or(PersistenceError::MissingId)?;
        store.remove(id, ctx).await?;
        debug!(type_name = %self.type_name, %id, "record deleted");
        Ok(())
    }
}

fn record_id_of(record: &Value) -> Option<String> {
    record
        .get("id")
        .map(value_to_string)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use serde_json::json;

    use crate::path::FieldPath;

    struct RejectingStore;

    #[async_trait]
    impl RecordStore for RejectingStore {
        async fn create(&self, _: &Value, _: &str, _: &SessionContext) -> Result<Value, PersistenceError> {
            Err(PersistenceError::Rejected {
                message: "offline".into(),
            })
        }

        async fn update(&self, _: &str, _: &Value, _: &SessionContext) -> Result<Value, PersistenceError> {
            Err(PersistenceError::Rejected {
                message: "offline".into(),
            })
        }

        async fn remove(&self, _: &str, _: &SessionContext) -> Result<(), PersistenceError> {
            Err(PersistenceError::Rejected {
                message: "offline".into(),
            })
        }
    }

    fn fields() -> Vec<FieldDefinition> {
        vec![FieldDefinition::scalar("name", "text")]
    }

    fn rename(value: &str) -> FormMutation {
        FormMutation::set(&FieldPath::parse("name"), json!(value))
    }

    #[test]
    fn add_session_saves_then_reads() {
        let store = MemoryStore::new();
        let ctx = SessionContext::new("u1");
        let mut session = EditSession::create(fields(), "contact");
        assert!(session.apply(&rename("Ada")));
        let saved = block_on(session.save(&store, &ctx)).unwrap().clone();
        assert_eq!(saved, json!({"name": "Ada", "id": "rec-1"}));
        assert_eq!(session.mode(), Mode::Read);
        assert_eq!(session.record_id(), Some("rec-1"));
        assert!(!session.is_dirty());
        assert!(!session.apply(&rename("ignored")));
    }

    #[test]
    fn failed_save_keeps_draft_for_retry() {
        let mut session = EditSession::open(fields(), "contact", None, &json!({"id": "7", "name": "Ada"}));
        assert!(session.begin_edit());
        session.apply(&rename("Grace"));
        let err = block_on(session.save(&RejectingStore, &SessionContext::default())).unwrap_err();
        assert!(matches!(err, PersistenceError::Rejected { .. }));
        assert_eq!(session.mode(), Mode::Edit);
        assert_eq!(session.draft()["name"], json!("Grace"));
        assert!(session.is_dirty());
    }

    #[test]
    fn edit_save_updates_existing_record() {
        let store = MemoryStore::new();
        let ctx = SessionContext::default();
        let created = block_on(store.create(&json!({"name": "Ada"}), "contact", &ctx)).unwrap();
        let mut session = EditSession::open(fields(), "contact", None, &created);
        session.begin_edit();
        session.apply(&rename("Grace"));
        block_on(session.save(&store, &ctx)).unwrap();
        assert_eq!(store.get("rec-1").unwrap()["name"], json!("Grace"));
        block_on(session.delete(&store, &ctx)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn cancel_discards_without_writing() {
        let mut add = EditSession::create(fields(), "contact");
        add.apply(&rename("Ada"));
        assert_eq!(add.cancel(), CancelOutcome::Discarded);
        assert_eq!(add.draft()["name"], json!(""));

        let mut edit = EditSession::open(fields(), "contact", Some("1".into()), &json!({"name": "Ada"}));
        edit.begin_edit();
        edit.apply(&rename("Grace"));
        assert_eq!(edit.cancel(), CancelOutcome::Reverted);
        assert_eq!(edit.mode(), Mode::Read);
        assert_eq!(edit.draft()["name"], json!("Ada"));
    }

    #[test]
    fn delete_requires_an_id() {
        let session = EditSession::create(fields(), "contact");
        let err = block_on(session.delete(&MemoryStore::new(), &SessionContext::default())).unwrap_err();
        assert_eq!(err, PersistenceError::MissingId);
    }
}
