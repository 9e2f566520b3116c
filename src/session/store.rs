use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::PersistenceError;

use super::SessionContext;

/// External persistence for whole records. Each call is all-or-nothing and
/// the caller decides whether to retry.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record and return it as stored (with its id).
    async fn create(
        &self,
        record: &Value,
        type_name: &str,
        ctx: &SessionContext,
    ) -> Result<Value, PersistenceError>;

    async fn update(&self, id: &str, record: &Value, ctx: &SessionContext) -> Result<Value, PersistenceError>;

    async fn remove(&self, id: &str, ctx: &SessionContext) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone, PartialEq)]
struct StoredRecord {
    type_name: String,
    record: Value,
}

/// Process-local store keyed by generated `rec-N` ids.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<IndexMap<String, StoredRecord>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Value> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(id).map(|stored| stored.record.clone()))
    }

    pub fn type_of(&self, id: &str) -> Option<String> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(id).map(|stored| stored.type_name.clone()))
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_records<T>(
        &self,
        f: impl FnOnce(&mut IndexMap<String, StoredRecord>) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| PersistenceError::Io("memory store lock poisoned".into()))?;
        f(&mut records)
    }
}

fn with_id(record: &Value, id: &str) -> Value {
    let mut record = record.clone();
    if let Value::Object(map) = &mut record {
        map.insert("id".into(), Value::String(id.to_string()));
    }
    record
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(
        &self,
        record: &Value,
        type_name: &str,
        _ctx: &SessionContext,
    ) -> Result<Value, PersistenceError> {
        if !record.is_object() {
            return Err(PersistenceError::Rejected {
                message: "records must be JSON objects".into(),
            });
        }
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let stored = with_id(record, &id);
        self.with_records(|records| {
            records.insert(
                id,
                StoredRecord {
                    type_name: type_name.to_string(),
                    record: stored.clone(),
                },
            );
            Ok(stored)
        })
    }

    async fn update(&self, id: &str, record: &Value, _ctx: &SessionContext) -> Result<Value, PersistenceError> {
        let stored = with_id(record, id);
        self.with_records(|records| match records.get_mut(id) {
            Some(existing) => {
                existing.record = stored.clone();
                Ok(stored)
            }
            None => Err(PersistenceError::NotFound { id: id.to_string() }),
        })
    }

    async fn remove(&self, id: &str, _ctx: &SessionContext) -> Result<(), PersistenceError> {
        self.with_records(|records| match records.shift_remove(id) {
            Some(_) => Ok(()),
            None => Err(PersistenceError::NotFound { id: id.to_string() }),
        })
    }
}
