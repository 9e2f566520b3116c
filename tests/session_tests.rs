use futures::executor::block_on;
use recordui::session::CancelOutcome;
use recordui::{
    EditSession, FieldCatalog, FieldPath, FormMutation, MemoryStore, Mode, PersistenceError,
    RecordStore, RecordTypeRegistry, SessionContext,
};
use serde_json::json;
use std::sync::Arc;

fn contact_fields() -> Arc<[recordui::FieldDefinition]> {
    let mut registry = RecordTypeRegistry::new(Arc::new(FieldCatalog::builtin()));
    registry
        .register_document(
            "contact",
            &json!([
                {"field": "name", "override": {"field": "firstName"}},
                {"field": "name", "override": {"field": "lastName"}},
                "email",
                "links"
            ]),
        )
        .unwrap()
}

#[test]
fn create_edit_and_delete_round_trip() {
    let store = MemoryStore::new();
    let ctx = SessionContext::new("user-1").with_attribute("tenant", "acme");

    let mut session = EditSession::create(contact_fields(), "contact");
    assert_eq!(session.mode(), Mode::Add);
    session.apply(&FormMutation::set(&FieldPath::parse("firstName"), json!("Ada")));
    session.apply(&FormMutation::AddArrayElement {
        path: FieldPath::parse("links"),
    });

    let saved = block_on(session.save(&store, &ctx)).unwrap().clone();
    let id = session.record_id().unwrap().to_string();
    assert_eq!(saved["id"], json!(id));
    assert_eq!(saved["links"], json!([{"label": "", "value": ""}]));
    assert_eq!(session.mode(), Mode::Read);
    assert!(!session.is_dirty());

    assert!(session.begin_edit());
    session.apply(&FormMutation::set(&FieldPath::parse("lastName"), json!("Lovelace")));
    block_on(session.save(&store, &ctx)).unwrap();
    assert_eq!(store.get(&id).unwrap()["lastName"], json!("Lovelace"));

    block_on(session.delete(&store, &ctx)).unwrap();
    assert!(store.is_empty());
}

#[test]
fn cancelling_an_edit_restores_the_saved_record() {
    let record = json!({"id": "c-9", "firstName": "Grace", "email": "grace@example.com"});
    let mut session = EditSession::open(contact_fields(), "contact", None, &record);
    assert_eq!(session.record_id(), Some("c-9"));
    assert!(!session.apply(&FormMutation::set(&FieldPath::parse("email"), json!("x"))));

    session.begin_edit();
    session.apply(&FormMutation::set(&FieldPath::parse("email"), json!("x")));
    assert!(session.is_dirty());
    assert_eq!(session.cancel(), CancelOutcome::Reverted);
    assert_eq!(session.draft()["email"], json!("grace@example.com"));
    assert_eq!(session.mode(), Mode::Read);
}

#[test]
fn failed_update_keeps_the_draft() {
    let store = MemoryStore::new();
    let ctx = SessionContext::new("user-1");
    let record = json!({"id": "missing", "firstName": "Ada"});
    let mut session = EditSession::open(contact_fields(), "contact", None, &record);
    session.begin_edit();
    session.apply(&FormMutation::set(&FieldPath::parse("firstName"), json!("Augusta")));

    let err = block_on(session.save(&store, &ctx)).unwrap_err();
    assert!(matches!(err, PersistenceError::NotFound { ref id } if id == "missing"));
    assert_eq!(session.mode(), Mode::Edit);
    assert_eq!(session.draft()["firstName"], json!("Augusta"));
}

#[test]
fn store_is_usable_as_a_trait_object() {
    let store: Box<dyn RecordStore> = Box::new(MemoryStore::new());
    let ctx = SessionContext::new("user-2");
    let created = block_on(store.create(&json!({"name": "Widget"}), "product", &ctx)).unwrap();
    assert!(created["id"].is_string());
    let rejected = block_on(store.create(&json!("nope"), "product", &ctx));
    assert!(matches!(rejected, Err(PersistenceError::Rejected { .. })));
}
