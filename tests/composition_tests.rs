use recordui::compose::sort_by_display_order;
use recordui::{
    AppFieldDeclaration, FieldCatalog, FieldDefinition, FieldPatch, RecordTypeRegistry,
    SchemaComposer, resolve,
};
use serde_json::json;
use std::sync::Arc;

fn name_catalog() -> FieldCatalog {
    FieldCatalog::from_definitions([FieldDefinition::scalar("name", "text")
        .with_label("Name")
        .with_validation("maxLength", json!(80))])
}

#[test]
fn one_base_key_backs_two_independent_fields() {
    let catalog = name_catalog();
    let declarations = vec![
        AppFieldDeclaration::renamed("name", "firstName"),
        AppFieldDeclaration::renamed("name", "lastName"),
    ];
    let fields = SchemaComposer::new(&catalog).compose(&declarations);

    let keys: Vec<_> = fields.iter().map(|def| def.field.as_str()).collect();
    assert_eq!(keys, ["firstName", "lastName"]);
    for def in &fields {
        assert_eq!(def.validations.get("maxLength"), Some(&json!(80)));
        assert_eq!(def.kind.input(), Some("text"));
        assert_eq!(def.default_value, None);
    }
    // the catalog template itself is untouched
    assert_eq!(catalog.get("name").map(|def| def.field.as_str()), Some("name"));
}

#[test]
fn resolved_output_key_prefers_the_override() {
    let base = FieldDefinition::scalar("email", "email");
    let cases = [
        (None, "email"),
        (Some(FieldPatch::default()), "email"),
        (Some(FieldPatch::renamed("workEmail")), "workEmail"),
    ];
    for (patch, expected) in cases {
        assert_eq!(resolve(&base, patch.as_ref()).field, expected);
    }
}

#[test]
fn resolving_without_override_is_identity() {
    for base in FieldCatalog::builtin().iter() {
        assert_eq!(&resolve(base, None), base);
    }
}

#[test]
fn override_metadata_merges_key_by_key() {
    let base = FieldDefinition::scalar("phone", "phone")
        .with_display("placeholder", json!("+1"))
        .with_validation("pattern", json!("^[0-9]+$"))
        .with_validation("maxLength", json!(20));
    let patch: FieldPatch = serde_json::from_value(json!({
        "display": {"order": 2},
        "validations": {"pattern": null, "maxLength": 12}
    }))
    .unwrap();
    let resolved = resolve(&base, Some(&patch));
    assert_eq!(resolved.placeholder(), Some("+1"));
    assert_eq!(resolved.display_order(), 2.0);
    assert_eq!(resolved.validations.get("pattern"), Some(&json!("^[0-9]+$")));
    assert_eq!(resolved.validations.get("maxLength"), Some(&json!(12)));
}

#[test]
fn display_order_sort_is_stable() {
    let fields = vec![
        FieldDefinition::scalar("c", "text").with_display("order", json!(3)),
        FieldDefinition::scalar("a", "text").with_display("order", json!(1)),
        FieldDefinition::scalar("b", "text").with_display("order", json!(2)),
        FieldDefinition::scalar("first", "text"),
        FieldDefinition::scalar("second", "text"),
        FieldDefinition::scalar("a2", "text").with_display("order", json!(1)),
    ];
    let sorted: Vec<_> = sort_by_display_order(&fields)
        .into_iter()
        .map(|def| def.field.as_str())
        .collect();
    assert_eq!(sorted, ["first", "second", "a", "a2", "b", "c"]);
}

#[test]
fn unknown_base_keys_are_reported_not_rejected() {
    let catalog = name_catalog();
    let declarations: Vec<AppFieldDeclaration> = serde_json::from_value(json!([
        {"field": "name"},
        {"field": "nickname", "override": {"label": "Nickname"}}
    ]))
    .unwrap();
    let composition = SchemaComposer::new(&catalog).compose_report(&declarations);
    assert_eq!(composition.fields.len(), 2);
    assert_eq!(composition.missing_keys(), ["nickname"]);
    assert_eq!(composition.fields[1].display_label(), "Nickname");
    assert!(composition.into_strict().is_err());
}

#[test]
fn registry_shares_one_catalog_across_record_types() {
    let mut registry = RecordTypeRegistry::new(Arc::new(FieldCatalog::builtin()));
    registry
        .register_document("contact", &json!(["name", "email", "phone"]))
        .unwrap();
    registry
        .register_document("product", &json!({"fields": ["name", "currency", "tags"]}))
        .unwrap();

    let contact = registry.fields("contact").unwrap();
    let product = registry.fields("product").unwrap();
    assert_eq!(contact.len(), 3);
    assert_eq!(product[1].field, "currency");
    assert!(registry.diagnostics().is_empty());
}
