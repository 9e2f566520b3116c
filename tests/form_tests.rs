use recordui::render::{LeafContent, RenderNode};
use recordui::{
    Diagnostic, FieldDefinition, FieldPath, FormMutation, FormStateStore, Mode,
    RecursiveFieldRenderer, normalize_to_array,
};
use serde_json::{Value, json};

fn value_items() -> Vec<FieldDefinition> {
    vec![FieldDefinition::scalar("value", "text").with_default(json!(""))]
}

#[test]
fn normalize_to_array_table() {
    let cases = [
        (None, json!([])),
        (Some(json!(null)), json!([])),
        (Some(json!([1, 2])), json!([1, 2])),
        (Some(json!({"a": 1, "b": 2})), json!([1, 2])),
        (Some(json!("x")), json!([])),
    ];
    for (input, expected) in cases {
        assert_eq!(Value::Array(normalize_to_array(input.as_ref())), expected);
    }
}

#[test]
fn add_mode_prepopulates_min_items() {
    let fields = vec![FieldDefinition::array("phones", value_items()).with_item_bounds(Some(1), None)];
    let store = FormStateStore::new(fields, Mode::Add, None);
    assert_eq!(store.draft()["phones"], json!([{"value": ""}]));
}

#[test]
fn add_array_element_appends_defaulted_item() {
    let fields = vec![FieldDefinition::array("tags", value_items())];
    let store = FormStateStore::new(fields, Mode::Edit, Some(&json!({"tags": [{"value": "a"}]})));
    let next = store.add_array_element("tags");
    assert_eq!(next.draft()["tags"], json!([{"value": "a"}, {"value": ""}]));
    assert_eq!(store.draft()["tags"], json!([{"value": "a"}]));
}

#[test]
fn remove_array_element_preserves_the_rest() {
    let fields = vec![FieldDefinition::array("tags", value_items())];
    let items: Vec<Value> = (0..5).map(|n| json!({"value": n.to_string()})).collect();
    let store = FormStateStore::new(fields, Mode::Edit, Some(&json!({"tags": items.clone()})));

    for removed in 0..items.len() {
        let next = store.remove_array_element("tags", removed);
        let expected: Vec<Value> = items
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != removed)
            .map(|(_, item)| item.clone())
            .collect();
        assert_eq!(next.draft()["tags"], Value::Array(expected));
    }
}

#[test]
fn set_object_key_keeps_siblings() {
    let fields = vec![FieldDefinition::object(
        "obj",
        vec![
            FieldDefinition::scalar("a", "number"),
            FieldDefinition::scalar("b", "number"),
        ],
    )];
    let store = FormStateStore::new(fields, Mode::Edit, Some(&json!({"obj": {"a": 1, "b": 2}})));
    let next = store.set_object_key("obj", "b", json!(3));
    assert_eq!(next.draft()["obj"], json!({"a": 1, "b": 3}));
}

#[test]
fn mutations_from_render_nodes_drive_the_store() {
    let fields = vec![FieldDefinition::array(
        "links",
        vec![
            FieldDefinition::scalar("label", "text").with_default(json!("")),
            FieldDefinition::scalar("value", "link").with_default(json!("")),
        ],
    )];
    let renderer = RecursiveFieldRenderer::default();
    let store = FormStateStore::new(fields, Mode::Add, None);

    let form = renderer.render_store(&store);
    let Some(RenderNode::Array(links)) = form.find(&FieldPath::parse("links")) else {
        panic!("links should render as an array");
    };
    let store = store.apply(links.add.as_ref().unwrap());

    let form = renderer.render_store(&store);
    let Some(RenderNode::Leaf(leaf)) = form.find(&FieldPath::parse("links[0].value")) else {
        panic!("new item should render its value leaf");
    };
    let change = leaf.editor().unwrap().on_change_text.on_change_text(json!("https://example.com"));
    assert!(matches!(change, FormMutation::SetArrayElementKey { index: 0, .. }));
    let store = store.apply(&change);

    assert_eq!(
        store.draft()["links"],
        json!([{"label": "", "value": "https://example.com"}])
    );
    assert!(store.is_dirty());
}

#[test]
fn null_object_renders_empty_leaves_in_edit_mode() {
    let fields = vec![FieldDefinition::object(
        "address",
        vec![
            FieldDefinition::scalar("street", "text"),
            FieldDefinition::scalar("city", "text"),
        ],
    )];
    let form = RecursiveFieldRenderer::default().render_record(
        &fields,
        &json!({"address": null}),
        Mode::Edit,
    );
    assert!(form.is_clean());
    let leaves = form.leaves();
    assert_eq!(leaves.len(), 2);
    assert!(leaves.iter().all(|leaf| leaf.text().is_empty()));
}

#[test]
fn unmapped_input_falls_back_to_text_in_every_mode() {
    let fields = vec![FieldDefinition::scalar("gizmo", "exoticWidget")];
    let record = json!({"gizmo": "spinning"});
    let renderer = RecursiveFieldRenderer::default();

    for mode in [Mode::Read, Mode::Edit, Mode::Add] {
        let form = renderer.render_record(&fields, &record, mode);
        assert!(matches!(
            form.diagnostics.as_slice(),
            [Diagnostic::UnmappedCapability { input, .. }] if input == "exoticWidget"
        ));
        let leaves = form.leaves();
        assert_eq!(leaves[0].text(), "spinning");
        match (&leaves[0].content, mode) {
            (LeafContent::Static { empty, .. }, Mode::Read) => assert!(!empty),
            (LeafContent::Editor(view), Mode::Edit | Mode::Add) => assert_eq!(view.widget, "text"),
            (content, mode) => panic!("unexpected {content:?} in {mode}"),
        }
    }
}

#[test]
fn scalar_stored_where_array_is_declared_is_coerced() {
    let fields = vec![FieldDefinition::array("tags", value_items())];
    let form = RecursiveFieldRenderer::default().render_record(&fields, &json!({"tags": 7}), Mode::Edit);
    assert!(matches!(
        form.diagnostics.as_slice(),
        [Diagnostic::ShapeMismatch { expected: "array", found: "number", .. }]
    ));
    let Some(RenderNode::Array(tags)) = form.find(&FieldPath::parse("tags")) else {
        panic!("tags should still render as an array");
    };
    assert!(tags.items.is_empty());
    assert!(tags.add.is_some());
}
