use recordui::presentation::{Theme, render_form, to_plain_text};
use recordui::{EngineOptions, FieldDefinition, Mode, RecursiveFieldRenderer};
use serde_json::json;

fn links() -> FieldDefinition {
    FieldDefinition::array(
        "links",
        vec![FieldDefinition::scalar("value", "link").with_default(json!(""))],
    )
    .with_label("Links")
    .with_item_bounds(Some(1), Some(2))
}

fn render(record: serde_json::Value, mode: Mode, options: EngineOptions) -> String {
    let renderer = RecursiveFieldRenderer::default().with_options(options.clone());
    let form = renderer.render_record(&[links()], &record, mode);
    to_plain_text(&render_form(&form, &Theme::plain(), &options, 60))
}

#[test]
fn edit_mode_shows_affordances_within_bounds() {
    let one = render(json!({"links": [{"value": "a"}]}), Mode::Edit, EngineOptions::default());
    assert!(one.contains("[+ Add item]"));
    assert!(!one.contains("[- Remove]"));

    let two = render(
        json!({"links": [{"value": "a"}, {"value": "b"}]}),
        Mode::Edit,
        EngineOptions::default(),
    );
    assert!(!two.contains("[+ Add item]"));
    assert_eq!(two.matches("[- Remove]").count(), 2);
}

#[test]
fn read_mode_uses_configured_empty_state() {
    let options = EngineOptions::default().with_empty_list_text("Nothing yet");
    let text = render(json!({"links": []}), Mode::Read, options);
    assert_eq!(text, "Links: Nothing yet");
}

#[test]
fn long_values_wrap_under_the_value_column() {
    let fields = [FieldDefinition::scalar("bio", "textarea").with_label("Bio")];
    let record = json!({"bio": "one two three four five six seven eight nine ten"});
    let form = RecursiveFieldRenderer::default().render_record(&fields, &record, Mode::Read);
    let text = to_plain_text(&render_form(&form, &Theme::plain(), &EngineOptions::default(), 20));
    let rows: Vec<&str> = text.lines().collect();
    assert!(rows.len() > 1);
    assert!(rows[0].starts_with("Bio  one"));
    assert!(rows[1..].iter().all(|row| row.starts_with("     ")));
}
