use serde_json::json;

use crate::schema::FieldDefinition;

pub(super) fn definitions() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::scalar("name", "text")
            .with_label("Name")
            .with_display("placeholder", json!("Enter a name"))
            .with_validation("maxLength", json!(120)),
        FieldDefinition::scalar("description", "textarea")
            .with_label("Description")
            .with_display("placeholder", json!("Describe it"))
            .with_validation("maxLength", json!(2000)),
        FieldDefinition::scalar("email", "email")
            .with_label("Email")
            .with_display("placeholder", json!("name@example.com"))
            .with_validation("pattern", json!(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")),
        FieldDefinition::scalar("phone", "phone")
            .with_label("Phone")
            .with_display("placeholder", json!("+1 555 0100"))
            .with_validation("pattern", json!(r"^\+?[0-9 ()-]{5,}$")),
        FieldDefinition::scalar("link", "link")
            .with_label("Link")
            .with_display("placeholder", json!("https://")),
        FieldDefinition::scalar("date", "date")
            .with_label("Date")
            .with_display("placeholder", json!("YYYY-MM-DD")),
        FieldDefinition::scalar("time", "time")
            .with_label("Time")
            .with_display("placeholder", json!("HH:MM")),
        FieldDefinition::scalar("currency", "currency")
            .with_label("Price")
            .with_input_config("currency", json!("USD"))
            .with_validation("min", json!(0)),
        FieldDefinition::scalar("number", "number")
            .with_label("Number"),
        FieldDefinition::scalar("image", "image").with_label("Image"),
        FieldDefinition::scalar("video", "video").with_label("Video"),
        FieldDefinition::scalar("status", "select")
            .with_label("Status")
            .with_default(json!("draft"))
            .with_input_config("options", json!(["draft", "published", "archived"])),
        FieldDefinition::object(
            "address",
            vec![
                FieldDefinition::scalar("street", "text"),
                FieldDefinition::scalar("city", "text"),
                FieldDefinition::scalar("postalCode", "text"),
                FieldDefinition::scalar("country", "text"),
            ],
        )
        .with_label("Address"),
        FieldDefinition::array(
            "links",
            vec![
                FieldDefinition::scalar("label", "text").with_default(json!("")),
                FieldDefinition::scalar("value", "link").with_default(json!("")),
            ],
        )
        .with_label("Links"),
        FieldDefinition::array(
            "reference",
            vec![
                FieldDefinition::scalar("id", "text"),
                FieldDefinition::scalar("name", "text"),
            ],
        )
        .with_label("Linked records")
        .with_input_config("recordType", json!("")),
        FieldDefinition::array(
            "options",
            vec![
                FieldDefinition::scalar("label", "text").with_default(json!("")),
                FieldDefinition::scalar("value", "text").with_default(json!("")),
            ],
        )
        .with_label("Options"),
        FieldDefinition::array(
            "tags",
            vec![FieldDefinition::scalar("value", "text").with_default(json!(""))],
        )
        .with_label("Tags"),
    ]
}
