use std::borrow::Cow;

/// Knobs shared by the renderer, the presentation layer and summary lines.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub empty_placeholder: Cow<'static, str>,
    pub empty_list_text: Cow<'static, str>,
    pub fallback_input: Cow<'static, str>,
    pub add_item_label: Cow<'static, str>,
    pub remove_item_label: Cow<'static, str>,
    pub summary_skip_fields: Vec<String>,
    pub sort_by_display_order: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            empty_placeholder: Cow::Borrowed("—"),
            empty_list_text: Cow::Borrowed("No items"),
            fallback_input: Cow::Borrowed("text"),
            add_item_label: Cow::Borrowed("Add item"),
            remove_item_label: Cow::Borrowed("Remove"),
            summary_skip_fields: vec!["firstName".to_string(), "lastName".to_string()],
            sort_by_display_order: true,
        }
    }
}

impl EngineOptions {
    pub fn with_empty_placeholder(mut self, placeholder: impl Into<Cow<'static, str>>) -> Self {
        self.empty_placeholder = placeholder.into();
        self
    }

    pub fn with_empty_list_text(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.empty_list_text = text.into();
        self
    }

    pub fn with_fallback_input(mut self, input: impl Into<Cow<'static, str>>) -> Self {
        self.fallback_input = input.into();
        self
    }

    pub fn with_add_item_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.add_item_label = label.into();
        self
    }

    pub fn with_remove_item_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.remove_item_label = label.into();
        self
    }

    pub fn with_summary_skip_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.summary_skip_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_display_order_sorting(mut self, enabled: bool) -> Self {
        self.sort_by_display_order = enabled;
        self
    }

    pub fn skips_in_summary(&self, field: &str) -> bool {
        self.summary_skip_fields.iter().any(|skip| skip == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let options = EngineOptions::default()
            .with_empty_placeholder("(empty)")
            .with_summary_skip_fields(["brand"])
            .with_display_order_sorting(false);
        assert_eq!(options.empty_placeholder, "(empty)");
        assert!(options.skips_in_summary("brand"));
        assert!(!options.skips_in_summary("firstName"));
        assert!(!options.sort_by_display_order);
        assert_eq!(EngineOptions::default().fallback_input, "text");
    }
}
