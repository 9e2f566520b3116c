use ratatui::style::{Color, Modifier, Style};

/// Styles used when turning render nodes into terminal lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub label: Style,
    pub value: Style,
    pub placeholder: Style,
    pub empty_state: Style,
    pub affordance: Style,
    pub editor: Style,
    pub hint: Style,
    pub warning: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            label: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            value: Style::default().fg(Color::White),
            placeholder: Style::default().fg(Color::DarkGray),
            empty_state: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            affordance: Style::default().fg(Color::Yellow),
            editor: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            hint: Style::default().fg(Color::DarkGray),
            warning: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}

impl Theme {
    /// No colours or modifiers, for piping into files.
    pub fn plain() -> Self {
        let plain = Style::default();
        Self {
            label: plain,
            value: plain,
            placeholder: plain,
            empty_state: plain,
            affordance: plain,
            editor: plain,
            hint: plain,
            warning: plain,
        }
    }
}
