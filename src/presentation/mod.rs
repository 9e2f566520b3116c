//! Terminal presentation of rendered forms.

mod lines;
mod theme;

pub use lines::{diagnostic_lines, render_form, render_lines, to_plain_text};
pub use theme::Theme;
