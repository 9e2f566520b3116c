use ratatui::text::{Line, Span};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::error::Diagnostic;
use crate::options::EngineOptions;
use crate::render::{EditorView, LeafContent, LeafNode, RenderNode, RenderedForm};

use super::Theme;

const INDENT: usize = 2;
const MIN_VALUE_WIDTH: usize = 8;

/// Lines for one node with the default affordance labels.
pub fn render_lines(node: &RenderNode, theme: &Theme, width: u16) -> Vec<Line<'static>> {
    let options = EngineOptions::default();
    let mut writer = LineWriter::new(theme, &options, width);
    writer.node(node, 0, label_width(std::slice::from_ref(node)));
    writer.lines
}

/// Lines for a whole form, top-level leaf labels aligned in one column.
pub fn render_form(
    form: &RenderedForm,
    theme: &Theme,
    options: &EngineOptions,
    width: u16,
) -> Vec<Line<'static>> {
    let mut writer = LineWriter::new(theme, options, width);
    writer.siblings(&form.nodes, 0);
    writer.lines
}

pub fn diagnostic_lines(diagnostics: &[Diagnostic], theme: &Theme) -> Vec<Line<'static>> {
    diagnostics
        .iter()
        .map(|diagnostic| {
            Line::from(vec![
                Span::styled("warning: ", theme.warning),
                Span::styled(diagnostic.to_string(), theme.hint),
            ])
        })
        .collect()
}

/// Flatten styled lines into plain text, one line per row.
pub fn to_plain_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
            text.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn label_width(nodes: &[RenderNode]) -> usize {
    nodes
        .iter()
        .filter_map(|node| match node {
            RenderNode::Leaf(leaf) => Some(UnicodeWidthStr::width(leaf.label.as_str())),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

struct LineWriter<'a> {
    theme: &'a Theme,
    options: &'a EngineOptions,
    width: usize,
    lines: Vec<Line<'static>>,
}

impl<'a> LineWriter<'a> {
    fn new(theme: &'a Theme, options: &'a EngineOptions, width: u16) -> Self {
        Self {
            theme,
            options,
            width: width as usize,
            lines: Vec::new(),
        }
    }

    fn siblings(&mut self, nodes: &[RenderNode], depth: usize) {
        let column = label_width(nodes);
        for node in nodes {
            self.node(node, depth, column);
        }
    }

    fn node(&mut self, node: &RenderNode, depth: usize, column: usize) {
        match node {
            RenderNode::Leaf(leaf) => self.leaf(leaf, depth, column),
            RenderNode::Object(object) => {
                self.heading(&object.label, depth);
                self.siblings(&object.children, depth + 1);
            }
            RenderNode::EmptyState(empty) => {
                self.lines.push(Line::from(vec![
                    Span::raw(indent(depth)),
                    Span::styled(format!("{}: ", empty.label), self.theme.label),
                    Span::styled(empty.message.clone(), self.theme.empty_state),
                ]));
            }
            RenderNode::Array(array) => {
                self.heading(&array.label, depth);
                for item in &array.items {
                    let mut spans = vec![
                        Span::raw(indent(depth + 1)),
                        Span::styled(format!("#{}", item.index + 1), self.theme.hint),
                    ];
                    if item.remove.is_some() {
                        spans.push(Span::raw(" "));
                        spans.push(Span::styled(
                            format!("[- {}]", self.options.remove_item_label),
                            self.theme.affordance,
                        ));
                    }
                    self.lines.push(Line::from(spans));
                    self.siblings(&item.children, depth + 2);
                }
                if array.items.is_empty() {
                    self.lines.push(Line::from(vec![
                        Span::raw(indent(depth + 1)),
                        Span::styled(self.options.empty_list_text.to_string(), self.theme.empty_state),
                    ]));
                }
                if array.add.is_some() {
                    self.lines.push(Line::from(vec![
                        Span::raw(indent(depth + 1)),
                        Span::styled(
                            format!("[+ {}]", self.options.add_item_label),
                            self.theme.affordance,
                        ),
                    ]));
                }
            }
        }
    }

    fn heading(&mut self, label: &str, depth: usize) {
        self.lines.push(Line::from(vec![
            Span::raw(indent(depth)),
            Span::styled(format!("{label}:"), self.theme.label),
        ]));
    }

    fn leaf(&mut self, leaf: &LeafNode, depth: usize, column: usize) {
        let label_width = UnicodeWidthStr::width(leaf.label.as_str());
        let padded = format!("{}{}", leaf.label, " ".repeat(column.saturating_sub(label_width)));
        let prefix = indent(depth);
        let prefix_width = prefix.len() + column.max(label_width) + 2;
        let available = self.width.saturating_sub(prefix_width).max(MIN_VALUE_WIDTH);

        let (text, style, trailer) = match &leaf.content {
            LeafContent::Static { text, empty } => {
                let style = if *empty {
                    self.theme.placeholder
                } else {
                    self.theme.value
                };
                (text.clone(), style, None)
            }
            LeafContent::Editor(view) => self.editor_text(view),
        };

        let mut wrapped: Vec<String> = wrap(&text, available)
            .into_iter()
            .map(|segment| segment.into_owned())
            .collect();
        if wrapped.is_empty() {
            wrapped.push(String::new());
        }

        for (row, segment) in wrapped.into_iter().enumerate() {
            let mut spans = if row == 0 {
                vec![
                    Span::raw(prefix.clone()),
                    Span::styled(padded.clone(), self.theme.label),
                    Span::raw("  "),
                ]
            } else {
                vec![Span::raw(" ".repeat(prefix_width))]
            };
            spans.push(Span::styled(segment, style));
            self.lines.push(Line::from(spans));
        }
        if let Some(trailer) = trailer {
            self.lines.push(Line::from(vec![
                Span::raw(" ".repeat(prefix_width)),
                Span::styled(trailer, self.theme.hint),
            ]));
        }
    }

    fn editor_text(&self, view: &EditorView) -> (String, ratatui::style::Style, Option<String>) {
        let (text, style) = match (&view.text, &view.placeholder) {
            (text, Some(placeholder)) if text.is_empty() => (placeholder.clone(), self.theme.placeholder),
            (text, _) => (text.clone(), self.theme.editor),
        };
        let mut notes = Vec::new();
        if !view.choices.is_empty() {
            notes.push(view.choices.join(" | "));
        }
        if let Some(hint) = &view.hint {
            notes.push(hint.clone());
        }
        let trailer = (!notes.is_empty()).then(|| format!("({})", notes.join("; ")));
        (format!("[{text}]"), style, trailer)
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(depth * INDENT)
}
