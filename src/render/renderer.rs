use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::compose::sort_by_display_order;
use crate::error::Diagnostic;
use crate::form::{FormMutation, FormStateStore, Mode};
use crate::options::EngineOptions;
use crate::path::FieldPath;
use crate::schema::{ArrayConfig, FieldDefinition, FieldKind, is_empty_value};
use crate::value::{coerce_array, coerce_object};

use super::capabilities::TextCapability;
use super::node::{
    ArrayItemNode, ArrayNode, EmptyStateNode, LeafContent, LeafNode, ObjectNode, RenderNode,
};
use super::registry::{Capability, CapabilityRegistry, ChangeHandle, LeafProps, RendererRegistry};

/// Rendered top-level nodes plus every degradation recovered on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedForm {
    pub nodes: Vec<RenderNode>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderedForm {
    pub fn find(&self, path: &FieldPath) -> Option<&RenderNode> {
        self.nodes.iter().find_map(|node| node.find(path))
    }

    pub fn leaves(&self) -> Vec<&LeafNode> {
        self.nodes.iter().flat_map(RenderNode::leaves).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The nodes, or the first recorded degradation as an error.
    pub fn into_strict(self) -> crate::Result<Vec<RenderNode>> {
        match self.diagnostics.first() {
            Some(diagnostic) => Err(diagnostic.into()),
            None => Ok(self.nodes),
        }
    }
}

/// Walks definitions against a record, dispatching leaves to capabilities and
/// recursing into arrays and objects. Never fails: bad shapes are coerced and
/// unknown inputs fall back to text, each reported as a [`Diagnostic`].
#[derive(Clone)]
pub struct RecursiveFieldRenderer {
    registry: Arc<dyn RendererRegistry>,
    options: EngineOptions,
}

impl Default for RecursiveFieldRenderer {
    fn default() -> Self {
        Self::new(Arc::new(CapabilityRegistry::with_builtins()))
    }
}

impl RecursiveFieldRenderer {
    pub fn new(registry: Arc<dyn RendererRegistry>) -> Self {
        Self {
            registry,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Capability for `input`, or `None` when the registry has no entry.
    pub fn capability(&self, input: &str) -> Option<Arc<dyn Capability>> {
        self.registry.lookup(input)
    }

    /// The capability unmapped inputs use: the registry entry for the
    /// configured fallback input, else plain text.
    pub fn fallback_capability(&self) -> Arc<dyn Capability> {
        self.registry
            .lookup(&self.options.fallback_input)
            .unwrap_or_else(|| Arc::new(TextCapability::new(self.options.fallback_input.clone())))
    }

    pub fn render_store(&self, store: &FormStateStore) -> RenderedForm {
        self.render_record(store.fields(), store.draft(), store.mode())
    }

    pub fn render_record(&self, fields: &[FieldDefinition], record: &Value, mode: Mode) -> RenderedForm {
        let mut diagnostics = Vec::new();
        let root = FieldPath::root();
        let record = self.object_value(Some(record), &root, &mut diagnostics);
        let nodes = self
            .ordered(fields)
            .into_iter()
            .map(|definition| {
                self.render_field(
                    definition,
                    record.get(&definition.field),
                    mode,
                    &root.key(definition.field.as_str()),
                    &mut diagnostics,
                )
            })
            .collect();
        RenderedForm { nodes, diagnostics }
    }

    /// Render one definition found at `path`.
    pub fn render_field(
        &self,
        definition: &FieldDefinition,
        value: Option<&Value>,
        mode: Mode,
        path: &FieldPath,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> RenderNode {
        match &definition.kind {
            FieldKind::Array(config) => {
                self.render_array(definition, config, value, mode, path, diagnostics)
            }
            FieldKind::Object(members) => {
                let object = self.object_value(value, path, diagnostics);
                let children = self.render_children(members, &object, mode, path, diagnostics);
                RenderNode::Object(ObjectNode {
                    field: definition.field.clone(),
                    label: definition.display_label(),
                    path: path.clone(),
                    children,
                })
            }
            FieldKind::Scalar { input } => {
                let input = input.as_deref().unwrap_or(&self.options.fallback_input);
                self.render_leaf(definition, input, value, mode, path, diagnostics)
            }
        }
    }

    fn render_array(
        &self,
        definition: &FieldDefinition,
        config: &ArrayConfig,
        value: Option<&Value>,
        mode: Mode,
        path: &FieldPath,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> RenderNode {
        let coerced = coerce_array(value);
        if let Some(found) = coerced.mismatch {
            report_shape(path, "array", found, diagnostics);
        }
        let items = coerced.value;
        let label = definition.display_label();

        if items.is_empty() && !mode.is_editable() {
            return RenderNode::EmptyState(EmptyStateNode {
                field: definition.field.clone(),
                label,
                path: path.clone(),
                message: self.options.empty_list_text.to_string(),
            });
        }

        let removable = mode.is_editable() && items.len() > config.min_items.unwrap_or(0);
        let addable = mode.is_editable()
            && config.max_items.is_none_or(|max| items.len() < max);

        let items = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let item_path = path.index(index);
                let object = self.object_value(Some(item), &item_path, diagnostics);
                ArrayItemNode {
                    index,
                    children: self.render_children(&config.object, &object, mode, &item_path, diagnostics),
                    path: item_path,
                    remove: removable.then(|| FormMutation::RemoveArrayElement {
                        path: path.clone(),
                        index,
                    }),
                }
            })
            .collect();

        RenderNode::Array(ArrayNode {
            field: definition.field.clone(),
            label,
            path: path.clone(),
            items,
            add: addable.then(|| FormMutation::AddArrayElement { path: path.clone() }),
        })
    }

    fn render_children(
        &self,
        members: &[FieldDefinition],
        object: &serde_json::Map<String, Value>,
        mode: Mode,
        path: &FieldPath,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<RenderNode> {
        self.ordered(members)
            .into_iter()
            .map(|member| {
                self.render_field(
                    member,
                    object.get(&member.field),
                    mode,
                    &path.key(member.field.as_str()),
                    diagnostics,
                )
            })
            .collect()
    }

    fn render_leaf(
        &self,
        definition: &FieldDefinition,
        input: &str,
        value: Option<&Value>,
        mode: Mode,
        path: &FieldPath,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> RenderNode {
        let capability = match self.capability(input) {
            Some(capability) => capability,
            None => {
                warn!(%path, input, "no capability registered for input; falling back to text");
                diagnostics.push(Diagnostic::UnmappedCapability {
                    path: path.clone(),
                    input: input.to_string(),
                });
                self.fallback_capability()
            }
        };
        let label = definition.display_label();

        let content = if mode.is_editable() {
            let null = Value::Null;
            let props = LeafProps {
                value: value.unwrap_or(&null),
                on_change_text: ChangeHandle::new(path.clone()),
                mode,
                label: label.clone(),
                placeholder: definition.placeholder(),
                options: definition.options(),
                input_config: &definition.input_config,
            };
            LeafContent::Editor(capability.render(props))
        } else {
            match value.filter(|value| !is_empty_value(value)) {
                Some(value) => {
                    let text = capability.display(value, &definition.input_config);
                    if text.is_empty() {
                        self.placeholder_content()
                    } else {
                        LeafContent::Static { text, empty: false }
                    }
                }
                None => self.placeholder_content(),
            }
        };

        RenderNode::Leaf(LeafNode {
            field: definition.field.clone(),
            label,
            path: path.clone(),
            input: input.to_string(),
            content,
        })
    }

    fn placeholder_content(&self) -> LeafContent {
        LeafContent::Static {
            text: self.options.empty_placeholder.to_string(),
            empty: true,
        }
    }

    fn object_value(
        &self,
        value: Option<&Value>,
        path: &FieldPath,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> serde_json::Map<String, Value> {
        let coerced = coerce_object(value);
        if let Some(found) = coerced.mismatch {
            report_shape(path, "object", found, diagnostics);
        }
        coerced.value
    }

    fn ordered<'a>(&self, fields: &'a [FieldDefinition]) -> Vec<&'a FieldDefinition> {
        if self.options.sort_by_display_order {
            sort_by_display_order(fields)
        } else {
            fields.iter().collect()
        }
    }
}

fn report_shape(
    path: &FieldPath,
    expected: &'static str,
    found: &'static str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    warn!(%path, expected, found, "stored value has the wrong shape; coerced");
    diagnostics.push(Diagnostic::ShapeMismatch {
        path: path.clone(),
        expected,
        found,
    });
}
