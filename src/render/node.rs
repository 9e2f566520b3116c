use crate::form::FormMutation;
use crate::path::FieldPath;

use super::registry::EditorView;

/// Output of the recursive renderer: a tree mirroring the definitions.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Leaf(LeafNode),
    Array(ArrayNode),
    /// Read-mode array with no items.
    EmptyState(EmptyStateNode),
    Object(ObjectNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub field: String,
    pub label: String,
    pub path: FieldPath,
    pub input: String,
    pub content: LeafContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeafContent {
    /// Read mode. `empty` is set when `text` is the empty placeholder.
    Static { text: String, empty: bool },
    Editor(EditorView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub field: String,
    pub label: String,
    pub path: FieldPath,
    pub items: Vec<ArrayItemNode>,
    pub add: Option<FormMutation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItemNode {
    pub index: usize,
    pub path: FieldPath,
    pub children: Vec<RenderNode>,
    pub remove: Option<FormMutation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStateNode {
    pub field: String,
    pub label: String,
    pub path: FieldPath,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub field: String,
    pub label: String,
    pub path: FieldPath,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn field(&self) -> &str {
        match self {
            RenderNode::Leaf(node) => &node.field,
            RenderNode::Array(node) => &node.field,
            RenderNode::EmptyState(node) => &node.field,
            RenderNode::Object(node) => &node.field,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RenderNode::Leaf(node) => &node.label,
            RenderNode::Array(node) => &node.label,
            RenderNode::EmptyState(node) => &node.label,
            RenderNode::Object(node) => &node.label,
        }
    }

    pub fn path(&self) -> &FieldPath {
        match self {
            RenderNode::Leaf(node) => &node.path,
            RenderNode::Array(node) => &node.path,
            RenderNode::EmptyState(node) => &node.path,
            RenderNode::Object(node) => &node.path,
        }
    }

    /// Every leaf below (and including) this node, depth first.
    pub fn leaves(&self) -> Vec<&LeafNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafNode>) {
        match self {
            RenderNode::Leaf(leaf) => out.push(leaf),
            RenderNode::Array(array) => {
                for item in &array.items {
                    for child in &item.children {
                        child.collect_leaves(out);
                    }
                }
            }
            RenderNode::Object(object) => {
                for child in &object.children {
                    child.collect_leaves(out);
                }
            }
            RenderNode::EmptyState(_) => {}
        }
    }

    /// The node rendered for `path`, if any.
    pub fn find(&self, path: &FieldPath) -> Option<&RenderNode> {
        if self.path() == path {
            return Some(self);
        }
        let mut children: Box<dyn Iterator<Item = &RenderNode> + '_> = match self {
            RenderNode::Array(array) => {
                Box::new(array.items.iter().flat_map(|item| item.children.iter()))
            }
            RenderNode::Object(object) => Box::new(object.children.iter()),
            RenderNode::Leaf(_) | RenderNode::EmptyState(_) => return None,
        };
        children.find_map(|child| child.find(path))
    }
}

impl LeafNode {
    pub fn editor(&self) -> Option<&EditorView> {
        match &self.content {
            LeafContent::Editor(view) => Some(view),
            LeafContent::Static { .. } => None,
        }
    }

    /// Text shown for this leaf in either mode.
    pub fn text(&self) -> &str {
        match &self.content {
            LeafContent::Static { text, .. } => text,
            LeafContent::Editor(view) => &view.text,
        }
    }
}
