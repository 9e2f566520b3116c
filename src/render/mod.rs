//! Mode-aware rendering of a record against its field definitions.

mod capabilities;
mod node;
mod registry;
mod renderer;

pub use capabilities::{NumberCapability, SelectCapability, TextCapability, ToggleCapability};
pub use node::{
    ArrayItemNode, ArrayNode, EmptyStateNode, LeafContent, LeafNode, ObjectNode, RenderNode,
};
pub use registry::{
    Capability, CapabilityRegistry, ChangeHandle, EditorView, LeafProps, RendererRegistry,
};
pub use renderer::{RecursiveFieldRenderer, RenderedForm};

pub use crate::form::Mode;
