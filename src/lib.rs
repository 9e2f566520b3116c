#![deny(rust_2018_idioms)]

//! Generic record schema composition and mode-aware record rendering.
//!
//! Applications describe record types as ordered lists of
//! [`AppFieldDeclaration`]s against a shared [`FieldCatalog`]. The
//! [`SchemaComposer`] resolves those into [`FieldDefinition`]s, a
//! [`FormStateStore`] holds the draft of one record, and the
//! [`RecursiveFieldRenderer`] turns definitions plus a record into a
//! [`RenderNode`] tree for `add`, `edit` or `read` mode.

pub mod catalog;
pub mod compose;
pub mod error;
pub mod form;
pub mod io;
pub mod options;
pub mod path;
pub mod presentation;
pub mod render;
pub mod schema;
pub mod session;
pub mod summary;
pub mod validation;
pub mod value;

pub use catalog::FieldCatalog;
pub use compose::{Alias, Composition, RecordTypeRegistry, SchemaComposer, resolve};
pub use error::{Diagnostic, PathError, PersistenceError, RecordUiError, Result};
pub use form::{FormMutation, FormStateStore, Mode};
pub use options::EngineOptions;
pub use path::{FieldPath, PathSegment};
pub use render::{CapabilityRegistry, RecursiveFieldRenderer, RenderNode, RenderedForm};
pub use schema::{AppFieldDeclaration, FieldDefinition, FieldKind, FieldPatch};
pub use session::{EditSession, MemoryStore, RecordStore, SessionContext};
pub use value::{normalize_to_array, normalize_to_object};

pub mod prelude {
    pub use super::{
        AppFieldDeclaration, EngineOptions, FieldCatalog, FieldDefinition, FieldPath, FormMutation,
        FormStateStore, Mode, RecursiveFieldRenderer, SchemaComposer,
    };
}
