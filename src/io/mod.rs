//! Reading and writing catalogs, declarations and records.

mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{
    load_catalog, load_declarations, parse_document_auto, parse_document_str, read_document,
};
pub use output::{OutputDestination, OutputOptions, emit, emit_text};
