use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::catalog::FieldCatalog;
use crate::error::Diagnostic;
use crate::schema::{AppFieldDeclaration, FieldDefinition};

use super::SchemaComposer;

/// Composes each record type once and shares the resolved definitions.
#[derive(Debug, Clone)]
pub struct RecordTypeRegistry {
    catalog: Arc<FieldCatalog>,
    types: IndexMap<String, Arc<[FieldDefinition]>>,
    diagnostics: Vec<Diagnostic>,
}

impl RecordTypeRegistry {
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        Self {
            catalog,
            types: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Compose `declarations` for `type_name`, replacing any earlier
    /// registration under the same name.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        declarations: &[AppFieldDeclaration],
    ) -> Arc<[FieldDefinition]> {
        let composition = SchemaComposer::new(&self.catalog).compose_report(declarations);
        self.diagnostics.extend(composition.diagnostics);
        let fields: Arc<[FieldDefinition]> = composition.fields.into();
        self.types.insert(type_name.into(), Arc::clone(&fields));
        fields
    }

    /// Like [`register`](Self::register), reading the declarations from a
    /// parsed document (a list or `{ "fields": [...] }`).
    pub fn register_document(
        &mut self,
        type_name: impl Into<String>,
        document: &Value,
    ) -> crate::Result<Arc<[FieldDefinition]>> {
        let declarations = crate::io::load_declarations(document)?;
        Ok(self.register(type_name, &declarations))
    }

    pub fn fields(&self, type_name: &str) -> Option<Arc<[FieldDefinition]>> {
        self.types.get(type_name).cloned()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
