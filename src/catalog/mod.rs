//! Keyed collection of reusable base field templates.

mod builtin;

use indexmap::IndexMap;

use crate::schema::FieldDefinition;

/// Immutable set of base templates, keyed by the template's `field` and kept
/// in load order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCatalog {
    entries: IndexMap<String, FieldDefinition>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Templates shared by typical business record types (contacts,
    /// services, appointments, products, announcements).
    pub fn builtin() -> Self {
        Self::from_definitions(builtin::definitions())
    }

    /// Later definitions replace earlier ones that share a key, keeping the
    /// original position.
    pub fn from_definitions(definitions: impl IntoIterator<Item = FieldDefinition>) -> Self {
        let mut catalog = Self::new();
        catalog.extend(definitions);
        catalog
    }

    pub fn extend(&mut self, definitions: impl IntoIterator<Item = FieldDefinition>) {
        for definition in definitions {
            self.entries.insert(definition.field.clone(), definition);
        }
    }

    pub fn with(mut self, definition: FieldDefinition) -> Self {
        self.entries.insert(definition.field.clone(), definition);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldDefinition> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<FieldDefinition> for FieldCatalog {
    fn from_iter<T: IntoIterator<Item = FieldDefinition>>(iter: T) -> Self {
        Self::from_definitions(iter)
    }
}
