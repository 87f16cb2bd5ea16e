//! Declared field types
//!
//! The codec consults a [`SchemaLookup`] for every record field it writes or
//! reads. A declared type wins over the inferred one.

use docrec_types::{Document, TypeTag};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Source of declared field types
pub trait SchemaLookup {
    /// Declared type of `field` on `document`, if the schema has one
    fn declared_type(&self, document: &Document, field: &str) -> Option<TypeTag>;
}

impl<F> SchemaLookup for F
where
    F: Fn(&Document, &str) -> Option<TypeTag>,
{
    fn declared_type(&self, document: &Document, field: &str) -> Option<TypeTag> {
        self(document, field)
    }
}

/// Schema that declares nothing; every field type is inferred
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSchema;

impl SchemaLookup for NoSchema {
    fn declared_type(&self, _document: &Document, _field: &str) -> Option<TypeTag> {
        None
    }
}

/// Declared types keyed by class name, then field name
///
/// Serializes as a nested JSON object:
///
/// ```json
/// { "Person": { "age": "INTEGER", "tags": "EMBEDDEDSET" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaMap {
    classes: IndexMap<String, IndexMap<String, TypeTag>>,
}

impl SchemaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the type of a field, replacing any earlier declaration
    pub fn declare(&mut self, class: impl Into<String>, field: impl Into<String>, tag: TypeTag) {
        self.classes
            .entry(class.into())
            .or_default()
            .insert(field.into(), tag);
    }

    /// Builder form of [`declare`](Self::declare)
    pub fn with_field(
        mut self,
        class: impl Into<String>,
        field: impl Into<String>,
        tag: TypeTag,
    ) -> Self {
        self.declare(class, field, tag);
        self
    }

    pub fn fields_of(&self, class: &str) -> Option<&IndexMap<String, TypeTag>> {
        self.classes.get(class)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl SchemaLookup for SchemaMap {
    fn declared_type(&self, document: &Document, field: &str) -> Option<TypeTag> {
        self.fields_of(document.class_name()?)?.get(field).copied()
    }
}
