//! Schema Registry
//!
//! Flat, insertion-ordered mapping from schema id to schema document.

use std::collections::HashMap;

use crate::schema::SchemaDocument;

/// Default namespace prefixed to ids when schemas are handed to the
/// validation engine. `$ref: "/todo"` resolves against it to the document
/// registered under `todo`.
pub const DEFAULT_NAMESPACE: &str = "json-schema:///";

/// Id-keyed schema storage
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Ids in first-registration order
    order: Vec<String>,
    schemas: HashMap<String, SchemaDocument>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under its own id
    ///
    /// Returns the document previously registered under the same id, if any.
    /// An overwritten id keeps its original position.
    pub fn register(&mut self, schema: SchemaDocument) -> Option<SchemaDocument> {
        let id = schema.id().to_string();
        let previous = self.schemas.insert(id.clone(), schema);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    /// Get a document by id
    pub fn get(&self, id: &str) -> Option<&SchemaDocument> {
        self.schemas.get(id)
    }

    /// Whether an id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    /// Registered ids, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Registered documents, in registration order
    pub fn iter(&self) -> impl Iterator<Item = &SchemaDocument> {
        self.order.iter().filter_map(|id| self.schemas.get(id))
    }

    /// Documents paired with their namespaced identifier
    pub fn namespaced<'a>(
        &'a self,
        namespace: &'a str,
    ) -> impl Iterator<Item = (String, &'a SchemaDocument)> + 'a {
        self.iter().map(move |doc| (namespaced_id(namespace, doc.id()), doc))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Join a namespace and a schema id, avoiding a doubled `/`
pub fn namespaced_id(namespace: &str, id: &str) -> String {
    if namespace.ends_with('/') {
        format!("{}{}", namespace, id.trim_start_matches('/'))
    } else {
        format!("{}/{}", namespace, id.trim_start_matches('/'))
    }
}
