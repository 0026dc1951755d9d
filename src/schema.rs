//! Schema document types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SpecError};
use crate::registry::SchemaRegistry;

/// Identifier of every aggregate produced by [`combine`](crate::combine)
pub const AGGREGATE_ID: &str = "store-spec";

/// A JSON Schema document carrying a non-empty `id`
///
/// The `id` names the document inside an aggregate: top-level documents
/// become the property of the same name, reference documents become the
/// definition of the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct SchemaDocument {
    id: String,
    content: Value,
}

impl SchemaDocument {
    /// Wrap a schema value, checking that it carries an `id`
    pub fn new(content: Value) -> Result<Self> {
        match content.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => Ok(Self {
                id: id.to_string(),
                content,
            }),
            _ => Err(SpecError::MissingId {
                name: describe(&content),
            }),
        }
    }

    /// The document's own identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The raw schema content
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Consume the document, returning the raw schema content
    pub fn into_content(self) -> Value {
        self.content
    }
}

impl TryFrom<Value> for SchemaDocument {
    type Error = SpecError;

    fn try_from(value: Value) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SchemaDocument> for Value {
    fn from(doc: SchemaDocument) -> Self {
        doc.content
    }
}

impl fmt::Display for SchemaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

// Short label for a schema without an id, used in error messages
fn describe(content: &Value) -> String {
    content
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            let text = content.to_string();
            if text.chars().count() > 60 {
                format!("{}...", text.chars().take(57).collect::<String>())
            } else {
                text
            }
        })
}

/// The single schema validating an entire state tree
///
/// An object schema whose properties are the top-level documents (all
/// required) and whose `definitions` hold the shared reference documents.
/// Built once by the composer and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "Value")]
pub struct AggregateSchema {
    document: Value,
    top_level: SchemaRegistry,
    references: SchemaRegistry,
}

impl AggregateSchema {
    /// Assemble the aggregate document from the two registries
    pub(crate) fn from_registries(top_level: SchemaRegistry, references: SchemaRegistry) -> Self {
        let properties: Map<String, Value> = top_level
            .iter()
            .map(|doc| (doc.id().to_string(), doc.content().clone()))
            .collect();
        let required: Vec<Value> = top_level
            .ids()
            .map(|id| Value::String(id.to_string()))
            .collect();
        let definitions: Map<String, Value> = references
            .iter()
            .map(|doc| (doc.id().to_string(), doc.content().clone()))
            .collect();

        let document = serde_json::json!({
            "id": AGGREGATE_ID,
            "type": "object",
            "properties": properties,
            "required": required,
            "definitions": definitions,
        });

        Self {
            document,
            top_level,
            references,
        }
    }

    /// The aggregate's own identifier
    pub fn id(&self) -> &str {
        AGGREGATE_ID
    }

    /// The composed JSON Schema document
    pub fn as_value(&self) -> &Value {
        &self.document
    }

    /// Required top-level ids, in composition order
    pub fn required(&self) -> Vec<&str> {
        self.top_level.ids().collect()
    }

    /// Top-level documents keyed by id
    pub fn top_level(&self) -> &SchemaRegistry {
        &self.top_level
    }

    /// Shared reference documents keyed by id
    pub fn references(&self) -> &SchemaRegistry {
        &self.references
    }

    /// Look up a top-level property schema
    pub fn property(&self, id: &str) -> Option<&Value> {
        self.document.get("properties").and_then(|p| p.get(id))
    }

    /// Look up a shared definition
    pub fn definition(&self, id: &str) -> Option<&Value> {
        self.document.get("definitions").and_then(|d| d.get(id))
    }
}

impl From<AggregateSchema> for Value {
    fn from(aggregate: AggregateSchema) -> Self {
        aggregate.document
    }
}
