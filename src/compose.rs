//! Schema composition
//!
//! Merges independently authored top-level schemas and shared reference
//! schemas into one [`AggregateSchema`] describing the whole state tree.
//!
//! ```
//! use serde_json::json;
//! use store_spec::{combine, SchemaDocument};
//!
//! let todos = SchemaDocument::new(json!({"id": "todos", "type": "array"})).unwrap();
//! let aggregate = combine([("todos_spec", todos)], Vec::<(&str, SchemaDocument)>::new()).unwrap();
//! assert_eq!(aggregate.required(), vec!["todos"]);
//! ```

use std::fmt::Display;

use tracing::{debug, warn};

use crate::config::{ComposeConfig, DuplicatePolicy};
use crate::error::{Result, SpecError};
use crate::registry::SchemaRegistry;
use crate::schema::{AggregateSchema, SchemaDocument};

/// Combine top-level and reference schemas, last write wins on duplicate ids
///
/// Keys of the inputs only drive iteration; the output is keyed by each
/// document's own `id`. Every top-level id is required, reference ids are
/// only available as `definitions`.
pub fn combine<K, T, R>(top_level: T, references: R) -> Result<AggregateSchema>
where
    K: Display,
    T: IntoIterator<Item = (K, SchemaDocument)>,
    R: IntoIterator<Item = (K, SchemaDocument)>,
{
    compose(top_level, references, DuplicatePolicy::Overwrite)
}

/// Combine top-level and reference schemas, failing on any duplicate id
///
/// An id may appear only once across both inputs.
pub fn combine_strict<K, T, R>(top_level: T, references: R) -> Result<AggregateSchema>
where
    K: Display,
    T: IntoIterator<Item = (K, SchemaDocument)>,
    R: IntoIterator<Item = (K, SchemaDocument)>,
{
    compose(top_level, references, DuplicatePolicy::Reject)
}

/// Combine using the duplicate policy from configuration
pub fn compose_with_config<K, T, R>(
    top_level: T,
    references: R,
    config: &ComposeConfig,
) -> Result<AggregateSchema>
where
    K: Display,
    T: IntoIterator<Item = (K, SchemaDocument)>,
    R: IntoIterator<Item = (K, SchemaDocument)>,
{
    compose(top_level, references, config.duplicate_ids)
}

fn compose<K, T, R>(top_level: T, references: R, policy: DuplicatePolicy) -> Result<AggregateSchema>
where
    K: Display,
    T: IntoIterator<Item = (K, SchemaDocument)>,
    R: IntoIterator<Item = (K, SchemaDocument)>,
{
    let mut properties = SchemaRegistry::new();
    for (name, schema) in top_level {
        insert(&mut properties, name, schema, policy, "property")?;
    }

    let mut definitions = SchemaRegistry::new();
    for (name, schema) in references {
        if policy == DuplicatePolicy::Reject && properties.contains(schema.id()) {
            return Err(SpecError::DuplicateId {
                id: schema.id().to_string(),
            });
        }
        insert(&mut definitions, name, schema, policy, "definition")?;
    }

    debug!(
        properties = properties.len(),
        definitions = definitions.len(),
        "Composed aggregate schema"
    );

    Ok(AggregateSchema::from_registries(properties, definitions))
}

fn insert<K: Display>(
    registry: &mut SchemaRegistry,
    name: K,
    schema: SchemaDocument,
    policy: DuplicatePolicy,
    kind: &str,
) -> Result<()> {
    if policy == DuplicatePolicy::Reject && registry.contains(schema.id()) {
        return Err(SpecError::DuplicateId {
            id: schema.id().to_string(),
        });
    }

    let id = schema.id().to_string();
    if registry.register(schema).is_some() {
        warn!(id = %id, key = %name, "Duplicate {} id, later schema overwrites earlier one", kind);
    }
    Ok(())
}
