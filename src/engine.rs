//! Validation engine
//!
//! A compiled `jsonschema` validator for one aggregate schema. Every
//! top-level and reference document of the aggregate is registered under a
//! namespaced id before compilation, so `$ref`s naming a document resolve
//! without any process-wide registry.

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::JSONSchema;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::error::{Result, SpecError};
use crate::schema::AggregateSchema;
use crate::violation::{Violation, ViolationList};

/// Result of one validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub violations: ViolationList,
}

/// Engine scoped to a single aggregate schema
pub struct ValidationEngine {
    compiled: JSONSchema,
    /// Namespaced ids registered for `$ref` resolution
    registered: Vec<String>,
}

impl ValidationEngine {
    /// Register the aggregate's documents and compile it
    pub fn new(aggregate: &AggregateSchema, config: &ValidationConfig) -> Result<Self> {
        let mut options = JSONSchema::options();
        options.with_draft(config.draft.into());

        let mut registered = Vec::new();
        let documents = aggregate
            .top_level()
            .namespaced(&config.ref_namespace)
            .chain(aggregate.references().namespaced(&config.ref_namespace));
        for (uri, doc) in documents {
            options.with_document(uri.clone(), doc.content().clone());
            registered.push(uri);
        }

        let compiled = options
            .compile(aggregate.as_value())
            .map_err(|e| SpecError::InvalidSchema(e.to_string()))?;

        debug!(
            aggregate = aggregate.id(),
            documents = registered.len(),
            "Compiled validation engine"
        );

        Ok(Self { compiled, registered })
    }

    /// Namespaced ids known to this engine
    pub fn registered(&self) -> &[String] {
        &self.registered
    }

    /// Validate a JSON value against the aggregate
    ///
    /// Mismatches come back as violations. A `$ref` the engine cannot
    /// resolve is a schema defect and fails the call instead.
    pub fn validate(&self, instance: &Value) -> Result<ValidationOutcome> {
        let violations: ViolationList = match self.compiled.validate(instance) {
            Ok(()) => ViolationList::new(),
            Err(errors) => {
                let mut violations = Vec::new();
                for error in errors {
                    match &error.kind {
                        ValidationErrorKind::Resolver { url, .. } => {
                            return Err(SpecError::InvalidSchema(format!(
                                "unresolved reference: {}",
                                url
                            )));
                        }
                        ValidationErrorKind::InvalidReference { reference } => {
                            return Err(SpecError::InvalidSchema(format!(
                                "unresolved reference: {}",
                                reference
                            )));
                        }
                        ValidationErrorKind::UnknownReferenceScheme { scheme } => {
                            return Err(SpecError::InvalidSchema(format!(
                                "unknown reference scheme: {}",
                                scheme
                            )));
                        }
                        _ => {}
                    }
                    violations.push(Violation::new(
                        error.instance_path.to_string(),
                        error.schema_path.to_string(),
                        error.to_string(),
                    ));
                }
                violations.into()
            }
        };

        debug!(violations = violations.len(), "Validation pass complete");

        Ok(ValidationOutcome {
            valid: violations.is_empty(),
            violations,
        })
    }

    /// Serialize a state value and validate it
    pub fn validate_state<S: Serialize + ?Sized>(&self, state: &S) -> Result<ValidationOutcome> {
        let value = serde_json::to_value(state)?;
        self.validate(&value)
    }
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}
