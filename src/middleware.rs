//! Validation Middleware
//!
//! After every transition reaches the reducer, the full state is validated
//! against the aggregate schema and the violations are dispatched back into
//! the store as a [`SPEC_ADD_ERROR`](crate::spec_errors::SPEC_ADD_ERROR)
//! transition.
//!
//! ## Error reports
//!
//! By default the middleware forwards its own error reports without
//! validating again, so each external transition costs one validation pass
//! and the error slice always holds the violations of the state as it was
//! before the report was applied.
//!
//! With `revalidate_error_reports` set, a report is validated like any other
//! transition and produces one more report. Nesting stops after that second
//! report.

use std::cell::Cell;

use serde::Serialize;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::engine::{ValidationEngine, ValidationOutcome};
use crate::error::Result;
use crate::schema::AggregateSchema;
use crate::store::{Middleware, Next, Store, Transition};

/// Nested error reports allowed while revalidating reports
const MAX_REPORT_DEPTH: usize = 2;

/// Middleware validating the state after each transition
#[derive(Debug)]
pub struct ValidationMiddleware {
    engine: ValidationEngine,
    revalidate_error_reports: bool,
    /// Error reports currently being dispatched by this middleware
    reporting: Cell<usize>,
}

/// Build the validation middleware for an aggregate schema
pub fn create_validator(aggregate: &AggregateSchema) -> Result<ValidationMiddleware> {
    create_validator_with(aggregate, &ValidationConfig::default())
}

/// Build the validation middleware with explicit settings
pub fn create_validator_with(
    aggregate: &AggregateSchema,
    config: &ValidationConfig,
) -> Result<ValidationMiddleware> {
    let engine = ValidationEngine::new(aggregate, config)?;
    debug!(
        aggregate = aggregate.id(),
        revalidate_error_reports = config.revalidate_error_reports,
        "Created validation middleware"
    );
    Ok(ValidationMiddleware {
        engine,
        revalidate_error_reports: config.revalidate_error_reports,
        reporting: Cell::new(0),
    })
}

impl ValidationMiddleware {
    /// Validate a state directly, without dispatching
    pub fn validate<S: Serialize + ?Sized>(&self, state: &S) -> Result<ValidationOutcome> {
        self.engine.validate_state(state)
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    fn should_validate(&self, transition: &Transition) -> bool {
        if !transition.is_error_report() {
            return true;
        }
        if !self.revalidate_error_reports {
            return false;
        }
        if self.reporting.get() >= MAX_REPORT_DEPTH {
            debug!(depth = self.reporting.get(), "Error report nesting limit reached, skipping validation");
            return false;
        }
        true
    }
}

impl<S: Serialize + Default> Middleware<S> for ValidationMiddleware {
    fn handle(&self, store: &Store<S>, next: Next<'_, S>, transition: Transition) -> Result<Transition> {
        let validate = self.should_validate(&transition);
        let result = next.run(transition)?;
        if !validate {
            return Ok(result);
        }

        let outcome = self.engine.validate_state(&*store.state())?;
        debug!(
            transition = %result.kind,
            valid = outcome.valid,
            violations = outcome.violations.len(),
            "Validated state"
        );

        let depth = self.reporting.get();
        self.reporting.set(depth + 1);
        let reported = store.dispatch(Transition::report_errors(outcome.violations));
        self.reporting.set(depth);
        reported?;

        Ok(result)
    }
}
