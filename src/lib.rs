//! Store Spec
//!
//! Machine-checked shape invariants for application state stores.
//!
//! ## Features
//!
//! - **Composition**: independently authored schemas merge into one aggregate
//!   describing the whole state tree
//! - **Validation Middleware**: the state is validated after every transition
//!   and the violations are dispatched back into the store
//! - **Error Slice**: a reducer keeping the latest violation list in state
//! - **Sample Generation**: example values derived from a schema for fixtures
//!
//! ## Architecture
//!
//! ```text
//! top-level schemas ─┐
//!                    ├─> combine ─> AggregateSchema ─> create_validator
//! reference schemas ─┘                                      │
//!                                                           v
//! dispatch(t) ─> ValidationMiddleware ─> ... ─> reducer ─> state
//!                     │                                     │
//!                     └── validate(state) ─> dispatch(SPEC_ADD_ERROR) ─> spec_errors slice
//! ```

pub mod compose;
pub mod config;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod registry;
pub mod sample;
pub mod schema;
pub mod spec_errors;
pub mod store;
pub mod violation;

pub use compose::{combine, combine_strict, compose_with_config};
pub use config::{ComposeConfig, DraftVersion, DuplicatePolicy, SampleConfig, SpecConfig, ValidationConfig};
pub use engine::{ValidationEngine, ValidationOutcome};
pub use error::{Result, SpecError};
pub use middleware::{create_validator, create_validator_with, ValidationMiddleware};
pub use registry::SchemaRegistry;
pub use sample::{generate, RandomSynthesizer, SampleGenerator, Synthesizer};
pub use schema::{AggregateSchema, SchemaDocument};
pub use spec_errors::SPEC_ADD_ERROR;
pub use store::{middleware_fn, Middleware, Next, Store, Transition};
pub use violation::{Violation, ViolationList};
