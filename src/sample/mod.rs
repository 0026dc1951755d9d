//! Sample Generation
//!
//! Derives example values from a schema for use as test fixtures. The
//! generator hands the schema to a [`Synthesizer`] and returns its value
//! untouched: no validation of the result and no caching.

mod random;

use serde_json::Value;
use tracing::debug;

use crate::config::SampleConfig;
use crate::error::Result;
use crate::schema::SchemaDocument;

pub use random::RandomSynthesizer;

/// Engine producing one value conforming to a schema
pub trait Synthesizer {
    /// Produce a value, or `Unsatisfiable` when no value can conform
    fn synthesize(&mut self, schema: &Value) -> Result<Value>;
}

/// Delegates schemas to a synthesis engine
#[derive(Debug)]
pub struct SampleGenerator<Z = RandomSynthesizer> {
    synthesizer: Z,
}

impl SampleGenerator<RandomSynthesizer> {
    /// Generator backed by the random synthesizer
    pub fn with_config(config: SampleConfig) -> Self {
        Self::new(RandomSynthesizer::new(config))
    }
}

impl Default for SampleGenerator<RandomSynthesizer> {
    fn default() -> Self {
        Self::with_config(SampleConfig::default())
    }
}

impl<Z: Synthesizer> SampleGenerator<Z> {
    pub fn new(synthesizer: Z) -> Self {
        Self { synthesizer }
    }

    /// Generate one value for a raw schema
    pub fn generate(&mut self, schema: &Value) -> Result<Value> {
        let value = self.synthesizer.synthesize(schema)?;
        debug!(sample = %value, "Generated sample");
        Ok(value)
    }

    /// Generate one value for a schema document
    pub fn generate_document(&mut self, schema: &SchemaDocument) -> Result<Value> {
        self.generate(schema.content())
    }

    pub fn synthesizer(&self) -> &Z {
        &self.synthesizer
    }
}

/// Generate one value with the default random synthesizer
pub fn generate(schema: &Value) -> Result<Value> {
    SampleGenerator::default().generate(schema)
}
