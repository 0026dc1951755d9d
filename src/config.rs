//! Configuration for composition, validation and sample generation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (store-spec.toml)
//! - Environment variables (STORE_SPEC__*)
//!
//! ## Example config file (store-spec.toml):
//! ```toml
//! [compose]
//! duplicate_ids = "reject"
//!
//! [validation]
//! draft = "draft7"
//! ref_namespace = "json-schema:///"
//! revalidate_error_reports = false
//!
//! [sample]
//! seed = 42
//! max_depth = 6
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::DEFAULT_NAMESPACE;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecConfig {
    /// Composition settings
    #[serde(default)]
    pub compose: ComposeConfig,

    /// Validation middleware settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Sample generation settings
    #[serde(default)]
    pub sample: SampleConfig,
}

/// How the composer treats two schemas sharing an id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Later schema replaces the earlier one
    #[default]
    Overwrite,
    /// Composition fails with `DuplicateId`
    Reject,
}

/// Composition configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeConfig {
    #[serde(default)]
    pub duplicate_ids: DuplicatePolicy,
}

/// JSON Schema draft used to compile the aggregate
///
/// Draft 4 is absent: it treats `id` as a base URI, so the relative ids
/// every aggregate carries would not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DraftVersion {
    Draft6,
    #[default]
    Draft7,
}

impl From<DraftVersion> for jsonschema::Draft {
    fn from(draft: DraftVersion) -> Self {
        match draft {
            DraftVersion::Draft6 => jsonschema::Draft::Draft6,
            DraftVersion::Draft7 => jsonschema::Draft::Draft7,
        }
    }
}

/// Validation middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Draft the aggregate is compiled against
    #[serde(default)]
    pub draft: DraftVersion,

    /// Prefix joined to each schema id when registering it with the engine
    #[serde(default = "default_ref_namespace")]
    pub ref_namespace: String,

    /// Re-validate after the middleware's own error reports
    #[serde(default)]
    pub revalidate_error_reports: bool,
}

/// Sample generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Fixed RNG seed; random when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Nesting depth past which optional properties are skipped
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Items generated beyond `minItems`, at most
    #[serde(default = "default_max_extra_items")]
    pub max_extra_items: usize,

    /// Chance that an optional property is generated
    #[serde(default = "default_optional_probability")]
    pub optional_probability: f64,

    /// Preferred length of unconstrained strings
    #[serde(default = "default_string_length")]
    pub string_length: usize,
}

// Default value functions
fn default_ref_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_max_depth() -> usize {
    8
}

fn default_max_extra_items() -> usize {
    3
}

fn default_optional_probability() -> f64 {
    0.5
}

fn default_string_length() -> usize {
    8
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            draft: DraftVersion::default(),
            ref_namespace: default_ref_namespace(),
            revalidate_error_reports: false,
        }
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_depth: default_max_depth(),
            max_extra_items: default_max_extra_items(),
            optional_probability: default_optional_probability(),
            string_length: default_string_length(),
        }
    }
}

impl SpecConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "store-spec.toml",
            ".store-spec.toml",
            "config/store-spec.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "store-spec", "store-spec") {
            let xdg_config = config_dir.config_dir().join("store-spec.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // STORE_SPEC__VALIDATION__DRAFT=draft6
        builder = builder.add_source(
            Environment::with_prefix("STORE_SPEC")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
