//! Error types for schema composition, validation and sample generation

use thiserror::Error;

/// Result type for store-spec operations
pub type Result<T> = std::result::Result<T, SpecError>;

/// Store-spec errors
///
/// Validation violations are not errors: they are returned as data in a
/// [`ViolationList`](crate::ViolationList) and routed through the store.
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Schema '{name}' has no non-empty string `id`")]
    MissingId { name: String },

    #[error("Duplicate schema id: {id}")]
    DuplicateId { id: String },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Unsatisfiable schema at {path}: {reason}")]
    Unsatisfiable { path: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("State is still borrowed when the reducer runs")]
    StateBorrowed,
}

impl SpecError {
    pub(crate) fn unsatisfiable(path: &str, reason: impl Into<String>) -> Self {
        let path = if path.is_empty() { "/" } else { path };
        SpecError::Unsatisfiable {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
