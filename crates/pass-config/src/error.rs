//! Configuration error types.

use pass_core::errors::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A required configuration value is missing and has no fallback.
    #[error("Configuration value '{field}' is not configured and has no default")]
    NotConfigured { field: String },

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// The normative table file loaded but failed validation.
    #[error("Invalid normative table '{path}': {source}")]
    Norms {
        path: String,
        #[source]
        source: CoreError,
    },
}
