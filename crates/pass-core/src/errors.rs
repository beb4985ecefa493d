//! Cross-cutting error types for the assessment engine.
//!
//! Only programmer errors and malformed input surface as `CoreError`. Data
//! conditions (missing norms, zero variance, small samples) are recovered
//! locally and reported through flags or explicit result variants.

use thiserror::Error;

/// Errors that can be raised by the scoring and statistics core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value passed across the API boundary is out of range or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Data failed validation (e.g. a loaded normative table).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Reject NaN and infinities with a descriptive message.
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<f64, CoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::invalid(format!("{name} must be a finite number, got {value}")))
    }
}
