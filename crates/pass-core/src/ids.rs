//! ID prefixes and generation.
//!
//! IDs have the form `{prefix}-{8 hex chars}`, e.g. `usr-a3f8b2c1`.

use crate::errors::CoreError;

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_SESSION: &str = "tst";

/// Generate a prefixed ID with a random 32-bit hex suffix.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes).map_err(|e| CoreError::Other(anyhow::anyhow!("getrandom: {e}")))?;
    Ok(format_id(prefix, &bytes))
}

/// Format raw bytes as a prefixed lowercase-hex ID.
#[must_use]
pub fn format_id(prefix: &str, bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{prefix}-{hex}")
}

/// Check that `id` has the given prefix followed by a non-empty suffix.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|suffix| !suffix.is_empty())
}
