//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default number of sessions shown by history commands.
const fn default_history_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Sessions returned by `history` when no explicit limit is given.
    /// `0` means no limit.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

impl GeneralConfig {
    /// The configured limit as an optional count, `None` when unlimited.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        (self.history_limit > 0).then(|| self.history_limit as usize)
    }
}
