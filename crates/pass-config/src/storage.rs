//! Where user records and history files live.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory of the file store. Empty means the platform data dir.
    #[serde(default)]
    pub data_dir: String,
}

impl StorageConfig {
    pub fn is_configured(&self) -> bool {
        !self.data_dir.is_empty()
    }

    /// The configured directory, or `<platform data dir>/pass`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when nothing is configured and the
    /// platform has no data directory.
    pub fn resolved_data_dir(&self) -> Result<PathBuf, ConfigError> {
        if self.is_configured() {
            return Ok(PathBuf::from(&self.data_dir));
        }
        dirs::data_dir()
            .map(|p| p.join("pass"))
            .ok_or_else(|| ConfigError::NotConfigured {
                field: "storage.data_dir".into(),
            })
    }
}
