//! # pass-config
//!
//! Layered configuration loading for the PASS assessment engine using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PASS_*` prefix, `__` as separator)
//! 2. Project-level `.pass/config.toml`
//! 3. User-level `~/.config/pass/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PASS_STORAGE__DATA_DIR` -> `storage.data_dir`,
//! `PASS_NORMS__TABLE_PATH` -> `norms.table_path`, and so on.
//!
//! # Usage
//!
//! ```no_run
//! use pass_config::PassConfig;
//!
//! let config = PassConfig::load_with_dotenv().expect("config");
//! let norms = config.norms.load_table().expect("normative table");
//! let data_dir = config.storage.resolved_data_dir().expect("data dir");
//! ```

mod error;
mod general;
mod norms;
mod storage;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use norms::NormsConfig;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for all settings.
pub const ENV_PREFIX: &str = "PASS_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PassConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub norms: NormsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PassConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse or a value has
    /// the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading a `.env` file, if one exists.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can layer extra providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".pass/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pass").join("config.toml"))
    }

    /// Load `.env` from the current directory or one of its parents.
    /// Silently does nothing if none is found.
    fn load_dotenv() {
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = PassConfig::default();
        assert!(!config.storage.is_configured());
        assert!(!config.norms.is_configured());
        assert_eq!(config.general.history_limit, 20);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: PassConfig = PassConfig::figment().extract()?;
            assert!(!config.norms.is_configured());
            assert_eq!(config.general.history_limit, 20);
            Ok(())
        });
    }
}
