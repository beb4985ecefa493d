//! Normative reference table source.

use figment::{
    Figment,
    providers::{Format, Json, Toml},
};
use pass_core::norms::NormativeTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NormsConfig {
    /// Path to a TOML or JSON normative table. Empty means the built-in table.
    #[serde(default)]
    pub table_path: String,
}

impl NormsConfig {
    pub fn is_configured(&self) -> bool {
        !self.table_path.is_empty()
    }

    /// Load and validate the configured table, or return the built-in one.
    ///
    /// The format is picked from the extension: `.json` is read as JSON,
    /// anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the file does not exist,
    /// `ConfigError::Figment` if it cannot be parsed, and `ConfigError::Norms`
    /// if the parsed table fails validation.
    pub fn load_table(&self) -> Result<NormativeTable, ConfigError> {
        if !self.is_configured() {
            return Ok(NormativeTable::builtin());
        }

        let path = Path::new(&self.table_path);
        if !path.exists() {
            return Err(ConfigError::InvalidValue {
                field: "norms.table_path".into(),
                reason: format!("file '{}' does not exist", self.table_path),
            });
        }

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let figment = if is_json {
            Figment::from(Json::file(path))
        } else {
            Figment::from(Toml::file(path))
        };

        let table: NormativeTable = figment.extract()?;
        table.validate().map_err(|source| ConfigError::Norms {
            path: self.table_path.clone(),
            source,
        })?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_uses_builtin() {
        let table = NormsConfig::default().load_table().unwrap();
        assert_eq!(table.version, NormativeTable::BUILTIN_VERSION);
    }

    #[test]
    fn missing_file_is_invalid_value() {
        let config = NormsConfig {
            table_path: "/definitely/not/here.toml".into(),
        };
        assert!(matches!(
            config.load_table(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
