//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pass_config::{ConfigError, PassConfig};
use pass_core::enums::{AgeGroup, Dimension};
use pretty_assertions::assert_eq;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
data_dir = "/srv/pass"

[norms]
table_path = "norms/2025.toml"

[general]
history_limit = 5
"#,
        )?;

        let config: PassConfig = Figment::from(Serialized::defaults(PassConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.storage.data_dir, "/srv/pass");
        assert_eq!(config.norms.table_path, "norms/2025.toml");
        assert_eq!(config.general.history_limit, 5);
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".pass")?;
        jail.create_file(
            ".pass/config.toml",
            r#"
[general]
history_limit = 3
"#,
        )?;

        let config = PassConfig::load().expect("config loads");
        assert_eq!(config.general.history_limit, 3);
        assert!(!config.storage.is_configured());
        Ok(())
    });
}

#[test]
fn custom_norms_table_loads_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "norms.toml",
            r#"
version = "test-1"

[groups.upper_primary.planning]
mean = 70.0
sd = 10.0
sample_size = 50

[groups.upper_primary.attention]
mean = 70.0
sd = 10.0
sample_size = 50

[groups.upper_primary.simultaneous]
mean = 70.0
sd = 10.0
sample_size = 50

[groups.upper_primary.successive]
mean = 70.0
sd = 10.0
sample_size = 50
"#,
        )?;
        jail.set_env("PASS_NORMS__TABLE_PATH", "norms.toml");

        let config = PassConfig::load().expect("config loads");
        let table = config.norms.load_table().expect("table loads");
        assert_eq!(table.version, "test-1");
        let entry = table
            .get(AgeGroup::UpperPrimary, Dimension::Planning)
            .expect("entry present");
        assert_eq!(entry.mean, 70.0);
        assert_eq!(entry.sample_size, 50);
        Ok(())
    });
}

#[test]
fn custom_norms_table_loads_from_json() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "norms.json",
            r#"{
  "version": "json-1",
  "groups": {
    "preschool": {
      "planning": { "mean": 60.0, "sd": 15.0, "sample_size": 10 },
      "attention": { "mean": 55.0, "sd": 16.0, "sample_size": 10 },
      "simultaneous": { "mean": 62.0, "sd": 14.0, "sample_size": 10 },
      "successive": { "mean": 58.0, "sd": 15.0, "sample_size": 10 }
    }
  }
}"#,
        )?;
        jail.set_env("PASS_NORMS__TABLE_PATH", "norms.json");

        let config = PassConfig::load().expect("config loads");
        let table = config.norms.load_table().expect("table loads");
        assert_eq!(table.version, "json-1");
        assert_eq!(table.groups.len(), 1);
        Ok(())
    });
}

#[test]
fn norms_table_with_negative_sd_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "norms.toml",
            r#"
version = "bad"

[groups.junior_high.planning]
mean = 80.0
sd = -1.0
sample_size = 10
"#,
        )?;
        jail.set_env("PASS_NORMS__TABLE_PATH", "norms.toml");

        let config = PassConfig::load().expect("config loads");
        assert!(matches!(
            config.norms.load_table(),
            Err(ConfigError::Norms { .. })
        ));
        Ok(())
    });
}

#[test]
fn wrong_type_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("PASS_GENERAL__HISTORY_LIMIT", "lots");
        assert!(matches!(PassConfig::load(), Err(ConfigError::Figment(_))));
        Ok(())
    });
}
