//! `.env` loading runs in its own test binary because dotenvy writes to the
//! process environment, which `Jail` does not restore.

use figment::Jail;
use pass_config::PassConfig;

#[test]
fn dotenv_file_is_read() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "PASS_GENERAL__HISTORY_LIMIT=11\n")?;

        let config = PassConfig::load_with_dotenv().expect("config loads");
        assert_eq!(config.general.history_limit, 11);
        Ok(())
    });
}
