//! Store configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Where the store keeps its files.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one CSV stock card table per item.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// JSON file holding account credentials.
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("users.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            credentials_file: default_credentials_file(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Layering, lowest precedence first: `config/default`,
    /// `config/{RUN_MODE}`, then `KARDEX__`-prefixed environment variables
    /// (e.g. `KARDEX__DATA_DIR=/var/lib/kardex`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KARDEX").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
