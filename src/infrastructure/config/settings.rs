//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Configuration is loaded from a TOML file; the database path can
//! be overridden with the `CLOSELINE_DATABASE` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use closeline::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::store::StoreConfig;
use crate::error::{ConfigError, Result};

/// Environment variable that overrides [`Config::database`].
pub const DATABASE_ENV: &str = "CLOSELINE_DATABASE";

/// Main application configuration.
///
/// Every table is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Path to SQLite database file, or `:memory:`.
    ///
    /// Defaults to "closeline.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Connection pool settings.
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_database_path() -> String {
    "closeline.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            database: default_database_path(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(database) = std::env::var(DATABASE_ENV) {
            if !database.trim().is_empty() {
                config.database = database;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Like [`Self::load`], but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or is invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Initialize logging from the `[logging]` table.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if !LoggingConfig::FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("must be one of {}", LoggingConfig::FORMATS.join(", ")),
            }
            .into());
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "level" }.into());
        }
        if self.store.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_connections",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.store.busy_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "busy_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
