//! Configuration loading and validation.
//!
//! Uses serde_yaml to load YAML configuration files with support for
//! environment variable overrides of the logger settings.

mod app;
mod error;
mod logging;

pub use app::AppConfig;
pub use error::ConfigError;
pub use logging::LogConfig;

use serde::Deserialize;
use std::{env, fs};

/// Environment variable overriding `log.destination`.
pub const LOG_DESTINATION_ENV: &str = "LOG_DESTINATION";
/// Environment variable overriding `log.formatter`.
pub const LOG_FORMATTER_ENV: &str = "LOG_FORMATTER";
/// Environment variable overriding `log.level`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Root configuration structure.
///
/// Required sections: app.
/// Optional sections: log.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and environment.
    pub app: AppConfig,
    /// Logger destination, formatter and level.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// First loads environment variables from `.env` file (if exists),
    /// then loads the YAML config and applies overrides from
    /// `LOG_DESTINATION`, `LOG_FORMATTER` and `LOG_LEVEL`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore error if not found)
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_string(),
            source,
        })?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Override logger settings with values returned by `lookup`.
    ///
    /// A variable that is set, even to an empty string, replaces the file value.
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(destination) = lookup(LOG_DESTINATION_ENV) {
            self.log.destination = destination;
        }
        if let Some(formatter) = lookup(LOG_FORMATTER_ENV) {
            self.log.formatter = formatter;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log.level = level;
        }
    }

    /// Validate the configuration.
    ///
    /// Logger values are checked when they are applied, not here.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.trim().is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        Ok(())
    }
}
