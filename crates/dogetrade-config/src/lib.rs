//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `DOGETRADE__SECTION__KEY` environment variables.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BacktestSettings, ConfigValidationError, LogFormat, LoggingConfig,
    MarketSettings, MonitorSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "DOGETRADE";

/// Load configuration from an optional file and the environment.
///
/// A file that is given but missing is an error.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_with_prefix(path, ENV_PREFIX)
}

/// Same as [`load_config`] with a custom environment prefix.
pub fn load_config_with_prefix(path: Option<&Path>, prefix: &str) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
