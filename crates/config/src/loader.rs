//! Configuration loading utilities

use crate::{ConfigValidationError, Settings};
use config::{Config, ConfigError, Environment, File};

/// Environment variable naming an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "TRADEPULSE_CONFIG";

/// Prefix for per-key overrides, e.g. `TRADEPULSE__TIMEOUTS__PER_SOURCE_MS=3000`
pub const ENV_PREFIX: &str = "TRADEPULSE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
	#[error("Failed to load configuration: {0}")]
	Load(#[from] ConfigError),

	#[error("Invalid configuration: {0}")]
	Invalid(#[from] ConfigValidationError),
}

/// Load configuration from the config file and environment
///
/// Built-in defaults are layered under `config/config` (or the file named by
/// `TRADEPULSE_CONFIG`), which is layered under `TRADEPULSE__` variables.
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/config".to_string());
	load_config_from(&path)
}

/// Load configuration from an explicit file path (extension optional)
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	let defaults = Config::try_from(&Settings::default())?;

	let s = Config::builder()
		.add_source(defaults)
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.prefix_separator("__")
				.separator("__")
				.try_parsing(true),
		)
		.build()?;

	let settings: Settings = s.try_deserialize()?;
	settings.validate()?;
	Ok(settings)
}
