//! TradePulse Configuration
//!
//! Configuration management and startup utilities for the TradePulse swap quoter.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, ConfigLoadError};
pub use settings::{
	ConfigValidationError, CurvePoolSettings, LogFormat, LoggingSettings, NetworkSettings,
	QuoterVersion, Settings, SourceSettings, TimeoutSettings, VenueSettings,
};
pub use startup_logger::{log_service_info, log_startup_complete};
