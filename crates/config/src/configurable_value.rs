//! Configurable value types that can load from environment variables or plain values

use serde::{Deserialize, Serialize};
use std::fmt;
use tradepulse_types::SecretString;

/// A configurable value that can be loaded from environment variables or used as plain text
///
/// RPC URLs and API keys are configured this way so that keys never have to
/// live in the configuration file itself.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConfigurableValue {
	/// Type of value: "env", "plain" or "template"
	#[serde(rename = "type")]
	pub value_type: ValueType,
	/// Environment variable name, the literal value, or a `${VAR}` template
	pub value: String,
	/// Used when the environment variable (or any template variable) is unset or empty
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fallback: Option<String>,
}

/// Type of configurable value
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	/// Load value from environment variable (name specified in `value` field)
	Env,
	/// Use the value directly from the `value` field
	Plain,
	/// Substitute every `${VAR}` in `value` from the environment
	Template,
}

impl ConfigurableValue {
	/// Create a new environment variable reference
	pub fn from_env(env_var_name: &str) -> Self {
		Self {
			value_type: ValueType::Env,
			value: env_var_name.to_string(),
			fallback: None,
		}
	}

	/// Create a new plain value
	pub fn from_plain(plain_value: &str) -> Self {
		Self {
			value_type: ValueType::Plain,
			value: plain_value.to_string(),
			fallback: None,
		}
	}

	/// Create a template such as `https://mainnet.infura.io/v3/${INFURA_API_KEY}`
	pub fn from_template(template: &str) -> Self {
		Self {
			value_type: ValueType::Template,
			value: template.to_string(),
			fallback: None,
		}
	}

	pub fn with_fallback(mut self, fallback: &str) -> Self {
		self.fallback = Some(fallback.to_string());
		self
	}

	/// Resolve the actual value based on the type
	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		let resolved = match self.value_type {
			ValueType::Env => read_env(&self.value)
				.ok_or_else(|| ConfigurableValueError::EnvironmentVariableNotFound(self.value.clone())),
			ValueType::Plain => Ok(self.value.clone()),
			ValueType::Template => expand_template(&self.value),
		};

		match (resolved, &self.fallback) {
			(Ok(value), _) => Ok(value),
			(Err(ConfigurableValueError::EnvironmentVariableNotFound(_)), Some(fallback)) => {
				Ok(fallback.clone())
			},
			(Err(e), _) => Err(e),
		}
	}

	/// Resolve straight into a [`SecretString`]
	pub fn resolve_for_secret(&self) -> Result<SecretString, ConfigurableValueError> {
		self.resolve().map(SecretString::from)
	}

	pub fn is_plain(&self) -> bool {
		matches!(self.value_type, ValueType::Plain)
	}

	/// Get a description of this configurable value for logging
	pub fn description(&self) -> String {
		let base = match self.value_type {
			ValueType::Env => format!("environment variable '{}'", self.value),
			ValueType::Plain => "configured plain value".to_string(),
			ValueType::Template => {
				let vars = template_variables(&self.value).unwrap_or_default();
				format!("template using {}", vars.join(", "))
			},
		};
		match self.fallback {
			Some(_) => format!("{} (with fallback)", base),
			None => base,
		}
	}
}

fn read_env(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Names referenced by `${VAR}` placeholders, in order of appearance
fn template_variables(template: &str) -> Result<Vec<String>, ConfigurableValueError> {
	let mut names = Vec::new();
	let mut rest = template;
	while let Some(start) = rest.find("${") {
		let after = &rest[start + 2..];
		let end = after
			.find('}')
			.ok_or_else(|| ConfigurableValueError::MalformedTemplate(template.to_string()))?;
		let name = &after[..end];
		if name.is_empty() {
			return Err(ConfigurableValueError::MalformedTemplate(template.to_string()));
		}
		names.push(name.to_string());
		rest = &after[end + 1..];
	}
	Ok(names)
}

fn expand_template(template: &str) -> Result<String, ConfigurableValueError> {
	let mut expanded = template.to_string();
	for name in template_variables(template)? {
		let value = read_env(&name)
			.ok_or_else(|| ConfigurableValueError::EnvironmentVariableNotFound(name.clone()))?;
		expanded = expanded.replace(&format!("${{{}}}", name), &value);
	}
	Ok(expanded)
}

/// Errors that can occur when resolving configurable values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),

	#[error("Malformed template '{0}'")]
	MalformedTemplate(String),
}

// Never show plain values, they may embed API keys
impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value_type {
			ValueType::Env => write!(f, "env:{}", self.value),
			ValueType::Plain => write!(f, "plain:[REDACTED]"),
			ValueType::Template => write!(f, "template:{}", self.value),
		}
	}
}

/// `env:NAME` becomes an environment reference, anything else a plain value
impl From<&str> for ConfigurableValue {
	fn from(value: &str) -> Self {
		if let Some(env_var) = value.strip_prefix("env:") {
			Self::from_env(env_var)
		} else {
			Self::from_plain(value)
		}
	}
}

impl From<String> for ConfigurableValue {
	fn from(value: String) -> Self {
		ConfigurableValue::from(value.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::env;

	#[test]
	fn test_plain_value() {
		let config = ConfigurableValue::from_plain("https://arb1.arbitrum.io/rpc");
		assert_eq!(config.value_type, ValueType::Plain);
		assert_eq!(config.resolve().unwrap(), "https://arb1.arbitrum.io/rpc");
	}

	#[test]
	fn test_env_value() {
		env::set_var("TRADEPULSE_TEST_ZEROX_KEY", "key-from-env");

		let config = ConfigurableValue::from_env("TRADEPULSE_TEST_ZEROX_KEY");
		assert_eq!(config.value_type, ValueType::Env);
		assert_eq!(config.resolve().unwrap(), "key-from-env");

		env::remove_var("TRADEPULSE_TEST_ZEROX_KEY");
	}

	#[test]
	fn test_env_value_not_found() {
		let config = ConfigurableValue::from_env("TRADEPULSE_TEST_NON_EXISTENT");
		assert_eq!(
			config.resolve(),
			Err(ConfigurableValueError::EnvironmentVariableNotFound(
				"TRADEPULSE_TEST_NON_EXISTENT".to_string()
			))
		);
	}

	#[test]
	fn test_template_uses_env_when_present() {
		env::set_var("TRADEPULSE_TEST_INFURA", "abc123");

		let config = ConfigurableValue::from_template("https://mainnet.infura.io/v3/${TRADEPULSE_TEST_INFURA}")
			.with_fallback("https://cloudflare-eth.com");
		assert_eq!(config.resolve().unwrap(), "https://mainnet.infura.io/v3/abc123");

		env::remove_var("TRADEPULSE_TEST_INFURA");
	}

	#[test]
	fn test_template_falls_back_when_missing() {
		let config =
			ConfigurableValue::from_template("https://mainnet.infura.io/v3/${TRADEPULSE_TEST_UNSET_KEY}")
				.with_fallback("https://cloudflare-eth.com");
		assert_eq!(config.resolve().unwrap(), "https://cloudflare-eth.com");

		let without_fallback =
			ConfigurableValue::from_template("https://mainnet.infura.io/v3/${TRADEPULSE_TEST_UNSET_KEY}");
		assert!(without_fallback.resolve().is_err());
	}

	#[test]
	fn test_malformed_template_ignores_fallback() {
		let config = ConfigurableValue::from_template("https://host/${UNCLOSED").with_fallback("x");
		assert!(matches!(
			config.resolve(),
			Err(ConfigurableValueError::MalformedTemplate(_))
		));
	}

	#[test]
	fn test_from_string_conversion() {
		let plain_config = ConfigurableValue::from("plain-value");
		assert_eq!(plain_config.value_type, ValueType::Plain);
		assert_eq!(plain_config.value, "plain-value");

		let env_config = ConfigurableValue::from("env:ZEROX_API_KEY");
		assert_eq!(env_config.value_type, ValueType::Env);
		assert_eq!(env_config.value, "ZEROX_API_KEY");
	}

	#[test]
	fn test_secret_resolution() {
		let config = ConfigurableValue::from_plain("test-secret");
		let secret_value = config.resolve_for_secret().unwrap();
		assert_eq!(secret_value.expose_secret(), "test-secret");
	}

	#[test]
	fn test_display_redacts_plain_values() {
		assert_eq!(ConfigurableValue::from_plain("secret").to_string(), "plain:[REDACTED]");
		assert_eq!(ConfigurableValue::from_env("MY_KEY").to_string(), "env:MY_KEY");
		assert_eq!(
			ConfigurableValue::from_template("https://x/${KEY}").description(),
			"template using KEY"
		);
	}

	#[test]
	fn test_serde_serialization() {
		let json = r#"{"type":"template","value":"https://x/${KEY}","fallback":"https://y"}"#;
		let deserialized: ConfigurableValue = serde_json::from_str(json).unwrap();
		assert_eq!(deserialized.value_type, ValueType::Template);
		assert_eq!(deserialized.fallback.as_deref(), Some("https://y"));

		let plain = serde_json::to_string(&ConfigurableValue::from_env("MY_SECRET")).unwrap();
		assert_eq!(plain, r#"{"type":"env","value":"MY_SECRET"}"#);
	}
}
