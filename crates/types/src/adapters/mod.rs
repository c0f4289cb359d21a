//! Source adapter contract: descriptive info, errors and the trait itself

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod traits;

pub use errors::{AdapterError, FailureKind};
pub use traits::SourceAdapter;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// How a source obtains its price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStyle {
	/// Read-only call against a quoter or pool contract
	OnChain,
	/// HTTP request to a third-party aggregation API
	Rest,
}

/// Descriptive information about a configured source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
	/// Unique identifier within a registry
	pub source_id: String,
	/// Name attached to quotes, e.g. "Uniswap"
	pub name: String,
	pub style: IntegrationStyle,
	pub description: Option<String>,
}

impl SourceInfo {
	pub fn new(source_id: &str, name: &str, style: IntegrationStyle) -> Self {
		Self {
			source_id: source_id.to_string(),
			name: name.to_string(),
			style,
			description: None,
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}
}
