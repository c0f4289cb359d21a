//! Error types for source adapter operations

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AmountError, Network};

/// How a failed adapter call is reported in the aggregation trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
	/// Applicable source missing or holding malformed configuration
	Configuration,
	/// The on-chain read or HTTP call failed, or returned no usable route
	Call,
	/// The source did not answer within its time budget
	Timeout,
	/// The aggregation was cancelled before the source answered
	Cancelled,
}

/// Adapter operation errors
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("Network {network} is not supported by source {source_id}")]
	UnsupportedNetwork { network: Network, source_id: String },

	#[error("Configuration error: {reason}")]
	Config { reason: String },

	#[error("Invalid {field} address '{address}' on {network}")]
	InvalidAddress {
		field: String,
		address: String,
		network: Network,
	},

	#[error("No read provider configured for {0}")]
	MissingProvider(Network),

	#[error("Invalid token identifier '{token}': {reason}")]
	InvalidToken { token: String, reason: String },

	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("RPC call failed: {0}")]
	Rpc(String),

	#[error("timeout after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("No route found: {reason}")]
	NoRoute { reason: String },

	#[error("Price impact too high: {reason}")]
	PriceImpactTooHigh { reason: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Invalid amount: {0}")]
	Amount(#[from] AmountError),
}

impl AdapterError {
	/// Classify the error for the failure trail
	pub fn kind(&self) -> FailureKind {
		match self {
			AdapterError::Config { .. }
			| AdapterError::InvalidAddress { .. }
			| AdapterError::MissingProvider(_) => FailureKind::Configuration,
			AdapterError::Timeout { .. } => FailureKind::Timeout,
			AdapterError::HttpError(e) if e.is_timeout() => FailureKind::Timeout,
			_ => FailureKind::Call,
		}
	}

	/// Unsupported networks are skipped silently rather than reported
	pub fn is_unsupported_network(&self) -> bool {
		matches!(self, AdapterError::UnsupportedNetwork { .. })
	}

	/// Extract HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AdapterError::HttpStatusError { status_code, .. } => Some(*status_code),
			AdapterError::HttpError(reqwest_error) => {
				reqwest_error.status().map(|status| status.as_u16())
			},
			_ => None,
		}
	}

	pub fn config(reason: impl Into<String>) -> Self {
		Self::Config {
			reason: reason.into(),
		}
	}

	pub fn invalid_response(reason: impl Into<String>) -> Self {
		Self::InvalidResponse {
			reason: reason.into(),
		}
	}

	pub fn no_route(reason: impl Into<String>) -> Self {
		Self::NoRoute {
			reason: reason.into(),
		}
	}

	/// Create an HTTP failure error with the given status code and body
	pub fn http_failure(status_code: u16, reason: impl Into<String>) -> Self {
		Self::HttpStatusError {
			status_code,
			reason: reason.into(),
		}
	}
}
