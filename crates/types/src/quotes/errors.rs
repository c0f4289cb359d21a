//! Error types for quote requests and aggregation

use thiserror::Error;

use super::SourceFailure;
use crate::models::{AmountError, Network};

/// Validation errors for quote requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
	#[error("Missing required field: {field}")]
	MissingToken { field: String },

	#[error("Input and output token are the same: {token}")]
	SameToken { token: String },

	#[error("Input amount must be greater than zero")]
	ZeroAmount,

	#[error("Unknown token {symbol} on {network}")]
	UnknownToken { symbol: String, network: Network },

	#[error("Invalid amount: {0}")]
	Amount(#[from] AmountError),
}

/// Errors surfaced to callers of the aggregator
///
/// Individual source failures never appear here on their own; they are only
/// reported through `NoRouteFound` once every applicable source has failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
	#[error("Invalid quote request: {0}")]
	InvalidRequest(#[from] QuoteValidationError),

	#[error("{}", no_route_message(.failures))]
	NoRouteFound { failures: Vec<SourceFailure> },

	#[error("Aggregation for request {request_id} was cancelled")]
	Cancelled { request_id: String },
}

impl AggregationError {
	/// Failures collected before the aggregation gave up, if any
	pub fn failures(&self) -> &[SourceFailure] {
		match self {
			AggregationError::NoRouteFound { failures } => failures,
			_ => &[],
		}
	}
}

fn no_route_message(failures: &[SourceFailure]) -> String {
	if failures.is_empty() {
		return "No route found".to_string();
	}

	let reasons: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
	format!("No route found: {}", reasons.join(" | "))
}
