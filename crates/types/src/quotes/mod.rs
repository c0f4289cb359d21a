//! Quote domain models: requests, per-source answers and aggregation results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod errors;
pub mod request;

pub use errors::{AggregationError, QuoteValidationError};
pub use request::QuoteRequest;

use crate::adapters::FailureKind;
use crate::models::TokenAmount;

/// One source's answer to a quote request
///
/// Created fresh per request by an adapter and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
	/// Liquidity venue that produced the quote, e.g. "Uniswap"
	pub source: String,

	/// Amount of the output token, in output-token units
	pub output_amount: TokenAmount,

	/// Best venue reported by an aggregator API, when it attributes one
	#[serde(skip_serializing_if = "Option::is_none")]
	pub venue: Option<String>,

	/// Source payload needed later to build a transaction; opaque here
	#[serde(skip_serializing_if = "Option::is_none")]
	pub raw: Option<Arc<serde_json::Value>>,

	pub response_time_ms: u64,

	pub quoted_at: DateTime<Utc>,
}

impl Quote {
	pub fn new(source: impl Into<String>, output_amount: TokenAmount) -> Self {
		Self {
			source: source.into(),
			output_amount,
			venue: None,
			raw: None,
			response_time_ms: 0,
			quoted_at: Utc::now(),
		}
	}

	pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
		self.venue = Some(venue.into());
		self
	}

	pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
		self.raw = Some(Arc::new(raw));
		self
	}

	pub fn with_response_time(mut self, response_time_ms: u64) -> Self {
		self.response_time_ms = response_time_ms;
		self
	}
}

/// A source that was tried and did not produce a usable quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
	pub source: String,
	/// Underlying error message, preserved verbatim
	pub reason: String,
	pub kind: FailureKind,
}

impl SourceFailure {
	pub fn new(source: impl Into<String>, reason: impl Into<String>, kind: FailureKind) -> Self {
		Self {
			source: source.into(),
			reason: reason.into(),
			kind,
		}
	}
}

impl fmt::Display for SourceFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.source, self.reason)
	}
}

/// Outcome of a successful aggregation
///
/// Only exists when at least one source produced a quote.
#[derive(Debug, Clone, Serialize)]
pub struct AggregationResult {
	pub request_id: String,

	/// Quote with the numerically largest output amount
	pub best: Quote,

	/// Every successful quote, best first; equal amounts keep source order
	pub quotes: Vec<Quote>,

	/// Sources that were tried and failed, in configured order
	pub failures: Vec<SourceFailure>,

	/// Sources not applicable to the requested network
	pub skipped: Vec<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::adapters::FailureKind;

	#[test]
	fn test_quote_builder() {
		let amount = TokenAmount::parse_units("1805.12", 6).unwrap();
		let quote = Quote::new("ParaSwap", amount)
			.with_venue("UniswapV3")
			.with_raw(serde_json::json!({ "destAmount": "1805120000" }))
			.with_response_time(42);

		assert_eq!(quote.source, "ParaSwap");
		assert_eq!(quote.venue.as_deref(), Some("UniswapV3"));
		assert_eq!(quote.response_time_ms, 42);

		let json = serde_json::to_value(&quote).unwrap();
		assert_eq!(json["output_amount"], "1805.12");
		assert_eq!(json["raw"]["destAmount"], "1805120000");
	}

	#[test]
	fn test_no_route_message_lists_every_failure() {
		let error = AggregationError::NoRouteFound {
			failures: vec![
				SourceFailure::new("Uniswap", "RPC call failed: execution reverted", FailureKind::Call),
				SourceFailure::new("ParaSwap-REST", "HTTP 500: upstream", FailureKind::Call),
			],
		};
		let message = error.to_string();
		assert_eq!(
			message,
			"No route found: Uniswap: RPC call failed: execution reverted | ParaSwap-REST: HTTP 500: upstream"
		);
		assert_eq!(error.failures().len(), 2);

		let empty = AggregationError::NoRouteFound { failures: vec![] };
		assert_eq!(empty.to_string(), "No route found");
	}
}
