//! Mock sources for examples and testing
//!
//! [`MockSource`] answers every request with a fixed human amount (or a fixed
//! error) after an optional delay, without touching the network.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tradepulse_types::{
	AdapterError, AdapterResult, IntegrationStyle, Network, Quote, QuoteRequest, SourceAdapter,
	SourceInfo, TokenAmount,
};

#[derive(Debug, Clone)]
enum MockBehavior {
	Quote {
		amount: String,
		venue: Option<String>,
	},
	Fail(String),
	/// Pretends the network is unsupported at call time
	Decline,
}

/// Deterministic in-memory source
#[derive(Debug, Clone)]
pub struct MockSource {
	info: SourceInfo,
	networks: Option<Vec<Network>>,
	delay: Duration,
	behavior: MockBehavior,
	calls: Arc<AtomicUsize>,
}

impl MockSource {
	/// Source quoting `amount` (human units of the output token); the id is the lowercased name
	pub fn new(name: &str, amount: &str) -> Self {
		Self {
			info: SourceInfo::new(&name.to_lowercase(), name, IntegrationStyle::Rest)
				.with_description("Mock source"),
			networks: None,
			delay: Duration::ZERO,
			behavior: MockBehavior::Quote {
				amount: amount.to_string(),
				venue: None,
			},
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// Source failing every call with an RPC error carrying `reason`
	pub fn failing(name: &str, reason: &str) -> Self {
		Self {
			behavior: MockBehavior::Fail(reason.to_string()),
			..Self::new(name, "0")
		}
	}

	/// Source that claims support but declines the network when called
	pub fn declining(name: &str) -> Self {
		Self {
			behavior: MockBehavior::Decline,
			..Self::new(name, "0")
		}
	}

	pub fn with_id(mut self, source_id: &str) -> Self {
		self.info.source_id = source_id.to_string();
		self
	}

	/// Restrict the networks this source claims (all networks by default)
	pub fn on_networks(mut self, networks: Vec<Network>) -> Self {
		self.networks = Some(networks);
		self
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;
		self
	}

	pub fn with_venue(mut self, venue: &str) -> Self {
		if let MockBehavior::Quote { venue: ref mut v, .. } = self.behavior {
			*v = Some(venue.to_string());
		}
		self
	}

	/// Number of times `quote` has been called, shared between clones
	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn call_counter(&self) -> Arc<AtomicUsize> {
		self.calls.clone()
	}
}

#[async_trait]
impl SourceAdapter for MockSource {
	fn info(&self) -> &SourceInfo {
		&self.info
	}

	fn supports_network(&self, network: Network) -> bool {
		self.networks
			.as_ref()
			.map_or(true, |networks| networks.contains(&network))
	}

	async fn quote(&self, request: &QuoteRequest) -> AdapterResult<Quote> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}

		match &self.behavior {
			MockBehavior::Quote { amount, venue } => {
				let mut quote = Quote::new(
					&self.info.name,
					TokenAmount::parse_units(amount, request.output_decimals)?,
				)
				.with_response_time(self.delay.as_millis() as u64);
				if let Some(venue) = venue {
					quote = quote.with_venue(venue);
				}
				Ok(quote)
			},
			MockBehavior::Fail(reason) => Err(AdapterError::Rpc(reason.clone())),
			MockBehavior::Decline => Err(AdapterError::UnsupportedNetwork {
				network: request.network,
				source_id: self.info.source_id.clone(),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tradepulse_types::U256;

	fn request() -> QuoteRequest {
		QuoteRequest::new(Network::Base, "0x01", "0x02", U256::from(1u64), 6)
	}

	#[tokio::test]
	async fn test_mock_source_quotes_and_counts() {
		let source = MockSource::new("Uniswap", "1800.5").with_venue("pool-3000");
		let clone = source.clone();

		let quote = source.quote(&request()).await.unwrap();
		assert_eq!(quote.output_amount.to_string(), "1800.5");
		assert_eq!(quote.venue.as_deref(), Some("pool-3000"));
		assert_eq!(clone.call_count(), 1);
		assert_eq!(source.id(), "uniswap");
	}

	#[tokio::test]
	async fn test_mock_source_failure_modes() {
		let err = MockSource::failing("Curve", "boom").quote(&request()).await.unwrap_err();
		assert_eq!(err.to_string(), "RPC call failed: boom");

		let err = MockSource::declining("Curve").quote(&request()).await.unwrap_err();
		assert!(err.is_unsupported_network());

		let restricted = MockSource::new("PancakeSwap", "1").on_networks(vec![Network::Bnb]);
		assert!(!restricted.supports_network(Network::Base));
	}
}
