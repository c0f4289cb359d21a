//! Timing-controlled in-memory sources and quoter helpers

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use tradepulse_swap::{mocks::MockSource, Network, QuoteRequest, Quoter, QuoterBuilder, Settings};

pub const FAST: Duration = Duration::from_millis(10);
pub const SLOW: Duration = Duration::from_millis(500);
/// Longer than any per-source budget used in the tests
pub const HANG: Duration = Duration::from_secs(60);

pub fn fast(name: &str, amount: &str) -> MockSource {
	MockSource::new(name, amount).with_delay(FAST)
}

pub fn slow(name: &str, amount: &str) -> MockSource {
	MockSource::new(name, amount).with_delay(SLOW)
}

pub fn hanging(name: &str) -> MockSource {
	MockSource::new(name, "0").with_delay(HANG)
}

/// Settings with the given per-source budget and no configured sources
pub fn settings_with_timeout(per_source_ms: u64) -> Settings {
	let mut settings = Settings::default();
	settings.timeouts.per_source_ms = per_source_ms;
	settings
}

/// Quoter over in-memory sources only, in the given order
pub fn quoter_with(sources: &[MockSource], per_source_ms: u64) -> Quoter {
	let mut builder = QuoterBuilder::new()
		.with_settings(settings_with_timeout(per_source_ms))
		.without_configured_sources();
	for source in sources {
		builder = builder.with_adapter(Arc::new(source.clone()));
	}
	builder.build().expect("quoter builds")
}

/// 1 ETH to USDC on Arbitrum from the default token list
pub fn eth_to_usdc(quoter: &Quoter) -> QuoteRequest {
	quoter
		.request_for_symbols(Network::Arbitrum, "ETH", "USDC", "1")
		.expect("default catalog has ETH and USDC on Arbitrum")
}
