//! Core source adapter trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::{AdapterResult, SourceInfo};
use crate::models::Network;
use crate::quotes::{Quote, QuoteRequest};

/// One liquidity venue behind a uniform quoting contract
///
/// On-chain quoters and aggregator REST APIs both implement this trait, so
/// the aggregator never needs to know which kind of source it is talking to.
#[async_trait]
pub trait SourceAdapter: Send + Sync + Debug {
	/// Static description of the source
	fn info(&self) -> &SourceInfo;

	/// Source identifier used in failure trails and logs
	fn id(&self) -> &str {
		&self.info().source_id
	}

	/// Display name recorded on quotes
	fn name(&self) -> &str {
		&self.info().name
	}

	/// Whether the venue applies to the network at all
	///
	/// Sources that return `false` are never invoked for that network.
	fn supports_network(&self, network: Network) -> bool;

	/// Quote `request.amount_in` of `token_in` into `token_out`
	async fn quote(&self, request: &QuoteRequest) -> AdapterResult<Quote>;
}
