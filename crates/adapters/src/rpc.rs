//! Read providers for the on-chain sources
//!
//! On-chain adapters never talk to alloy directly; they go through
//! [`ChainReader`] so that one provider per network is shared by every source
//! and request, and so that quoting logic can be exercised without a node.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use tradepulse_config::{ConfigurableValueError, Settings};
use tradepulse_types::{AdapterError, AdapterResult, Network};
use url::Url;

/// Read-only `eth_call` access to one chain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainReader: Send + Sync + fmt::Debug {
	/// Execute `calldata` against `to` at the latest block and return the raw result
	async fn call(&self, to: Address, calldata: Bytes) -> AdapterResult<Bytes>;
}

/// Errors raised while building read providers from settings
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
	#[error("Failed to resolve RPC URL for {network}: {error}")]
	Resolve {
		network: Network,
		error: ConfigurableValueError,
	},

	#[error("Invalid RPC URL for {network}: {reason}")]
	InvalidUrl { network: Network, reason: String },
}

/// [`ChainReader`] backed by an alloy HTTP provider
#[derive(Clone)]
pub struct AlloyChainReader {
	network: Network,
	provider: DynProvider,
}

impl AlloyChainReader {
	pub fn connect_http(network: Network, rpc_url: &str) -> Result<Self, ProviderError> {
		let url = Url::parse(rpc_url).map_err(|e| ProviderError::InvalidUrl {
			network,
			reason: e.to_string(),
		})?;
		let provider = ProviderBuilder::new().connect_http(url);
		Ok(Self {
			network,
			provider: DynProvider::new(provider),
		})
	}

	pub fn network(&self) -> Network {
		self.network
	}
}

impl fmt::Debug for AlloyChainReader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AlloyChainReader")
			.field("network", &self.network)
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl ChainReader for AlloyChainReader {
	async fn call(&self, to: Address, calldata: Bytes) -> AdapterResult<Bytes> {
		let tx = TransactionRequest::default()
			.with_to(to)
			.with_input(calldata);
		self.provider
			.call(tx)
			.await
			.map_err(|e| AdapterError::Rpc(e.to_string()))
	}
}

/// One shared [`ChainReader`] per network
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
	readers: HashMap<Network, Arc<dyn ChainReader>>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Connect an alloy provider for every configured network
	pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
		let mut registry = Self::new();
		for network_settings in &settings.networks {
			let network = network_settings.network;
			let rpc_url = network_settings
				.rpc_url
				.resolve_for_secret()
				.map_err(|error| ProviderError::Resolve { network, error })?;
			debug!(
				"Connecting read provider for {} via {}",
				network,
				network_settings.rpc_url.description()
			);
			let reader = AlloyChainReader::connect_http(network, rpc_url.expose_secret())?;
			registry.insert(network, Arc::new(reader));
		}
		Ok(registry)
	}

	/// Register or replace the reader for a network
	pub fn insert(&mut self, network: Network, reader: Arc<dyn ChainReader>) {
		self.readers.insert(network, reader);
	}

	pub fn with_reader(mut self, network: Network, reader: Arc<dyn ChainReader>) -> Self {
		self.insert(network, reader);
		self
	}

	pub fn get(&self, network: Network) -> AdapterResult<Arc<dyn ChainReader>> {
		self.readers
			.get(&network)
			.cloned()
			.ok_or(AdapterError::MissingProvider(network))
	}

	pub fn networks(&self) -> Vec<Network> {
		let mut networks: Vec<Network> = self.readers.keys().copied().collect();
		networks.sort();
		networks
	}
}
