//! TradePulse Adapters
//!
//! Liquidity source adapters for the TradePulse swap quoter: Uniswap and
//! PancakeSwap V3 quoters and Curve pools read on-chain, plus the ParaSwap,
//! OpenOcean and 0x aggregation APIs.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use tradepulse_config::{Settings, SourceSettings, VenueSettings};
use tradepulse_types::Network;

pub mod client_cache;
pub mod contracts;
pub mod curve_adapter;
pub mod http;
pub mod openocean_adapter;
pub mod paraswap_adapter;
pub mod rpc;
pub mod v3_quoter_adapter;
pub mod zerox_adapter;

pub use client_cache::{ClientCache, ClientConfig};
pub use curve_adapter::CurveAdapter;
pub use openocean_adapter::OpenOceanAdapter;
pub use paraswap_adapter::ParaswapAdapter;
pub use rpc::{AlloyChainReader, ChainReader, ProviderError, ProviderRegistry};
pub use tradepulse_types::{AdapterError, AdapterResult, SourceAdapter};
pub use v3_quoter_adapter::V3QuoterAdapter;
pub use zerox_adapter::ZeroExAdapter;

/// Ordered set of configured sources
///
/// Order is significant: it decides tie-breaks between equal quotes.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
	adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl AdapterRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a source; ids must be unique
	pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) -> AdapterResult<()> {
		if self.get(adapter.id()).is_some() {
			return Err(AdapterError::config(format!(
				"Source '{}' is already registered",
				adapter.id()
			)));
		}
		self.adapters.push(adapter);
		Ok(())
	}

	pub fn get(&self, source_id: &str) -> Option<&Arc<dyn SourceAdapter>> {
		self.adapters.iter().find(|adapter| adapter.id() == source_id)
	}

	pub fn adapters(&self) -> &[Arc<dyn SourceAdapter>] {
		&self.adapters
	}

	pub fn into_adapters(self) -> Vec<Arc<dyn SourceAdapter>> {
		self.adapters
	}

	pub fn ids(&self) -> Vec<&str> {
		self.adapters.iter().map(|adapter| adapter.id()).collect()
	}

	/// Sources applicable to `network`, in registry order
	pub fn supporting(&self, network: Network) -> Vec<&Arc<dyn SourceAdapter>> {
		self.adapters
			.iter()
			.filter(|adapter| adapter.supports_network(network))
			.collect()
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}

/// Builds source adapters from settings
#[derive(Debug, Clone)]
pub struct AdapterFactory {
	providers: ProviderRegistry,
	cache: ClientCache,
	request_timeout_ms: u64,
	wrapped_native: HashMap<Network, String>,
}

impl AdapterFactory {
	pub fn new(providers: ProviderRegistry, request_timeout_ms: u64) -> Self {
		Self {
			providers,
			cache: ClientCache::for_adapter(),
			request_timeout_ms,
			wrapped_native: HashMap::new(),
		}
	}

	/// Factory wired with the settings' request timeout and wrapped native tokens
	pub fn from_settings(settings: &Settings, providers: ProviderRegistry) -> Self {
		let wrapped_native = settings
			.networks
			.iter()
			.filter_map(|network| {
				network
					.wrapped_native
					.as_ref()
					.map(|address| (network.network, address.clone()))
			})
			.collect();

		Self::new(providers, settings.timeouts.request_ms).with_wrapped_native(wrapped_native)
	}

	pub fn with_cache(mut self, cache: ClientCache) -> Self {
		self.cache = cache;
		self
	}

	pub fn with_wrapped_native(mut self, wrapped_native: HashMap<Network, String>) -> Self {
		self.wrapped_native = wrapped_native;
		self
	}

	/// Create the adapter for one configured source
	pub fn create(&self, source: &SourceSettings) -> AdapterResult<Arc<dyn SourceAdapter>> {
		let id = source.source_id.as_str();
		let name = source.name.as_deref().unwrap_or(id);
		let networks = source.networks.clone();
		let timeout_ms = self.request_timeout_ms;

		let adapter: Arc<dyn SourceAdapter> = match &source.venue {
			VenueSettings::UniswapV3 {
				fee,
				quoter_version,
				quoters,
			} => Arc::new(
				V3QuoterAdapter::new(
					id,
					name,
					networks,
					*fee,
					*quoter_version,
					quoters.clone(),
					self.providers.clone(),
				)?
				.with_wrapped_native(self.wrapped_native.clone()),
			),
			VenueSettings::Curve { pools } => Arc::new(CurveAdapter::new(
				id,
				name,
				networks,
				pools.clone(),
				self.providers.clone(),
			)),
			VenueSettings::Paraswap { endpoint } => Arc::new(ParaswapAdapter::with_cache(
				id,
				name,
				networks,
				endpoint,
				timeout_ms,
				self.cache.clone(),
			)?),
			VenueSettings::OpenOcean {
				endpoint,
				gas_price,
			} => Arc::new(OpenOceanAdapter::with_cache(
				id,
				name,
				networks,
				endpoint,
				gas_price,
				timeout_ms,
				self.cache.clone(),
			)?),
			VenueSettings::ZeroEx { endpoint, api_key } => {
				let api_key = api_key
					.as_ref()
					.map(|value| value.resolve_for_secret())
					.transpose()
					.map_err(|e| {
						AdapterError::config(format!("Cannot resolve API key for '{}': {}", id, e))
					})?;
				Arc::new(ZeroExAdapter::with_cache(
					id,
					name,
					networks,
					endpoint,
					api_key.as_ref(),
					timeout_ms,
					self.cache.clone(),
				)?)
			},
		};

		debug!(
			"Created {} source '{}' for {:?}",
			source.venue.type_name(),
			id,
			source.networks
		);
		Ok(adapter)
	}

	/// Create every enabled source, in configured order
	pub fn create_registry(&self, settings: &Settings) -> AdapterResult<AdapterRegistry> {
		let mut registry = AdapterRegistry::new();
		for source in settings.enabled_sources() {
			registry.register(self.create(source)?)?;
		}
		Ok(registry)
	}
}
