//! TradePulse Swap
//!
//! Best-rate swap quoting for the TradePulse front end: a request is fanned
//! out to on-chain quoters (Uniswap V3, PancakeSwap V3, Curve) and DEX
//! aggregator APIs (ParaSwap, OpenOcean, 0x), and the largest output wins.
//!
//! ```rust,no_run
//! use tradepulse_swap::{Network, QuoterBuilder};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let quoter = QuoterBuilder::from_config()?.build()?;
//! let request = quoter.request_for_symbols(Network::Arbitrum, "ETH", "USDC", "1")?;
//! let result = quoter.quote(&request).await?;
//! println!("{} via {}", result.best.output_amount, result.best.source);
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// Core domain types
pub use tradepulse_types::{
	chrono,
	serde_json,
	AdapterError,
	AdapterResult,
	AggregationError,
	AggregationResult,
	FailureKind,
	IntegrationStyle,
	Network,
	Quote,
	QuoteRequest,
	QuoteValidationError,
	SecretString,
	SourceAdapter,
	SourceFailure,
	SourceInfo,
	TokenAmount,
	TokenCatalog,
	TokenInfo,
	U256,
};

// Service layer
pub use tradepulse_service::{QuoteSupervisor, RateAggregator};

// Adapters
pub use tradepulse_adapters::{
	AdapterFactory, AdapterRegistry, AlloyChainReader, ChainReader, ClientCache, ProviderError,
	ProviderRegistry,
};

// Config
pub use tradepulse_config::{
	load_config, log_service_info, log_startup_complete, ConfigLoadError, ConfigValidationError,
	Settings,
};

pub mod models {
	pub use tradepulse_types::*;
}

pub mod config {
	pub use tradepulse_config::*;
}

pub mod adapters {
	pub use tradepulse_adapters::*;
}

pub mod service {
	pub use tradepulse_service::*;
}

pub mod mocks;

// Re-export for custom adapter implementations
pub use async_trait;

/// Errors raised while wiring a [`Quoter`]
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
	#[error(transparent)]
	Config(#[from] ConfigLoadError),

	#[error("Invalid configuration: {0}")]
	Validation(#[from] ConfigValidationError),

	#[error(transparent)]
	Provider(#[from] ProviderError),

	#[error("Failed to create source: {0}")]
	Adapter(#[from] AdapterError),

	#[error("Failed to initialise logging: {0}")]
	Tracing(String),
}

/// Builder wiring settings into providers, adapters and the aggregator
#[derive(Default)]
pub struct QuoterBuilder {
	settings: Option<Settings>,
	providers: Option<ProviderRegistry>,
	client_cache: Option<ClientCache>,
	extra_adapters: Vec<Arc<dyn SourceAdapter>>,
	configured_sources: bool,
}

impl QuoterBuilder {
	/// Builder over default settings
	pub fn new() -> Self {
		Self {
			configured_sources: true,
			..Default::default()
		}
	}

	/// Builder over settings loaded from `config/config` and the environment
	pub fn from_config() -> Result<Self, BuilderError> {
		Ok(Self::new().with_settings(load_config()?))
	}

	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Use these read providers instead of connecting to the configured RPC URLs
	pub fn with_providers(mut self, providers: ProviderRegistry) -> Self {
		self.providers = Some(providers);
		self
	}

	pub fn with_client_cache(mut self, cache: ClientCache) -> Self {
		self.client_cache = Some(cache);
		self
	}

	/// Add a source after the configured ones
	pub fn with_adapter(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
		self.extra_adapters.push(adapter);
		self
	}

	/// Ignore `settings.sources`; only adapters added with [`Self::with_adapter`] are used
	pub fn without_configured_sources(mut self) -> Self {
		self.configured_sources = false;
		self
	}

	/// Install the global tracing subscriber described by the logging settings
	///
	/// `RUST_LOG` takes precedence over the configured level. Output goes to
	/// stderr so that stdout stays machine readable.
	pub fn init_tracing(&self) -> Result<(), BuilderError> {
		use tradepulse_config::LogFormat;

		let default_settings = Settings::default();
		let settings = self.settings.as_ref().unwrap_or(&default_settings);
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));
		let structured = settings.logging.structured;

		let result = match settings.logging.format {
			LogFormat::Json => tracing_subscriber::fmt()
				.json()
				.with_env_filter(env_filter)
				.with_writer(std::io::stderr)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
			LogFormat::Pretty => tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter)
				.with_writer(std::io::stderr)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
			LogFormat::Compact => tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter)
				.with_writer(std::io::stderr)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
		};
		result.map_err(|e| BuilderError::Tracing(e.to_string()))?;

		info!(
			"Logging configuration applied: level={}, format={:?}, structured={}",
			settings.logging.level, settings.logging.format, settings.logging.structured
		);
		Ok(())
	}

	/// Validate settings, connect providers and create every source
	pub fn build(self) -> Result<Quoter, BuilderError> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let mut registry = AdapterRegistry::new();
		let mut source_timeouts = HashMap::new();

		if self.configured_sources {
			let providers = match self.providers {
				Some(providers) => providers,
				None => ProviderRegistry::from_settings(&settings)?,
			};
			let mut factory = AdapterFactory::from_settings(&settings, providers);
			if let Some(cache) = self.client_cache {
				factory = factory.with_cache(cache);
			}
			registry = factory.create_registry(&settings)?;

			for source in settings.enabled_sources() {
				if let Some(timeout_ms) = source.timeout_ms {
					source_timeouts.insert(source.source_id.clone(), Duration::from_millis(timeout_ms));
				}
			}
		}

		for adapter in self.extra_adapters {
			registry.register(adapter)?;
		}

		info!(
			"Quoter configured with {} sources: {}",
			registry.len(),
			registry.ids().join(", ")
		);

		let aggregator = Arc::new(
			RateAggregator::new(
				registry.into_adapters(),
				Duration::from_millis(settings.timeouts.per_source_ms),
			)
			.with_source_timeouts(source_timeouts),
		);

		Ok(Quoter {
			catalog: settings.token_catalog(),
			supervisor: QuoteSupervisor::new(aggregator.clone()),
			aggregator,
			settings,
		})
	}
}

/// Ready-to-use quoting facade
#[derive(Debug)]
pub struct Quoter {
	settings: Settings,
	catalog: TokenCatalog,
	aggregator: Arc<RateAggregator>,
	supervisor: QuoteSupervisor,
}

impl Quoter {
	/// Aggregate one request
	pub async fn quote(&self, request: &QuoteRequest) -> Result<AggregationResult, AggregationError> {
		self.aggregator.aggregate_quotes(request).await
	}

	/// Aggregate, cancelling any aggregation started earlier through this method
	pub async fn quote_latest(
		&self,
		request: &QuoteRequest,
	) -> Result<AggregationResult, AggregationError> {
		self.supervisor.quote_latest(request).await
	}

	/// Build a request from configured token symbols and a human amount
	pub fn request_for_symbols(
		&self,
		network: Network,
		symbol_in: &str,
		symbol_out: &str,
		amount: &str,
	) -> Result<QuoteRequest, QuoteValidationError> {
		QuoteRequest::from_symbols(&self.catalog, network, symbol_in, symbol_out, amount)
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn catalog(&self) -> &TokenCatalog {
		&self.catalog
	}

	pub fn aggregator(&self) -> &Arc<RateAggregator> {
		&self.aggregator
	}

	pub fn supervisor(&self) -> &QuoteSupervisor {
		&self.supervisor
	}
}

/// Request accepted by the command line tool
///
/// Either a full [`QuoteRequest`] with addresses and raw amounts, or token
/// symbols from the configured catalog with a human amount.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuoteInput {
	Request(QuoteRequest),
	Symbols {
		network: Network,
		from: String,
		to: String,
		amount: String,
	},
}

impl QuoteInput {
	pub fn into_request(self, quoter: &Quoter) -> Result<QuoteRequest, QuoteValidationError> {
		match self {
			QuoteInput::Request(request) => {
				request.validate()?;
				Ok(request)
			},
			QuoteInput::Symbols {
				network,
				from,
				to,
				amount,
			} => quoter.request_for_symbols(network, &from, &to, &amount),
		}
	}
}
