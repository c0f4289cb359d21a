//! Configuration settings structures

use crate::configurable_value::ConfigurableValue;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tradepulse_types::{Network, TokenCatalog, TokenInfo};

pub const UNISWAP_V3_QUOTER: &str = "0x61ffe014ba17989e743c5f6cb21bf9697530b21e";
pub const PANCAKESWAP_V3_QUOTER: &str = "0xB048Bbc1Ee6b733FFfCFb9e9CeF7375518e25997";
pub const CURVE_ETHEREUM_POOL: &str = "0x960ea3e3c7fb317332d990873d354e18d7645590";

pub const PARASWAP_ENDPOINT: &str = "https://apiv5.paraswap.io";
pub const OPENOCEAN_ENDPOINT: &str = "https://open-api.openocean.finance/v3";
pub const ZEROX_ENDPOINT: &str = "https://api.0x.org";

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
	pub networks: Vec<NetworkSettings>,
	/// Sources in priority order; earlier sources win ties
	pub sources: Vec<SourceSettings>,
	#[serde(default)]
	pub tokens: Vec<TokenInfo>,
	pub timeouts: TimeoutSettings,
	pub logging: LoggingSettings,
}

/// Read endpoint and chain constants for one network
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkSettings {
	pub network: Network,
	pub rpc_url: ConfigurableValue,
	/// Wrapped native token substituted for the native sentinel in on-chain calls
	pub wrapped_native: Option<String>,
}

/// Individual liquidity source configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceSettings {
	pub source_id: String,
	/// Display name reported on quotes; defaults to `source_id`
	pub name: Option<String>,
	#[serde(default = "default_enabled")]
	pub enabled: bool,
	/// Networks this source is applicable to
	pub networks: Vec<Network>,
	/// Overrides `timeouts.per_source_ms`
	pub timeout_ms: Option<u64>,
	pub venue: VenueSettings,
}

fn default_enabled() -> bool {
	true
}

/// How a source is reached
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VenueSettings {
	/// Uniswap V3 style `quoteExactInputSingle` quoter
	UniswapV3 {
		fee: u32,
		#[serde(default)]
		quoter_version: QuoterVersion,
		quoters: HashMap<Network, String>,
	},
	Curve {
		pools: HashMap<Network, CurvePoolSettings>,
	},
	Paraswap {
		endpoint: String,
	},
	OpenOcean {
		endpoint: String,
		/// Gas price in wei, as sent in `gasPriceDecimals`
		#[serde(default = "default_gas_price")]
		gas_price: String,
	},
	ZeroEx {
		endpoint: String,
		api_key: Option<ConfigurableValue>,
	},
}

fn default_gas_price() -> String {
	"1000000000".to_string()
}

impl VenueSettings {
	pub fn is_on_chain(&self) -> bool {
		matches!(self, Self::UniswapV3 { .. } | Self::Curve { .. })
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			Self::UniswapV3 { .. } => "uniswap_v3",
			Self::Curve { .. } => "curve",
			Self::Paraswap { .. } => "paraswap",
			Self::OpenOcean { .. } => "open_ocean",
			Self::ZeroEx { .. } => "zero_ex",
		}
	}
}

/// ABI flavour of a V3 quoter contract
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoterVersion {
	/// Flat arguments, returns `uint256 amountOut`
	V1,
	/// Struct argument, returns `(amountOut, sqrtPriceX96After, ticksCrossed, gasEstimate)`
	#[default]
	V2,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CurvePoolSettings {
	pub address: String,
	#[serde(default)]
	pub i: i32,
	#[serde(default = "default_curve_j")]
	pub j: i32,
	/// Token address at index `i`; when set, other input tokens are rejected
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub coin_in: Option<String>,
	/// Token address at index `j`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub coin_out: Option<String>,
}

impl CurvePoolSettings {
	/// Whether the pool's configured coins cover the requested pair.
	/// Unset coins match anything.
	pub fn serves_pair(&self, token_in: &str, token_out: &str) -> bool {
		let matches = |coin: &Option<String>, token: &str| {
			coin.as_deref().map_or(true, |coin| coin.eq_ignore_ascii_case(token))
		};
		matches(&self.coin_in, token_in) && matches(&self.coin_out, token_out)
	}
}

fn default_curve_j() -> i32 {
	1
}

/// Timeout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeoutSettings {
	/// Per-source timeout in milliseconds
	pub per_source_ms: u64,
	/// Request timeout for HTTP clients
	pub request_ms: u64,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// Problems found by [`Settings::validate`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
	#[error("Duplicate source id '{0}'")]
	DuplicateSource(String),

	#[error("Duplicate settings for network {0}")]
	DuplicateNetwork(Network),

	#[error("Timeout '{field}' must be greater than zero")]
	ZeroTimeout { field: String },

	#[error("Source '{source_id}' declares no networks")]
	NoNetworks { source_id: String },

	#[error("Source '{source_id}' reads {network} on-chain but no RPC is configured for it")]
	MissingNetwork { source_id: String, network: Network },

	#[error("Source '{source_id}' has an empty endpoint")]
	EmptyEndpoint { source_id: String },
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			networks: vec![
				NetworkSettings {
					network: Network::Ethereum,
					rpc_url: ConfigurableValue::from_template(
						"https://mainnet.infura.io/v3/${INFURA_API_KEY}",
					)
					.with_fallback("https://cloudflare-eth.com"),
					wrapped_native: Some("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".to_string()),
				},
				NetworkSettings {
					network: Network::Arbitrum,
					rpc_url: ConfigurableValue::from_plain("https://arb1.arbitrum.io/rpc"),
					wrapped_native: Some("0x82aF49447D8a07e3bd95BD0d56f35241523fBab1".to_string()),
				},
				NetworkSettings {
					network: Network::Base,
					rpc_url: ConfigurableValue::from_plain("https://mainnet.base.org"),
					wrapped_native: Some("0x4200000000000000000000000000000000000006".to_string()),
				},
				NetworkSettings {
					network: Network::Bnb,
					rpc_url: ConfigurableValue::from_plain("https://bsc-dataseed.binance.org/"),
					wrapped_native: Some("0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c".to_string()),
				},
			],
			sources: default_sources(),
			tokens: TokenCatalog::arbitrum_defaults()
				.tokens_on(Network::Arbitrum)
				.into_iter()
				.cloned()
				.collect(),
			timeouts: TimeoutSettings {
				per_source_ms: 5000,
				request_ms: 10000,
			},
			logging: LoggingSettings {
				level: "info".to_string(),
				format: LogFormat::Pretty,
				structured: false,
			},
		}
	}
}

fn default_sources() -> Vec<SourceSettings> {
	let uniswap_networks = [Network::Base, Network::Ethereum, Network::Arbitrum];
	vec![
		SourceSettings {
			source_id: "uniswap".to_string(),
			name: Some("Uniswap".to_string()),
			enabled: true,
			networks: uniswap_networks.to_vec(),
			timeout_ms: None,
			venue: VenueSettings::UniswapV3 {
				fee: 3000,
				quoter_version: QuoterVersion::V2,
				quoters: uniswap_networks
					.iter()
					.map(|network| (*network, UNISWAP_V3_QUOTER.to_string()))
					.collect(),
			},
		},
		SourceSettings {
			source_id: "pancakeswap".to_string(),
			name: Some("PancakeSwap".to_string()),
			enabled: true,
			networks: vec![Network::Bnb],
			timeout_ms: None,
			venue: VenueSettings::UniswapV3 {
				fee: 2500,
				quoter_version: QuoterVersion::V2,
				quoters: HashMap::from([(Network::Bnb, PANCAKESWAP_V3_QUOTER.to_string())]),
			},
		},
		SourceSettings {
			source_id: "curve".to_string(),
			name: Some("Curve".to_string()),
			enabled: true,
			networks: vec![Network::Ethereum],
			timeout_ms: None,
			venue: VenueSettings::Curve {
				pools: HashMap::from([(
					Network::Ethereum,
					CurvePoolSettings {
						address: CURVE_ETHEREUM_POOL.to_string(),
						i: 0,
						j: 1,
						coin_in: None,
						coin_out: None,
					},
				)]),
			},
		},
		SourceSettings {
			source_id: "paraswap".to_string(),
			name: Some("ParaSwap".to_string()),
			enabled: true,
			networks: Network::ALL.to_vec(),
			timeout_ms: None,
			venue: VenueSettings::Paraswap {
				endpoint: PARASWAP_ENDPOINT.to_string(),
			},
		},
		SourceSettings {
			source_id: "openocean".to_string(),
			name: Some("OpenOcean".to_string()),
			enabled: true,
			networks: Network::ALL.to_vec(),
			timeout_ms: None,
			venue: VenueSettings::OpenOcean {
				endpoint: OPENOCEAN_ENDPOINT.to_string(),
				gas_price: default_gas_price(),
			},
		},
		SourceSettings {
			source_id: "zeroex".to_string(),
			name: Some("0x".to_string()),
			// Needs an API key
			enabled: false,
			networks: Network::ALL.to_vec(),
			timeout_ms: None,
			venue: VenueSettings::ZeroEx {
				endpoint: ZEROX_ENDPOINT.to_string(),
				api_key: Some(ConfigurableValue::from_env("ZEROX_API_KEY")),
			},
		},
	]
}

impl Settings {
	/// Get enabled sources only, in configured order
	pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceSettings> {
		self.sources.iter().filter(|source| source.enabled)
	}

	pub fn network(&self, network: Network) -> Option<&NetworkSettings> {
		self.networks.iter().find(|settings| settings.network == network)
	}

	/// Configured tokens as a symbol lookup table
	pub fn token_catalog(&self) -> TokenCatalog {
		TokenCatalog::from_tokens(self.tokens.iter().cloned())
	}

	/// Effective timeout for one source
	pub fn source_timeout_ms(&self, source: &SourceSettings) -> u64 {
		source.timeout_ms.unwrap_or(self.timeouts.per_source_ms)
	}

	/// Check cross-field constraints the deserializer cannot express
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		if self.timeouts.per_source_ms == 0 {
			return Err(ConfigValidationError::ZeroTimeout {
				field: "timeouts.per_source_ms".to_string(),
			});
		}
		if self.timeouts.request_ms == 0 {
			return Err(ConfigValidationError::ZeroTimeout {
				field: "timeouts.request_ms".to_string(),
			});
		}

		let mut networks = HashSet::new();
		for settings in &self.networks {
			if !networks.insert(settings.network) {
				return Err(ConfigValidationError::DuplicateNetwork(settings.network));
			}
		}

		let mut ids = HashSet::new();
		for source in &self.sources {
			if !ids.insert(source.source_id.as_str()) {
				return Err(ConfigValidationError::DuplicateSource(source.source_id.clone()));
			}
			if source.timeout_ms == Some(0) {
				return Err(ConfigValidationError::ZeroTimeout {
					field: format!("sources.{}.timeout_ms", source.source_id),
				});
			}
			if !source.enabled {
				continue;
			}
			if source.networks.is_empty() {
				return Err(ConfigValidationError::NoNetworks {
					source_id: source.source_id.clone(),
				});
			}
			match &source.venue {
				VenueSettings::Paraswap { endpoint }
				| VenueSettings::OpenOcean { endpoint, .. }
				| VenueSettings::ZeroEx { endpoint, .. }
					if endpoint.trim().is_empty() =>
				{
					return Err(ConfigValidationError::EmptyEndpoint {
						source_id: source.source_id.clone(),
					});
				},
				venue if venue.is_on_chain() => {
					if let Some(network) = source.networks.iter().find(|n| !networks.contains(*n)) {
						return Err(ConfigValidationError::MissingNetwork {
							source_id: source.source_id.clone(),
							network: *network,
						});
					}
				},
				_ => {},
			}
		}

		Ok(())
	}
}
