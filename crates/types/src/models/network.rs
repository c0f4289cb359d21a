//! Blockchain network models

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chains the quoter knows how to price swaps on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
	Ethereum,
	Arbitrum,
	Base,
	Bnb,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unsupported network {0}")]
pub struct NetworkParseError(pub String);

impl Network {
	pub const ALL: [Network; 4] = [
		Network::Ethereum,
		Network::Arbitrum,
		Network::Base,
		Network::Bnb,
	];

	/// EVM chain id
	pub fn chain_id(&self) -> u64 {
		match self {
			Network::Ethereum => 1,
			Network::Arbitrum => 42161,
			Network::Base => 8453,
			Network::Bnb => 56,
		}
	}

	/// Lowercase identifier used in configuration and logs
	pub fn as_str(&self) -> &'static str {
		match self {
			Network::Ethereum => "ethereum",
			Network::Arbitrum => "arbitrum",
			Network::Base => "base",
			Network::Bnb => "bnb",
		}
	}

	/// Chain code used in OpenOcean API paths
	pub fn open_ocean_code(&self) -> &'static str {
		match self {
			Network::Ethereum => "eth",
			Network::Arbitrum => "arbitrum",
			Network::Base => "base",
			Network::Bnb => "bsc",
		}
	}

	pub fn from_chain_id(chain_id: u64) -> Option<Self> {
		Self::ALL.into_iter().find(|n| n.chain_id() == chain_id)
	}
}

impl fmt::Display for Network {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Network {
	type Err = NetworkParseError;

	/// Accepts a network name (case-insensitive) or a decimal chain id
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		if let Ok(chain_id) = trimmed.parse::<u64>() {
			return Self::from_chain_id(chain_id)
				.ok_or_else(|| NetworkParseError(trimmed.to_string()));
		}

		match trimmed.to_ascii_lowercase().as_str() {
			"ethereum" | "mainnet" | "eth" => Ok(Network::Ethereum),
			"arbitrum" | "arbitrum-one" => Ok(Network::Arbitrum),
			"base" => Ok(Network::Base),
			"bnb" | "bsc" => Ok(Network::Bnb),
			_ => Err(NetworkParseError(trimmed.to_string())),
		}
	}
}

/// Same inputs as [`FromStr`], plus bare JSON chain ids
impl<'de> Deserialize<'de> for Network {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct NetworkVisitor;

		impl<'de> de::Visitor<'de> for NetworkVisitor {
			type Value = Network;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a network name or chain id")
			}

			fn visit_str<E: de::Error>(self, value: &str) -> Result<Network, E> {
				value.parse().map_err(E::custom)
			}

			fn visit_u64<E: de::Error>(self, value: u64) -> Result<Network, E> {
				Network::from_chain_id(value)
					.ok_or_else(|| E::custom(NetworkParseError(value.to_string())))
			}

			fn visit_i64<E: de::Error>(self, value: i64) -> Result<Network, E> {
				u64::try_from(value)
					.map_err(|_| E::custom(NetworkParseError(value.to_string())))
					.and_then(|chain_id| self.visit_u64(chain_id))
			}
		}

		deserializer.deserialize_any(NetworkVisitor)
	}
}
