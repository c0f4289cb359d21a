//! Token metadata and symbol lookup

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Network;

/// Sentinel address aggregator APIs use for the chain's native asset
pub const NATIVE_TOKEN_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// Token known to the quoter on one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
	pub network: Network,
	pub symbol: String,
	pub address: String,
	pub decimals: u8,
}

impl TokenInfo {
	pub fn new(network: Network, symbol: &str, address: &str, decimals: u8) -> Self {
		Self {
			network,
			symbol: symbol.to_string(),
			address: address.to_string(),
			decimals,
		}
	}

	pub fn is_native(&self) -> bool {
		self.address.eq_ignore_ascii_case(NATIVE_TOKEN_ADDRESS)
	}
}

/// Per-network symbol table
///
/// Symbols are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct TokenCatalog {
	tokens: HashMap<(Network, String), TokenInfo>,
}

impl TokenCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_tokens(tokens: impl IntoIterator<Item = TokenInfo>) -> Self {
		let mut catalog = Self::new();
		for token in tokens {
			catalog.insert(token);
		}
		catalog
	}

	/// Arbitrum token list shipped with the swap front end
	pub fn arbitrum_defaults() -> Self {
		let n = Network::Arbitrum;
		Self::from_tokens([
			TokenInfo::new(n, "ETH", NATIVE_TOKEN_ADDRESS, 18),
			TokenInfo::new(n, "USDC", "0xaf88d065e77c8cC2239327C5EDb3A432268e5831", 6),
			TokenInfo::new(n, "DAI", "0xDA10009cBd5D07dd0CeCc66161FC93D7c9000da1", 18),
			TokenInfo::new(n, "WBTC", "0x2f2a2543B76A4166549F7aaB2e75Bef0aefC5B0f", 8),
			TokenInfo::new(n, "ARB", "0x912CE59144191C1204E64559FE8253a0e49E6548", 18),
			TokenInfo::new(n, "UNI", "0xFa7F8980b0f1E64A2062791cc3b0871572f1F7f0", 18),
			TokenInfo::new(n, "LINK", "0xf97f4df75117a78c1A5a0DBb814Af92458539FB4", 18),
			TokenInfo::new(n, "WETH", "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1", 18),
			TokenInfo::new(n, "GMX", "0xfc5A1A6EB076a2C7aD06eD22C90d7E710E35ad0a", 18),
		])
	}

	/// Insert or replace a token; returns the previous entry for the same symbol
	pub fn insert(&mut self, token: TokenInfo) -> Option<TokenInfo> {
		let key = (token.network, token.symbol.to_ascii_uppercase());
		self.tokens.insert(key, token)
	}

	pub fn get(&self, network: Network, symbol: &str) -> Option<&TokenInfo> {
		self.tokens
			.get(&(network, symbol.trim().to_ascii_uppercase()))
	}

	/// Tokens for one network, sorted by symbol
	pub fn tokens_on(&self, network: Network) -> Vec<&TokenInfo> {
		let mut tokens: Vec<&TokenInfo> = self
			.tokens
			.values()
			.filter(|token| token.network == network)
			.collect();
		tokens.sort_by(|a, b| a.symbol.cmp(&b.symbol));
		tokens
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}
