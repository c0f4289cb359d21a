//! Quote request model

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::QuoteValidationError;
use crate::models::{Network, TokenAmount, TokenCatalog};

/// Parameters of one rate lookup
///
/// `amount_in` is already scaled to the input token's smallest unit;
/// `output_decimals` is only used to render the answer in human units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
	/// Correlation id for logs
	#[serde(default = "new_request_id")]
	pub request_id: String,

	pub network: Network,

	/// Venue-specific identifier of the token sold (address or symbol)
	pub token_in: String,

	/// Venue-specific identifier of the token bought (address or symbol)
	pub token_out: String,

	#[serde(with = "u256_decimal")]
	pub amount_in: U256,

	pub output_decimals: u8,

	/// Decimals of the input token, for APIs that require them
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub input_decimals: Option<u8>,
}

fn new_request_id() -> String {
	Uuid::new_v4().to_string()
}

impl QuoteRequest {
	pub fn new(
		network: Network,
		token_in: impl Into<String>,
		token_out: impl Into<String>,
		amount_in: U256,
		output_decimals: u8,
	) -> Self {
		Self {
			request_id: new_request_id(),
			network,
			token_in: token_in.into(),
			token_out: token_out.into(),
			amount_in,
			output_decimals,
			input_decimals: None,
		}
	}

	pub fn with_input_decimals(mut self, decimals: u8) -> Self {
		self.input_decimals = Some(decimals);
		self
	}

	/// Build a request from catalog symbols and a human-readable amount
	pub fn from_symbols(
		catalog: &TokenCatalog,
		network: Network,
		symbol_in: &str,
		symbol_out: &str,
		amount: &str,
	) -> Result<Self, QuoteValidationError> {
		let lookup = |symbol: &str| {
			catalog
				.get(network, symbol)
				.ok_or_else(|| QuoteValidationError::UnknownToken {
					symbol: symbol.to_string(),
					network,
				})
		};
		let token_in = lookup(symbol_in)?;
		let token_out = lookup(symbol_out)?;
		let amount_in = TokenAmount::parse_units(amount, token_in.decimals)?;

		let request = Self::new(
			network,
			token_in.address.clone(),
			token_out.address.clone(),
			amount_in.raw(),
			token_out.decimals,
		)
		.with_input_decimals(token_in.decimals);
		request.validate()?;
		Ok(request)
	}

	pub fn validate(&self) -> Result<(), QuoteValidationError> {
		if self.token_in.trim().is_empty() {
			return Err(QuoteValidationError::MissingToken {
				field: "token_in".to_string(),
			});
		}
		if self.token_out.trim().is_empty() {
			return Err(QuoteValidationError::MissingToken {
				field: "token_out".to_string(),
			});
		}
		if self.token_in.trim().eq_ignore_ascii_case(self.token_out.trim()) {
			return Err(QuoteValidationError::SameToken {
				token: self.token_in.clone(),
			});
		}
		if self.amount_in.is_zero() {
			return Err(QuoteValidationError::ZeroAmount);
		}
		Ok(())
	}
}

/// Serde helpers for amounts carried as decimal strings
mod u256_decimal {
	use alloy::primitives::U256;
	use serde::{de::Error, Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&value.to_string())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
	where
		D: Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		let trimmed = value.trim();
		if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
			return Err(D::Error::custom(format!(
				"amount '{}' must be a decimal integer string",
				value
			)));
		}
		U256::from_str_radix(trimmed, 10).map_err(D::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn eth_usdc() -> QuoteRequest {
		QuoteRequest::new(
			Network::Arbitrum,
			"ETH",
			"USDC",
			U256::from(10u64).pow(U256::from(18u8)),
			6,
		)
	}

	#[test]
	fn test_validation() {
		assert!(eth_usdc().validate().is_ok());

		let mut same = eth_usdc();
		same.token_out = "eth".to_string();
		assert!(matches!(
			same.validate(),
			Err(QuoteValidationError::SameToken { .. })
		));

		let mut empty = eth_usdc();
		empty.token_in = " ".to_string();
		assert!(matches!(
			empty.validate(),
			Err(QuoteValidationError::MissingToken { .. })
		));

		let mut zero = eth_usdc();
		zero.amount_in = U256::ZERO;
		assert_eq!(zero.validate(), Err(QuoteValidationError::ZeroAmount));
	}

	#[test]
	fn test_request_ids_are_unique() {
		assert_ne!(eth_usdc().request_id, eth_usdc().request_id);
	}

	#[test]
	fn test_from_symbols_scales_amount() {
		let catalog = TokenCatalog::arbitrum_defaults();
		let request =
			QuoteRequest::from_symbols(&catalog, Network::Arbitrum, "USDC", "WBTC", "2500.5")
				.unwrap();

		assert_eq!(request.amount_in, U256::from(2_500_500_000u64));
		assert_eq!(request.input_decimals, Some(6));
		assert_eq!(request.output_decimals, 8);
		assert_eq!(request.token_out, "0x2f2a2543B76A4166549F7aaB2e75Bef0aefC5B0f");

		let unknown =
			QuoteRequest::from_symbols(&catalog, Network::Arbitrum, "USDC", "PEPE", "1");
		assert!(matches!(
			unknown,
			Err(QuoteValidationError::UnknownToken { .. })
		));
	}

	#[test]
	fn test_json_round_trip_uses_decimal_strings() {
		let json = r#"{
			"network": "arbitrum",
			"token_in": "ETH",
			"token_out": "USDC",
			"amount_in": "1000000000000000000",
			"output_decimals": 6
		}"#;
		let request: QuoteRequest = serde_json::from_str(json).unwrap();
		assert_eq!(request.network, Network::Arbitrum);
		assert_eq!(request.amount_in.to_string(), "1000000000000000000");
		assert!(!request.request_id.is_empty());
		assert_eq!(request.input_decimals, None);

		let serialized = serde_json::to_value(&request).unwrap();
		assert_eq!(serialized["amount_in"], "1000000000000000000");

		let bad = json.replace("1000000000000000000", "1e18");
		assert!(serde_json::from_str::<QuoteRequest>(&bad).is_err());
	}
}
