//! Read-only contract bindings used for on-chain price discovery

use alloy::primitives::Address;
use alloy::sol;
use std::str::FromStr;
use tradepulse_types::{AdapterError, AdapterResult, Network, NATIVE_TOKEN_ADDRESS};

sol! {
	/// Uniswap V3 QuoterV1: flat arguments, single return value
	interface IQuoterV1 {
		function quoteExactInputSingle(
			address tokenIn,
			address tokenOut,
			uint24 fee,
			uint256 amountIn,
			uint160 sqrtPriceLimitX96
		) external returns (uint256 amountOut);
	}

	/// Uniswap V3 QuoterV2 (also deployed by PancakeSwap V3)
	interface IQuoterV2 {
		struct QuoteExactInputSingleParams {
			address tokenIn;
			address tokenOut;
			uint256 amountIn;
			uint24 fee;
			uint160 sqrtPriceLimitX96;
		}

		function quoteExactInputSingle(QuoteExactInputSingleParams memory params)
			external
			returns (
				uint256 amountOut,
				uint160 sqrtPriceX96After,
				uint32 initializedTicksCrossed,
				uint256 gasEstimate
			);
	}

	/// Curve stable swap pool
	interface ICurvePool {
		function get_dy(int128 i, int128 j, uint256 dx) external view returns (uint256);
	}
}

/// Parse a configured contract address
///
/// Addresses must be full 0x-prefixed 20-byte hex strings; anything else is a
/// configuration problem, not a call failure.
pub fn parse_contract_address(field: &str, value: &str, network: Network) -> AdapterResult<Address> {
	let invalid = || AdapterError::InvalidAddress {
		field: field.to_string(),
		address: value.to_string(),
		network,
	};
	if value.len() != 42 {
		return Err(invalid());
	}
	Address::from_str(value).map_err(|_| invalid())
}

/// Parse a request token, substituting the wrapped native token for the native sentinel
pub fn resolve_token_address(token: &str, wrapped_native: Option<&str>) -> AdapterResult<Address> {
	let token = token.trim();
	let address = if token.eq_ignore_ascii_case(NATIVE_TOKEN_ADDRESS) {
		wrapped_native.ok_or_else(|| AdapterError::InvalidToken {
			token: token.to_string(),
			reason: "no wrapped native token configured".to_string(),
		})?
	} else {
		token
	};

	if address.len() != 42 {
		return Err(AdapterError::InvalidToken {
			token: token.to_string(),
			reason: "expected a 0x-prefixed 20-byte address".to_string(),
		});
	}
	Address::from_str(address).map_err(|e| AdapterError::InvalidToken {
		token: token.to_string(),
		reason: e.to_string(),
	})
}
