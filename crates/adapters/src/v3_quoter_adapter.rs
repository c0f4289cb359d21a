//! Uniswap V3 style quoter adapter
//!
//! Serves Uniswap V3 and PancakeSwap V3: both expose `quoteExactInputSingle`
//! and differ only by quoter address and fee tier.

use alloy::primitives::aliases::{U160, U24};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;
use tradepulse_config::QuoterVersion;
use tradepulse_types::{
	AdapterError, AdapterResult, IntegrationStyle, Network, Quote, QuoteRequest, SourceAdapter,
	SourceInfo, TokenAmount,
};

use crate::contracts::{parse_contract_address, resolve_token_address, IQuoterV1, IQuoterV2};
use crate::rpc::ProviderRegistry;

/// On-chain quote through a V3 quoter contract at a fixed fee tier
#[derive(Debug)]
pub struct V3QuoterAdapter {
	info: SourceInfo,
	networks: Vec<Network>,
	fee: U24,
	version: QuoterVersion,
	quoters: HashMap<Network, String>,
	wrapped_native: HashMap<Network, String>,
	providers: ProviderRegistry,
}

impl V3QuoterAdapter {
	pub fn new(
		source_id: &str,
		name: &str,
		networks: Vec<Network>,
		fee: u32,
		version: QuoterVersion,
		quoters: HashMap<Network, String>,
		providers: ProviderRegistry,
	) -> AdapterResult<Self> {
		let fee = U24::try_from(fee)
			.map_err(|_| AdapterError::config(format!("Fee tier {} does not fit in uint24", fee)))?;
		let info = SourceInfo::new(source_id, name, IntegrationStyle::OnChain).with_description(
			format!("quoteExactInputSingle at fee tier {}", fee),
		);

		Ok(Self {
			info,
			networks,
			fee,
			version,
			quoters,
			wrapped_native: HashMap::new(),
			providers,
		})
	}

	/// Wrapped native token per network, used in place of the native sentinel
	pub fn with_wrapped_native(mut self, wrapped_native: HashMap<Network, String>) -> Self {
		self.wrapped_native = wrapped_native;
		self
	}

	fn quoter_address(&self, network: Network) -> AdapterResult<Address> {
		let address = self.quoters.get(&network).ok_or_else(|| {
			AdapterError::config(format!(
				"{} quoter address missing for {}",
				self.info.name, network
			))
		})?;
		parse_contract_address("quoter", address, network)
	}

	fn encode_call(&self, token_in: Address, token_out: Address, amount_in: U256) -> Bytes {
		let data = match self.version {
			QuoterVersion::V1 => IQuoterV1::quoteExactInputSingleCall {
				tokenIn: token_in,
				tokenOut: token_out,
				fee: self.fee,
				amountIn: amount_in,
				sqrtPriceLimitX96: U160::ZERO,
			}
			.abi_encode(),
			QuoterVersion::V2 => IQuoterV2::quoteExactInputSingleCall {
				params: IQuoterV2::QuoteExactInputSingleParams {
					tokenIn: token_in,
					tokenOut: token_out,
					amountIn: amount_in,
					fee: self.fee,
					sqrtPriceLimitX96: U160::ZERO,
				},
			}
			.abi_encode(),
		};
		Bytes::from(data)
	}

	fn decode_amount_out(&self, output: &[u8]) -> AdapterResult<U256> {
		let decoded = match self.version {
			QuoterVersion::V1 => IQuoterV1::quoteExactInputSingleCall::abi_decode_returns(output),
			QuoterVersion::V2 => IQuoterV2::quoteExactInputSingleCall::abi_decode_returns(output)
				.map(|returns| returns.amountOut),
		};
		decoded.map_err(|e| {
			AdapterError::invalid_response(format!("Failed to decode quoter output: {}", e))
		})
	}
}

#[async_trait]
impl SourceAdapter for V3QuoterAdapter {
	fn info(&self) -> &SourceInfo {
		&self.info
	}

	fn supports_network(&self, network: Network) -> bool {
		self.networks.contains(&network)
	}

	async fn quote(&self, request: &QuoteRequest) -> AdapterResult<Quote> {
		let network = request.network;
		if !self.supports_network(network) {
			return Err(AdapterError::UnsupportedNetwork {
				network,
				source_id: self.info.source_id.clone(),
			});
		}

		let quoter = self.quoter_address(network)?;
		let wrapped = self.wrapped_native.get(&network).map(String::as_str);
		let token_in = resolve_token_address(&request.token_in, wrapped)?;
		let token_out = resolve_token_address(&request.token_out, wrapped)?;
		let reader = self.providers.get(network)?;

		debug!(
			"[{}] {} quoting {} -> {} on {} via {}",
			request.request_id, self.info.name, token_in, token_out, network, quoter
		);

		let started = Instant::now();
		let output = reader
			.call(quoter, self.encode_call(token_in, token_out, request.amount_in))
			.await?;
		let amount_out = self.decode_amount_out(&output)?;

		Ok(
			Quote::new(&self.info.name, TokenAmount::new(amount_out, request.output_decimals)?)
				.with_response_time(started.elapsed().as_millis() as u64),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rpc::MockChainReader;
	use alloy::sol_types::SolValue;
	use std::sync::Arc;
	use tradepulse_types::{FailureKind, NATIVE_TOKEN_ADDRESS};

	const QUOTER: &str = "0x61ffe014ba17989e743c5f6cb21bf9697530b21e";
	const WETH: &str = "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1";
	const USDC: &str = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831";

	fn request() -> QuoteRequest {
		QuoteRequest::new(
			Network::Arbitrum,
			NATIVE_TOKEN_ADDRESS,
			USDC,
			U256::from(10u64).pow(U256::from(18u64)),
			6,
		)
	}

	fn adapter(version: QuoterVersion, reader: MockChainReader) -> V3QuoterAdapter {
		let providers = ProviderRegistry::new().with_reader(Network::Arbitrum, Arc::new(reader));
		V3QuoterAdapter::new(
			"uniswap",
			"Uniswap",
			vec![Network::Arbitrum, Network::Ethereum],
			3000,
			version,
			HashMap::from([(Network::Arbitrum, QUOTER.to_string())]),
			providers,
		)
		.unwrap()
		.with_wrapped_native(HashMap::from([(Network::Arbitrum, WETH.to_string())]))
	}

	#[tokio::test]
	async fn test_v2_quote_decodes_amount_out() {
		let mut reader = MockChainReader::new();
		reader
			.expect_call()
			.withf(|to, data| {
				let Ok(call) = IQuoterV2::quoteExactInputSingleCall::abi_decode(data) else {
					return false;
				};
				*to == QUOTER.parse::<Address>().unwrap()
					&& call.params.tokenIn == WETH.parse::<Address>().unwrap()
					&& call.params.fee == U24::from(3000u32)
			})
			.times(1)
			.returning(|_, _| {
				let encoded = (
					U256::from(1_800_500_000u64),
					U256::ZERO,
					U256::from(3u64),
					U256::from(90_000u64),
				)
					.abi_encode_params();
				Ok(Bytes::from(encoded))
			});

		let quote = adapter(QuoterVersion::V2, reader).quote(&request()).await.unwrap();
		assert_eq!(quote.source, "Uniswap");
		assert_eq!(quote.output_amount.to_string(), "1800.5");
		assert!(quote.venue.is_none());
	}

	#[tokio::test]
	async fn test_v1_quote_decodes_single_return() {
		let mut reader = MockChainReader::new();
		reader
			.expect_call()
			.withf(|_, data| IQuoterV1::quoteExactInputSingleCall::abi_decode(data).is_ok())
			.returning(|_, _| Ok(Bytes::from(U256::from(1_802_000_000u64).abi_encode())));

		let quote = adapter(QuoterVersion::V1, reader).quote(&request()).await.unwrap();
		assert_eq!(quote.output_amount.to_string(), "1802");
	}

	#[tokio::test]
	async fn test_rpc_revert_is_call_failure() {
		let mut reader = MockChainReader::new();
		reader
			.expect_call()
			.returning(|_, _| Err(AdapterError::Rpc("execution reverted".to_string())));

		let err = adapter(QuoterVersion::V2, reader).quote(&request()).await.unwrap_err();
		assert_eq!(err.to_string(), "RPC call failed: execution reverted");
		assert_eq!(err.kind(), FailureKind::Call);
	}

	#[tokio::test]
	async fn test_garbage_output_is_invalid_response() {
		let mut reader = MockChainReader::new();
		reader
			.expect_call()
			.returning(|_, _| Ok(Bytes::from(vec![0u8; 3])));

		let err = adapter(QuoterVersion::V2, reader).quote(&request()).await.unwrap_err();
		assert!(matches!(err, AdapterError::InvalidResponse { .. }));
	}

	#[tokio::test]
	async fn test_unsupported_network_never_calls_reader() {
		let mut reader = MockChainReader::new();
		reader.expect_call().times(0);

		let adapter = adapter(QuoterVersion::V2, reader);
		assert!(!adapter.supports_network(Network::Bnb));

		let mut request = request();
		request.network = Network::Bnb;
		let err = adapter.quote(&request).await.unwrap_err();
		assert!(err.is_unsupported_network());
	}

	#[tokio::test]
	async fn test_missing_quoter_is_configuration_failure() {
		let mut reader = MockChainReader::new();
		reader.expect_call().times(0);

		// Ethereum is declared supported but has no quoter address
		let mut request = request();
		request.network = Network::Ethereum;
		let err = adapter(QuoterVersion::V2, reader).quote(&request).await.unwrap_err();
		assert_eq!(err.kind(), FailureKind::Configuration);
		assert_eq!(
			err.to_string(),
			"Configuration error: Uniswap quoter address missing for ethereum"
		);
	}

	#[tokio::test]
	async fn test_short_quoter_address_is_configuration_failure() {
		let providers =
			ProviderRegistry::new().with_reader(Network::Bnb, Arc::new(MockChainReader::new()));
		let adapter = V3QuoterAdapter::new(
			"pancakeswap",
			"PancakeSwap",
			vec![Network::Bnb],
			2500,
			QuoterVersion::V2,
			HashMap::from([(Network::Bnb, "0xB048Bbc1".to_string())]),
			providers,
		)
		.unwrap();

		let request = QuoteRequest::new(Network::Bnb, USDC, WETH, U256::from(1u64), 18);
		let err = adapter.quote(&request).await.unwrap_err();
		assert!(matches!(err, AdapterError::InvalidAddress { .. }));
		assert_eq!(err.kind(), FailureKind::Configuration);
	}

	#[test]
	fn test_fee_must_fit_uint24() {
		let result = V3QuoterAdapter::new(
			"uniswap",
			"Uniswap",
			vec![Network::Arbitrum],
			1 << 24,
			QuoterVersion::V2,
			HashMap::new(),
			ProviderRegistry::new(),
		);
		assert!(matches!(result, Err(AdapterError::Config { .. })));
	}
}
