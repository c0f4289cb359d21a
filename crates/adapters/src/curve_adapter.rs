//! Curve pool adapter using `get_dy`

use alloy::primitives::Bytes;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;
use tradepulse_config::CurvePoolSettings;
use tradepulse_types::{
	AdapterError, AdapterResult, IntegrationStyle, Network, Quote, QuoteRequest, SourceAdapter,
	SourceInfo, TokenAmount,
};

use crate::contracts::{parse_contract_address, ICurvePool};
use crate::rpc::ProviderRegistry;

/// On-chain quote from a single Curve pool per network
///
/// The pool's coin indices decide the direction. When the pool settings name
/// `coin_in`/`coin_out`, requests for any other pair fail with no route
/// before the pool is queried.
#[derive(Debug)]
pub struct CurveAdapter {
	info: SourceInfo,
	networks: Vec<Network>,
	pools: HashMap<Network, CurvePoolSettings>,
	providers: ProviderRegistry,
}

impl CurveAdapter {
	pub fn new(
		source_id: &str,
		name: &str,
		networks: Vec<Network>,
		pools: HashMap<Network, CurvePoolSettings>,
		providers: ProviderRegistry,
	) -> Self {
		Self {
			info: SourceInfo::new(source_id, name, IntegrationStyle::OnChain)
				.with_description("get_dy on a configured pool"),
			networks,
			pools,
			providers,
		}
	}
}

#[async_trait]
impl SourceAdapter for CurveAdapter {
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

		let pool = self.pools.get(&network).ok_or_else(|| {
			AdapterError::config(format!("{} pool address missing for {}", self.info.name, network))
		})?;
		if !pool.serves_pair(&request.token_in, &request.token_out) {
			return Err(AdapterError::no_route(format!(
				"{} pool on {} does not trade {} -> {}",
				self.info.name, network, request.token_in, request.token_out
			)));
		}
		let pool_address = parse_contract_address("pool", &pool.address, network)?;
		let reader = self.providers.get(network)?;

		debug!(
			"[{}] {} get_dy({}, {}) for {} -> {} on {} pool {}",
			request.request_id,
			self.info.name,
			pool.i,
			pool.j,
			request.token_in,
			request.token_out,
			network,
			pool_address
		);

		let calldata = ICurvePool::get_dyCall {
			i: i128::from(pool.i),
			j: i128::from(pool.j),
			dx: request.amount_in,
		}
		.abi_encode();

		let started = Instant::now();
		let output = reader.call(pool_address, Bytes::from(calldata)).await?;
		let amount_out = ICurvePool::get_dyCall::abi_decode_returns(&output).map_err(|e| {
			AdapterError::invalid_response(format!("Failed to decode get_dy output: {}", e))
		})?;

		Ok(
			Quote::new(&self.info.name, TokenAmount::new(amount_out, request.output_decimals)?)
				.with_response_time(started.elapsed().as_millis() as u64),
		)
	}
}
