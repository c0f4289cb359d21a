//! 0x Swap API adapter (permit2 price endpoint)

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;
use tracing::debug;
use tradepulse_types::{
	AdapterError, AdapterResult, IntegrationStyle, Network, Quote, QuoteRequest, SourceAdapter,
	SecretString, SourceInfo, TokenAmount,
};
use url::Url;

use crate::client_cache::{ClientCache, ClientConfig};
use crate::http::{build_url, is_success, json_amount, parse_json, read_body};

pub const API_KEY_HEADER: &str = "0x-api-key";
pub const VERSION_HEADER: &str = "0x-version";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceResponseDto {
	#[serde(default = "default_liquidity")]
	liquidity_available: bool,
	buy_amount: Option<serde_json::Value>,
	#[serde(default)]
	route: Option<RouteDto>,
}

fn default_liquidity() -> bool {
	true
}

#[derive(Debug, Deserialize)]
struct RouteDto {
	#[serde(default)]
	fills: Vec<FillDto>,
}

#[derive(Debug, Deserialize)]
struct FillDto {
	source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
	#[serde(alias = "reason")]
	message: Option<String>,
	name: Option<String>,
}

/// REST quote from the 0x `swap/permit2/price` endpoint
#[derive(Debug)]
pub struct ZeroExAdapter {
	info: SourceInfo,
	networks: Vec<Network>,
	price_url: Url,
	client_config: ClientConfig,
	cache: ClientCache,
}

impl ZeroExAdapter {
	pub fn new(
		source_id: &str,
		name: &str,
		networks: Vec<Network>,
		endpoint: &str,
		api_key: Option<&SecretString>,
		request_timeout_ms: u64,
	) -> AdapterResult<Self> {
		Self::with_cache(
			source_id,
			name,
			networks,
			endpoint,
			api_key,
			request_timeout_ms,
			ClientCache::for_adapter(),
		)
	}

	pub fn with_cache(
		source_id: &str,
		name: &str,
		networks: Vec<Network>,
		endpoint: &str,
		api_key: Option<&SecretString>,
		request_timeout_ms: u64,
		cache: ClientCache,
	) -> AdapterResult<Self> {
		let mut client_config =
			ClientConfig::new(source_id, endpoint, request_timeout_ms).with_header(VERSION_HEADER, "v2");
		if let Some(key) = api_key.filter(|key| !key.is_empty()) {
			client_config = client_config.with_api_key(API_KEY_HEADER, key);
		}

		Ok(Self {
			info: SourceInfo::new(source_id, name, IntegrationStyle::Rest)
				.with_description(format!("0x swap API at {}", endpoint)),
			networks,
			price_url: build_url(endpoint, "swap/permit2/price")?,
			client_config,
			cache,
		})
	}

	fn parse_error(status: u16, body: &str) -> AdapterError {
		let reason = serde_json::from_str::<ErrorResponseDto>(body)
			.ok()
			.and_then(|error| error.message.or(error.name))
			.unwrap_or_else(|| body.trim().to_string());
		AdapterError::http_failure(status, reason)
	}

	fn parse_price(&self, body: &str, output_decimals: u8) -> AdapterResult<Quote> {
		let raw: serde_json::Value = parse_json(body, "0x price response")?;
		let price: PriceResponseDto = serde_json::from_value(raw.clone()).map_err(|e| {
			AdapterError::invalid_response(format!("Malformed 0x price response: {}", e))
		})?;

		if !price.liquidity_available {
			return Err(AdapterError::no_route("0x reports no liquidity for this pair"));
		}
		let buy_amount = price
			.buy_amount
			.as_ref()
			.ok_or_else(|| AdapterError::invalid_response("0x response has no buyAmount"))?;
		let amount = json_amount(buy_amount, "buyAmount")?;

		let venue = price
			.route
			.as_ref()
			.and_then(|route| route.fills.iter().find_map(|fill| fill.source.clone()));

		let mut quote = Quote::new(&self.info.name, TokenAmount::new(amount, output_decimals)?);
		if let Some(venue) = venue {
			quote = quote.with_venue(venue);
		}
		Ok(quote.with_raw(raw))
	}
}

#[async_trait]
impl SourceAdapter for ZeroExAdapter {
	fn info(&self) -> &SourceInfo {
		&self.info
	}

	fn supports_network(&self, network: Network) -> bool {
		self.networks.contains(&network)
	}

	async fn quote(&self, request: &QuoteRequest) -> AdapterResult<Quote> {
		if !self.supports_network(request.network) {
			return Err(AdapterError::UnsupportedNetwork {
				network: request.network,
				source_id: self.info.source_id.clone(),
			});
		}

		debug!(
			"[{}] {} requesting price {} -> {} on {}",
			request.request_id, self.info.name, request.token_in, request.token_out, request.network
		);

		let client = self.cache.get_client(&self.client_config)?;
		let started = Instant::now();
		let response = client
			.get(self.price_url.clone())
			.query(&[
				("chainId", request.network.chain_id().to_string()),
				("sellToken", request.token_in.clone()),
				("buyToken", request.token_out.clone()),
				("sellAmount", request.amount_in.to_string()),
			])
			.send()
			.await
			.map_err(AdapterError::HttpError)?;

		let (status, body) = read_body(response).await?;
		if !is_success(status) {
			return Err(Self::parse_error(status, &body));
		}

		let quote = self.parse_price(&body, request.output_decimals)?;
		Ok(quote.with_response_time(started.elapsed().as_millis() as u64))
	}
}
