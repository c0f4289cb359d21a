//! OpenOcean quote API adapter

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;
use tracing::debug;
use tradepulse_types::{
	AdapterError, AdapterResult, IntegrationStyle, Network, Quote, QuoteRequest, SourceAdapter,
	SourceInfo, TokenAmount,
};

use crate::client_cache::{ClientCache, ClientConfig};
use crate::http::{build_url, is_success, json_amount, parse_json, read_body};

#[derive(Debug, Deserialize)]
struct QuoteResponseDto {
	code: Option<i64>,
	#[serde(default)]
	data: Option<serde_json::Value>,
	#[serde(default, alias = "error")]
	message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteDataDto {
	out_amount: serde_json::Value,
	#[serde(default)]
	dexes: Vec<DexDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DexDto {
	dex_code: String,
	swap_amount: serde_json::Value,
}

/// REST quote from OpenOcean's `/{chain}/quote` endpoint
#[derive(Debug)]
pub struct OpenOceanAdapter {
	info: SourceInfo,
	networks: Vec<Network>,
	endpoint: String,
	gas_price: String,
	client_config: ClientConfig,
	cache: ClientCache,
}

impl OpenOceanAdapter {
	pub fn new(
		source_id: &str,
		name: &str,
		networks: Vec<Network>,
		endpoint: &str,
		gas_price: &str,
		request_timeout_ms: u64,
	) -> AdapterResult<Self> {
		Self::with_cache(
			source_id,
			name,
			networks,
			endpoint,
			gas_price,
			request_timeout_ms,
			ClientCache::for_adapter(),
		)
	}

	pub fn with_cache(
		source_id: &str,
		name: &str,
		networks: Vec<Network>,
		endpoint: &str,
		gas_price: &str,
		request_timeout_ms: u64,
		cache: ClientCache,
	) -> AdapterResult<Self> {
		// Fail on a bad endpoint at construction rather than per request
		build_url(endpoint, "quote")?;

		Ok(Self {
			info: SourceInfo::new(source_id, name, IntegrationStyle::Rest)
				.with_description(format!("OpenOcean quote API at {}", endpoint)),
			networks,
			endpoint: endpoint.to_string(),
			gas_price: gas_price.to_string(),
			client_config: ClientConfig::new(source_id, endpoint, request_timeout_ms),
			cache,
		})
	}

	/// Pick the dex routing the largest share, if any
	fn best_dex(dexes: &[DexDto]) -> AdapterResult<Option<&str>> {
		let mut best: Option<(&str, alloy::primitives::U256)> = None;
		for dex in dexes {
			let amount = json_amount(&dex.swap_amount, "dexes.swapAmount")?;
			// Strictly greater keeps the first of equal entries
			if best.map_or(true, |(_, best_amount)| amount > best_amount) {
				best = Some((dex.dex_code.as_str(), amount));
			}
		}
		Ok(best.map(|(code, _)| code))
	}

	fn parse_quote(&self, body: &str, output_decimals: u8) -> AdapterResult<Quote> {
		let response: QuoteResponseDto = parse_json(body, "OpenOcean quote response")?;
		if response.code != Some(200) {
			return Err(AdapterError::no_route(format!(
				"OpenOcean returned code {}: {}",
				response.code.map_or_else(|| "none".to_string(), |code| code.to_string()),
				response.message.unwrap_or_default()
			)));
		}
		let data = match response.data {
			Some(data) if !data.is_null() => data,
			_ => return Err(AdapterError::no_route("OpenOcean returned no quote data")),
		};

		let quote_data: QuoteDataDto = serde_json::from_value(data.clone()).map_err(|e| {
			AdapterError::invalid_response(format!("Malformed OpenOcean quote data: {}", e))
		})?;
		let amount = json_amount(&quote_data.out_amount, "data.outAmount")?;

		let mut quote = Quote::new(&self.info.name, TokenAmount::new(amount, output_decimals)?);
		if let Some(dex) = Self::best_dex(&quote_data.dexes)? {
			quote = quote.with_venue(dex);
		}
		Ok(quote.with_raw(data))
	}
}

#[async_trait]
impl SourceAdapter for OpenOceanAdapter {
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

		let url = build_url(
			&self.endpoint,
			&format!("{}/quote", request.network.open_ocean_code()),
		)?;
		debug!(
			"[{}] {} requesting quote {} -> {} on {}",
			request.request_id, self.info.name, request.token_in, request.token_out, request.network
		);

		let client = self.cache.get_client(&self.client_config)?;
		let started = Instant::now();
		let response = client
			.get(url)
			.query(&[
				("inTokenAddress", request.token_in.clone()),
				("outTokenAddress", request.token_out.clone()),
				("amountDecimals", request.amount_in.to_string()),
				("gasPriceDecimals", self.gas_price.clone()),
			])
			.send()
			.await
			.map_err(AdapterError::HttpError)?;

		let (status, body) = read_body(response).await?;
		if !is_success(status) {
			return Err(AdapterError::http_failure(status, body.trim()));
		}

		let quote = self.parse_quote(&body, request.output_decimals)?;
		Ok(quote.with_response_time(started.elapsed().as_millis() as u64))
	}
}
