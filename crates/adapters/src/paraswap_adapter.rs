//! ParaSwap price API adapter

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;
use tracing::debug;
use tradepulse_types::{
	AdapterError, AdapterResult, IntegrationStyle, Network, Quote, QuoteRequest, SourceAdapter,
	SourceInfo, TokenAmount,
};
use url::Url;

use crate::client_cache::{ClientCache, ClientConfig};
use crate::http::{build_url, is_success, json_amount, parse_json, read_body};

/// Error code ParaSwap returns when the trade would move the price too far
pub const PRICE_IMPACT_ERROR: &str = "ESTIMATED_LOSS_GREATER_THAN_MAX_IMPACT";

/// Venue label used when the route does not name an exchange
const DEFAULT_VENUE: &str = "ParaSwap";

#[derive(Debug, Deserialize)]
struct ParaswapErrorResponse {
	error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceRouteDto {
	dest_amount: serde_json::Value,
	#[serde(default)]
	best_route: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
struct RouteDto {
	#[serde(default)]
	swaps: Vec<SwapDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapDto {
	#[serde(default)]
	swap_exchanges: Vec<SwapExchangeDto>,
}

#[derive(Debug, Deserialize)]
struct SwapExchangeDto {
	exchange: Option<String>,
}

impl PriceRouteDto {
	fn venue(&self) -> Option<&str> {
		self.best_route
			.first()?
			.swaps
			.first()?
			.swap_exchanges
			.first()?
			.exchange
			.as_deref()
			.filter(|exchange| !exchange.is_empty())
	}
}

/// REST quote from ParaSwap's `/prices` endpoint
#[derive(Debug)]
pub struct ParaswapAdapter {
	info: SourceInfo,
	networks: Vec<Network>,
	prices_url: Url,
	client_config: ClientConfig,
	cache: ClientCache,
}

impl ParaswapAdapter {
	pub fn new(
		source_id: &str,
		name: &str,
		networks: Vec<Network>,
		endpoint: &str,
		request_timeout_ms: u64,
	) -> AdapterResult<Self> {
		Self::with_cache(
			source_id,
			name,
			networks,
			endpoint,
			request_timeout_ms,
			ClientCache::for_adapter(),
		)
	}

	pub fn with_cache(
		source_id: &str,
		name: &str,
		networks: Vec<Network>,
		endpoint: &str,
		request_timeout_ms: u64,
		cache: ClientCache,
	) -> AdapterResult<Self> {
		Ok(Self {
			info: SourceInfo::new(source_id, name, IntegrationStyle::Rest)
				.with_description(format!("ParaSwap prices API at {}", endpoint)),
			networks,
			prices_url: build_url(endpoint, "prices")?,
			client_config: ClientConfig::new(source_id, endpoint, request_timeout_ms),
			cache,
		})
	}

	fn query(request: &QuoteRequest) -> Vec<(&'static str, String)> {
		let mut query = vec![
			("srcToken", request.token_in.clone()),
			("destToken", request.token_out.clone()),
			("amount", request.amount_in.to_string()),
		];
		if let Some(decimals) = request.input_decimals {
			query.push(("srcDecimals", decimals.to_string()));
		}
		query.push(("destDecimals", request.output_decimals.to_string()));
		query.push(("side", "SELL".to_string()));
		query.push(("network", request.network.chain_id().to_string()));
		query
	}

	fn parse_error(status: u16, body: &str) -> AdapterError {
		let code = serde_json::from_str::<ParaswapErrorResponse>(body)
			.ok()
			.and_then(|response| response.error);
		match code {
			Some(code) if code == PRICE_IMPACT_ERROR => AdapterError::PriceImpactTooHigh {
				reason: format!("{}: reduce the amount", PRICE_IMPACT_ERROR),
			},
			_ => AdapterError::http_failure(status, body.trim()),
		}
	}

	/// Extract a quote from a successful `/prices` body
	fn parse_prices(&self, body: &str, output_decimals: u8) -> AdapterResult<Quote> {
		let response: serde_json::Value = parse_json(body, "ParaSwap prices response")?;
		let price_route = match response.get("priceRoute") {
			Some(route) if !route.is_null() => route.clone(),
			_ => return Err(AdapterError::no_route("ParaSwap returned no priceRoute")),
		};

		let route: PriceRouteDto = serde_json::from_value(price_route.clone()).map_err(|e| {
			AdapterError::invalid_response(format!("Malformed ParaSwap priceRoute: {}", e))
		})?;
		let amount = json_amount(&route.dest_amount, "priceRoute.destAmount")?;
		let venue = route.venue().unwrap_or(DEFAULT_VENUE).to_string();

		Ok(Quote::new(&self.info.name, TokenAmount::new(amount, output_decimals)?)
			.with_venue(venue)
			.with_raw(price_route))
	}
}

#[async_trait]
impl SourceAdapter for ParaswapAdapter {
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
			"[{}] {} requesting prices {} -> {} on {}",
			request.request_id, self.info.name, request.token_in, request.token_out, request.network
		);

		let client = self.cache.get_client(&self.client_config)?;
		let started = Instant::now();
		let response = client
			.get(self.prices_url.clone())
			.query(&Self::query(request))
			.send()
			.await
			.map_err(AdapterError::HttpError)?;

		let (status, body) = read_body(response).await?;
		if !is_success(status) {
			return Err(Self::parse_error(status, &body));
		}

		let quote = self.parse_prices(&body, request.output_decimals)?;
		Ok(quote.with_response_time(started.elapsed().as_millis() as u64))
	}
}
