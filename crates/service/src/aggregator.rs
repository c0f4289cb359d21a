//! Best-rate aggregation over the configured sources

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tradepulse_types::{
	AdapterError, AggregationError, AggregationResult, FailureKind, Quote, QuoteRequest,
	SourceAdapter, SourceFailure,
};

/// Outcome of one source call
enum SourceOutcome {
	Quoted(Quote),
	Failed(SourceFailure),
	/// The source declined the network at call time
	Skipped(String),
}

/// Queries every applicable source concurrently and picks the largest output
///
/// Stateless between requests; one instance can serve any number of
/// concurrent aggregations.
#[derive(Debug, Clone)]
pub struct RateAggregator {
	adapters: Vec<Arc<dyn SourceAdapter>>,
	per_source_timeout: Duration,
	source_timeouts: HashMap<String, Duration>,
}

impl RateAggregator {
	/// Create an aggregator over `adapters`, in priority order
	pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, per_source_timeout: Duration) -> Self {
		Self {
			adapters,
			per_source_timeout,
			source_timeouts: HashMap::new(),
		}
	}

	/// Override the timeout of individual sources, keyed by source id
	pub fn with_source_timeouts(mut self, source_timeouts: HashMap<String, Duration>) -> Self {
		self.source_timeouts = source_timeouts;
		self
	}

	pub fn adapters(&self) -> &[Arc<dyn SourceAdapter>] {
		&self.adapters
	}

	pub fn timeout_for(&self, source_id: &str) -> Duration {
		self.source_timeouts
			.get(source_id)
			.copied()
			.unwrap_or(self.per_source_timeout)
	}

	/// Aggregate without external cancellation
	pub async fn aggregate_quotes(
		&self,
		request: &QuoteRequest,
	) -> Result<AggregationResult, AggregationError> {
		self.aggregate(request, &CancellationToken::new()).await
	}

	/// Query all applicable sources and return the best quote with the failure trail
	///
	/// Every source is awaited (or timed out) before a result is produced, so
	/// a slow source with a better price is never dropped in favour of a fast
	/// one. Cancelling `cancel` drops all in-flight calls and returns
	/// [`AggregationError::Cancelled`].
	pub async fn aggregate(
		&self,
		request: &QuoteRequest,
		cancel: &CancellationToken,
	) -> Result<AggregationResult, AggregationError> {
		request.validate()?;

		let (applicable, unsupported): (Vec<_>, Vec<_>) = self
			.adapters
			.iter()
			.partition(|adapter| adapter.supports_network(request.network));
		let mut skipped: Vec<String> = unsupported
			.iter()
			.map(|adapter| adapter.id().to_string())
			.collect();

		info!(
			"[{}] Aggregating {} -> {} on {} across {} sources ({} skipped)",
			request.request_id,
			request.token_in,
			request.token_out,
			request.network,
			applicable.len(),
			skipped.len()
		);

		let calls = applicable
			.iter()
			.map(|adapter| self.quote_source(adapter.as_ref(), request));

		let outcomes = tokio::select! {
			biased;
			_ = cancel.cancelled() => {
				warn!("[{}] Aggregation cancelled", request.request_id);
				return Err(AggregationError::Cancelled {
					request_id: request.request_id.clone(),
				});
			},
			outcomes = join_all(calls) => outcomes,
		};

		let mut quotes = Vec::new();
		let mut failures = Vec::new();
		for outcome in outcomes {
			match outcome {
				SourceOutcome::Quoted(quote) => quotes.push(quote),
				SourceOutcome::Failed(failure) => failures.push(failure),
				SourceOutcome::Skipped(source_id) => skipped.push(source_id),
			}
		}

		if quotes.is_empty() {
			warn!(
				"[{}] No route found ({} failures)",
				request.request_id,
				failures.len()
			);
			return Err(AggregationError::NoRouteFound { failures });
		}

		// Stable: equal amounts keep configured order
		quotes.sort_by(|a, b| b.output_amount.cmp(&a.output_amount));
		let best = quotes[0].clone();

		info!(
			"[{}] Best rate {} from {} ({} quotes, {} failures)",
			request.request_id,
			best.output_amount,
			best.source,
			quotes.len(),
			failures.len()
		);

		Ok(AggregationResult {
			request_id: request.request_id.clone(),
			best,
			quotes,
			failures,
			skipped,
		})
	}

	async fn quote_source(&self, adapter: &dyn SourceAdapter, request: &QuoteRequest) -> SourceOutcome {
		let limit = self.timeout_for(adapter.id());
		let started = Instant::now();

		match timeout(limit, adapter.quote(request)).await {
			Ok(Ok(mut quote)) => {
				if quote.response_time_ms == 0 {
					quote.response_time_ms = started.elapsed().as_millis() as u64;
				}
				debug!(
					"[{}] {} quoted {} in {}ms",
					request.request_id, adapter.name(), quote.output_amount, quote.response_time_ms
				);
				SourceOutcome::Quoted(quote)
			},
			Ok(Err(e)) if e.is_unsupported_network() => {
				debug!("[{}] {} skipped: {}", request.request_id, adapter.name(), e);
				SourceOutcome::Skipped(adapter.id().to_string())
			},
			Ok(Err(e)) => {
				warn!("[{}] {} failed: {}", request.request_id, adapter.name(), e);
				SourceOutcome::Failed(SourceFailure::new(adapter.name(), e.to_string(), e.kind()))
			},
			Err(_) => {
				let error = AdapterError::Timeout {
					timeout_ms: limit.as_millis() as u64,
				};
				warn!("[{}] {} failed: {}", request.request_id, adapter.name(), error);
				SourceOutcome::Failed(SourceFailure::new(
					adapter.name(),
					error.to_string(),
					FailureKind::Timeout,
				))
			},
		}
	}
}
