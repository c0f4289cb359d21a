//! Latest-request-wins supervision of aggregations
//!
//! A quoting front end fires a new aggregation on every keystroke; only the
//! most recent one may deliver a result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tradepulse_types::{AggregationError, AggregationResult, QuoteRequest};

use crate::aggregator::RateAggregator;

#[derive(Debug)]
struct InFlight {
	generation: u64,
	token: CancellationToken,
}

/// Runs aggregations so that a newer request always supersedes older ones
#[derive(Debug)]
pub struct QuoteSupervisor {
	aggregator: Arc<RateAggregator>,
	generation: AtomicU64,
	current: Mutex<Option<InFlight>>,
}

impl QuoteSupervisor {
	pub fn new(aggregator: Arc<RateAggregator>) -> Self {
		Self {
			aggregator,
			generation: AtomicU64::new(0),
			current: Mutex::new(None),
		}
	}

	pub fn aggregator(&self) -> &Arc<RateAggregator> {
		&self.aggregator
	}

	/// Cancel whatever is in flight, then aggregate `request`
	///
	/// Resolves to [`AggregationError::Cancelled`] if a later call supersedes
	/// this one before it completes.
	pub async fn quote_latest(
		&self,
		request: &QuoteRequest,
	) -> Result<AggregationResult, AggregationError> {
		let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
		let token = CancellationToken::new();

		{
			let mut current = self.current.lock().await;
			let previous = current.replace(InFlight {
				generation,
				token: token.clone(),
			});
			if let Some(previous) = previous {
				debug!(
					"[{}] Superseding in-flight aggregation #{}",
					request.request_id, previous.generation
				);
				previous.token.cancel();
			}
		}

		let result = self.aggregator.aggregate(request, &token).await;

		{
			let mut current = self.current.lock().await;
			if current.as_ref().map(|in_flight| in_flight.generation) == Some(generation) {
				*current = None;
			}
		}

		// Superseded after the sources answered but before we got here
		if token.is_cancelled() {
			return Err(AggregationError::Cancelled {
				request_id: request.request_id.clone(),
			});
		}
		result
	}

	/// Cancel the in-flight aggregation, if any
	pub async fn cancel(&self) -> bool {
		match self.current.lock().await.take() {
			Some(in_flight) => {
				in_flight.token.cancel();
				true
			},
			None => false,
		}
	}
}
