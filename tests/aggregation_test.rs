//! End-to-end aggregation over in-memory sources
//!
//! Covers best-rate selection, failure trails, timeouts and cancellation
//! through the public `Quoter` surface.

mod mocks;

use futures::future::join;
use mocks::sources::{eth_to_usdc, fast, hanging, quoter_with, slow};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tradepulse_swap::{mocks::MockSource, AggregationError, FailureKind, Network};

#[tokio::test(start_paused = true)]
async fn test_best_rate_with_unsupported_source_skipped() {
	let uniswap = MockSource::new("Uniswap", "1800.50");
	let curve = MockSource::new("Curve", "1900").on_networks(vec![Network::Ethereum]);
	let paraswap = MockSource::new("ParaSwap-REST", "1805.12").with_venue("UniswapV3");
	let quoter = quoter_with(&[uniswap, curve.clone(), paraswap], 5_000);

	let result = quoter.quote(&eth_to_usdc(&quoter)).await.unwrap();

	assert_eq!(result.best.source, "ParaSwap-REST");
	assert_eq!(result.best.output_amount.to_string(), "1805.12");
	assert_eq!(result.best.venue.as_deref(), Some("UniswapV3"));
	assert!(result.failures.is_empty());
	assert_eq!(result.skipped, vec!["curve".to_string()]);
	assert_eq!(curve.call_count(), 0);
	assert_eq!(result.quotes.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_source_reported_and_rest_used() {
	let uniswap = MockSource::new("Uniswap", "1800.50");
	let paraswap = hanging("ParaSwap-REST");
	let quoter = quoter_with(&[uniswap, paraswap], 5_000);

	let result = quoter.quote(&eth_to_usdc(&quoter)).await.unwrap();

	assert_eq!(result.best.source, "Uniswap");
	assert_eq!(result.best.output_amount.to_string(), "1800.5");
	assert_eq!(result.failures.len(), 1);
	assert_eq!(result.failures[0].source, "ParaSwap-REST");
	assert_eq!(result.failures[0].kind, FailureKind::Timeout);
	assert!(result.failures[0].reason.contains("timeout"));
}

#[tokio::test(start_paused = true)]
async fn test_all_sources_failing_reports_every_reason() {
	let uniswap = MockSource::failing("Uniswap", "execution reverted");
	let paraswap = MockSource::failing("ParaSwap-REST", "HTTP 500");
	let quoter = quoter_with(&[uniswap, paraswap], 5_000);

	let error = quoter.quote(&eth_to_usdc(&quoter)).await.unwrap_err();

	assert_eq!(error.failures().len(), 2);
	let message = error.to_string();
	assert!(message.contains("Uniswap"), "{}", message);
	assert!(message.contains("execution reverted"), "{}", message);
	assert!(message.contains("ParaSwap-REST"), "{}", message);
	assert!(message.contains("HTTP 500"), "{}", message);
}

#[tokio::test(start_paused = true)]
async fn test_waits_for_slower_better_source() {
	let quick = MockSource::new("Quick", "100").with_delay(Duration::from_millis(10));
	let patient = MockSource::new("Patient", "150").with_delay(Duration::from_millis(500));
	let quoter = quoter_with(&[quick, patient], 5_000);

	let result = quoter.quote(&eth_to_usdc(&quoter)).await.unwrap();

	assert_eq!(result.best.source, "Patient");
	assert_eq!(result.quotes.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_tie_resolved_by_registration_order() {
	let quoter = quoter_with(&[slow("First", "1800"), fast("Second", "1800.000")], 5_000);

	let result = quoter.quote(&eth_to_usdc(&quoter)).await.unwrap();

	assert_eq!(result.best.source, "First");
	assert_eq!(result.quotes[1].source, "Second");
}

#[tokio::test(start_paused = true)]
async fn test_repeated_requests_are_deterministic() {
	let sources = [
		fast("Uniswap", "1800.50"),
		slow("OpenOcean", "1803.40"),
		MockSource::failing("Curve", "execution reverted"),
		fast("ParaSwap-REST", "1805.12"),
	];
	let quoter = quoter_with(&sources, 5_000);
	let request = eth_to_usdc(&quoter);

	let first = quoter.quote(&request).await.unwrap();
	for _ in 0..3 {
		let again = quoter.quote(&request).await.unwrap();
		assert_eq!(again.best.source, first.best.source);
		assert_eq!(again.best.output_amount, first.best.output_amount);
		assert_eq!(again.failures, first.failures);
	}
	let order: Vec<&str> = first.quotes.iter().map(|q| q.source.as_str()).collect();
	assert_eq!(order, vec!["ParaSwap-REST", "OpenOcean", "Uniswap"]);
}

#[tokio::test(start_paused = true)]
async fn test_source_declining_at_call_time_is_skipped() {
	let quoter = quoter_with(
		&[MockSource::declining("Curve"), MockSource::new("Uniswap", "1800.50")],
		5_000,
	);

	let result = quoter.quote(&eth_to_usdc(&quoter)).await.unwrap();

	assert_eq!(result.best.source, "Uniswap");
	assert!(result.failures.is_empty());
	assert_eq!(result.skipped, vec!["curve".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_no_applicable_source_is_no_route() {
	let curve = MockSource::new("Curve", "1").on_networks(vec![Network::Ethereum]);
	let quoter = quoter_with(&[curve], 5_000);

	let error = quoter.quote(&eth_to_usdc(&quoter)).await.unwrap_err();
	assert!(matches!(error, AggregationError::NoRouteFound { ref failures } if failures.is_empty()));
}

#[tokio::test(start_paused = true)]
async fn test_newer_request_supersedes_older_one() {
	let quoter = Arc::new(quoter_with(&[slow("Uniswap", "1800.50")], 5_000));
	let first_request = eth_to_usdc(&quoter);
	let second_request = eth_to_usdc(&quoter);

	let first = {
		let quoter = quoter.clone();
		async move { quoter.quote_latest(&first_request).await }
	};
	let second = {
		let quoter = quoter.clone();
		async move {
			tokio::time::sleep(Duration::from_millis(50)).await;
			quoter.quote_latest(&second_request).await
		}
	};

	let (first, second) = join(first, second).await;
	assert!(matches!(first, Err(AggregationError::Cancelled { .. })));
	assert_eq!(second.unwrap().best.source, "Uniswap");
}

#[tokio::test(start_paused = true)]
async fn test_external_cancellation() {
	let quoter = quoter_with(&[hanging("Uniswap")], 60_000);
	let request = eth_to_usdc(&quoter);
	let cancel = CancellationToken::new();

	let trigger = {
		let cancel = cancel.clone();
		async move {
			tokio::time::sleep(Duration::from_millis(100)).await;
			cancel.cancel();
		}
	};
	let (result, _) = join(quoter.aggregator().aggregate(&request, &cancel), trigger).await;

	match result {
		Err(AggregationError::Cancelled { request_id }) => assert_eq!(request_id, request.request_id),
		other => panic!("expected cancellation, got {:?}", other.map(|r| r.best.source)),
	}
}
