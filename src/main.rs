//! TradePulse quote tool
//!
//! Reads one quote request as JSON (first argument, or stdin when absent),
//! aggregates it across the configured sources and prints the result as JSON.
//!
//! ```text
//! tradepulse-quote '{"network":"arbitrum","from":"ETH","to":"USDC","amount":"1"}'
//! ```

use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tradepulse_swap::{
	log_service_info, log_startup_complete, serde_json, AggregationError, QuoteInput,
	QuoterBuilder,
};

/// Exit code when every source failed or none applied
const EXIT_NO_ROUTE: i32 = 2;

async fn read_input() -> Result<QuoteInput, Box<dyn std::error::Error>> {
	let raw = match std::env::args().nth(1) {
		Some(arg) => arg,
		None => {
			let mut buffer = String::new();
			tokio::io::stdin().read_to_string(&mut buffer).await?;
			buffer
		},
	};
	Ok(serde_json::from_str(raw.trim())?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();

	let builder = QuoterBuilder::from_config()?;
	builder.init_tracing()?;
	log_service_info();

	let quoter = builder.build()?;
	log_startup_complete(quoter.settings());

	let request = read_input().await?.into_request(&quoter)?;

	let cancel = CancellationToken::new();
	let on_interrupt = cancel.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			warn!("Interrupted, cancelling aggregation");
			on_interrupt.cancel();
		}
	});

	match quoter.aggregator().aggregate(&request, &cancel).await {
		Ok(result) => {
			println!("{}", serde_json::to_string_pretty(&result)?);
			Ok(())
		},
		Err(AggregationError::NoRouteFound { failures }) => {
			let error = AggregationError::NoRouteFound { failures };
			eprintln!("{}", error);
			println!(
				"{}",
				serde_json::to_string_pretty(&serde_json::json!({
					"request_id": request.request_id,
					"error": error.to_string(),
					"failures": error.failures(),
				}))?
			);
			std::process::exit(EXIT_NO_ROUTE);
		},
		Err(e) => Err(e.into()),
	}
}
