//! Startup logging for the TradePulse quoter

use std::env;
use tracing::info;

use crate::Settings;

/// Logs service and environment information at startup
pub fn log_service_info() {
	let service_name = "tradepulse-swap";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== TradePulse Quoter Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	if let Ok(config_path) = env::var(crate::loader::CONFIG_PATH_ENV) {
		info!("📋 Config Path: {}", config_path);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the configured networks and sources once wiring is complete
pub fn log_startup_complete(settings: &Settings) {
	for network in &settings.networks {
		info!(
			"🌐 Network {} (chain {}) via {}",
			network.network,
			network.network.chain_id(),
			network.rpc_url.description()
		);
	}
	for source in &settings.sources {
		info!(
			"📡 Source '{}' [{}] enabled={} networks={:?}",
			source.source_id,
			source.venue.type_name(),
			source.enabled,
			source.networks
		);
	}
	info!("✅ TradePulse Quoter ready");
}
