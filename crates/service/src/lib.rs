//! TradePulse Service
//!
//! Concurrent best-rate aggregation over liquidity source adapters.

pub mod aggregator;
pub mod supervisor;

pub use aggregator::RateAggregator;
pub use supervisor::QuoteSupervisor;
