//! TradePulse Types
//!
//! Domain models and the source adapter contract shared by every crate of the
//! TradePulse swap quoter.

pub mod adapters;
pub mod models;
pub mod quotes;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use adapters::{
	AdapterError, AdapterResult, FailureKind, IntegrationStyle, SourceAdapter, SourceInfo,
};

pub use models::{
	AmountError, Network, NetworkParseError, SecretString, TokenAmount, TokenCatalog, TokenInfo,
	NATIVE_TOKEN_ADDRESS,
};

pub use quotes::{
	AggregationError, AggregationResult, Quote, QuoteRequest, QuoteValidationError, SourceFailure,
};

// Amounts are alloy integers throughout
pub use alloy::primitives::U256;
