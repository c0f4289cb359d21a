//! Shared domain models used by adapters, the aggregator and configuration

pub mod amount;
pub mod network;
pub mod secret_string;
pub mod token;

pub use amount::{AmountError, TokenAmount};
pub use network::{Network, NetworkParseError};
pub use secret_string::SecretString;
pub use token::{TokenCatalog, TokenInfo, NATIVE_TOKEN_ADDRESS};
