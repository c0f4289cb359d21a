//! Shared fixtures for the integration tests
//!
//! Venue response bodies, a fake venue HTTP server and helpers to build
//! quoters over in-memory sources.

pub mod fixtures;
pub mod sources;
pub mod venue_server;

#[allow(unused_imports)]
pub use venue_server::VenueServer;
