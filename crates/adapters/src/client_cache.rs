//! HTTP client cache for the REST sources
//!
//! Clients are pooled per source configuration and recreated after a TTL so
//! that DNS and TLS state does not go stale in long-running processes.

use dashmap::DashMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use tradepulse_types::{AdapterError, AdapterResult, SecretString};

/// Configuration for creating pooled HTTP clients
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientConfig {
	/// Base endpoint of the aggregator API
	pub base_url: String,
	/// Source identifier for cache differentiation
	pub source_id: String,
	/// Overall request timeout applied by the client
	pub request_timeout_ms: u64,
	/// Maximum number of idle connections per host
	pub max_idle_per_host: usize,
	/// Connection keep-alive timeout
	pub keep_alive_timeout_ms: u64,
	/// Default headers sent with every request
	pub headers: Vec<(String, String)>,
	/// Secret header (name, key); only exposed when the client is built
	pub auth_header: Option<(String, SecretString)>,
}

impl ClientConfig {
	pub fn new(source_id: &str, base_url: &str, request_timeout_ms: u64) -> Self {
		Self {
			base_url: base_url.to_string(),
			source_id: source_id.to_string(),
			request_timeout_ms,
			max_idle_per_host: 10,
			keep_alive_timeout_ms: 90_000,
			headers: vec![
				("User-Agent".to_string(), "TradePulse-Quoter/1.0".to_string()),
				("Accept".to_string(), "application/json".to_string()),
			],
			auth_header: None,
		}
	}

	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		self.headers.push((name.to_string(), value.to_string()));
		self
	}

	/// Attach an API key header, e.g. `0x-api-key`
	pub fn with_api_key(mut self, header: &str, key: &SecretString) -> Self {
		self.auth_header = Some((header.to_string(), key.clone()));
		self
	}

	pub fn has_header(&self, name: &str) -> bool {
		self.headers.iter().any(|(header, _)| header.eq_ignore_ascii_case(name))
			|| self
				.auth_header
				.as_ref()
				.is_some_and(|(header, _)| header.eq_ignore_ascii_case(name))
	}
}

fn header_name(name: &str) -> AdapterResult<HeaderName> {
	HeaderName::from_bytes(name.as_bytes())
		.map_err(|e| AdapterError::config(format!("Invalid header name '{}': {}", name, e)))
}

/// Cached client with creation timestamp for TTL management
#[derive(Debug, Clone)]
struct CachedClient {
	client: Arc<Client>,
	created_at: Instant,
}

impl CachedClient {
	fn new(client: Client) -> Self {
		Self {
			client: Arc::new(client),
			created_at: Instant::now(),
		}
	}

	fn is_expired(&self, ttl: Duration) -> bool {
		self.created_at.elapsed() > ttl
	}
}

/// Thread-safe cache for HTTP clients keyed by source configuration with TTL
#[derive(Clone, Debug)]
pub struct ClientCache {
	clients: Arc<DashMap<ClientConfig, CachedClient>>,
	ttl: Duration,
}

impl ClientCache {
	/// Create a new client cache with default 30-minute TTL
	pub fn new() -> Self {
		Self::with_ttl(Duration::from_secs(30 * 60))
	}

	/// Create a new client cache with custom TTL
	pub fn with_ttl(ttl: Duration) -> Self {
		Self {
			clients: Arc::new(DashMap::new()),
			ttl,
		}
	}

	/// Get or create a client for the given configuration
	pub fn get_client(&self, config: &ClientConfig) -> AdapterResult<Arc<Client>> {
		self.clients.remove_if(config, |_, cached_client| {
			let is_expired = cached_client.is_expired(self.ttl);
			if is_expired {
				warn!(
					"Client cache expired for {} (age: {:?}), will create new client",
					config.base_url,
					cached_client.created_at.elapsed()
				);
			}
			is_expired
		});

		if let Some(cached_client) = self.clients.get(config) {
			return Ok(cached_client.client.clone());
		}

		debug!(
			"Creating new client for source {} at {}",
			config.source_id, config.base_url
		);
		let cached_client = CachedClient::new(Self::create_client(config)?);

		use dashmap::mapref::entry::Entry;

		// Another task may have inserted the same configuration meanwhile
		match self.clients.entry(config.clone()) {
			Entry::Occupied(entry) => Ok(entry.get().client.clone()),
			Entry::Vacant(entry) => {
				let client = cached_client.client.clone();
				entry.insert(cached_client);
				Ok(client)
			},
		}
	}

	fn create_client(config: &ClientConfig) -> AdapterResult<Client> {
		let mut header_map = HeaderMap::new();
		for (key, value) in &config.headers {
			let name = header_name(key)?;
			let value = HeaderValue::from_str(value)
				.map_err(|e| AdapterError::config(format!("Invalid value for header '{}': {}", key, e)))?;
			header_map.insert(name, value);
		}
		if let Some((key, secret)) = &config.auth_header {
			let mut value = HeaderValue::from_str(secret.expose_secret())
				.map_err(|_| AdapterError::config(format!("Invalid value for header '{}'", key)))?;
			value.set_sensitive(true);
			header_map.insert(header_name(key)?, value);
		}

		ClientBuilder::new()
			.timeout(Duration::from_millis(config.request_timeout_ms))
			.pool_max_idle_per_host(config.max_idle_per_host)
			.pool_idle_timeout(Duration::from_millis(config.keep_alive_timeout_ms))
			.tcp_keepalive(Duration::from_secs(60))
			.default_headers(header_map)
			.build()
			.map_err(AdapterError::HttpError)
	}

	/// Remove all expired clients from the cache
	pub fn cleanup_expired(&self) -> usize {
		let mut removed_count = 0;
		self.clients.retain(|_, cached_client| {
			let is_expired = cached_client.is_expired(self.ttl);
			if is_expired {
				removed_count += 1;
			}
			!is_expired
		});

		if removed_count > 0 {
			debug!("Cleaned up {} expired clients from cache", removed_count);
		}
		removed_count
	}

	pub fn len(&self) -> usize {
		self.clients.len()
	}

	pub fn is_empty(&self) -> bool {
		self.clients.is_empty()
	}

	pub fn clear(&self) {
		self.clients.clear();
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Handle to the process-wide cache shared by adapters
	pub fn for_adapter() -> Self {
		global_client_cache().clone()
	}
}

impl Default for ClientCache {
	fn default() -> Self {
		Self::new()
	}
}

lazy_static::lazy_static! {
	static ref GLOBAL_CLIENT_CACHE: ClientCache = ClientCache::new();
}

/// Get the global client cache instance
pub fn global_client_cache() -> &'static ClientCache {
	&GLOBAL_CLIENT_CACHE
}
