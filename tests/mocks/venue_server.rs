//! Fake venue HTTP server
//!
//! Serves canned JSON per path on an ephemeral local port and records every
//! request it receives, so the REST sources can be exercised end to end.

#![allow(dead_code)]

use axum::{
	extract::{Query, State},
	http::{header, HeaderMap, StatusCode, Uri},
	response::{IntoResponse, Response},
	Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Request as seen by the fake venue
#[derive(Debug, Clone)]
pub struct RecordedRequest {
	pub path: String,
	pub query: HashMap<String, String>,
	pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CannedResponse {
	status: u16,
	body: String,
	delay: Duration,
}

#[derive(Debug, Clone, Default)]
struct ServerState {
	responses: Arc<Mutex<HashMap<String, CannedResponse>>>,
	recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct VenueServer {
	pub base_url: String,
	state: ServerState,
	handle: JoinHandle<()>,
}

impl VenueServer {
	pub async fn spawn() -> Self {
		let state = ServerState::default();
		let app = Router::new().fallback(respond).with_state(state.clone());

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
			.await
			.expect("bind test port");
		let addr = listener.local_addr().unwrap();
		let base_url = format!("http://{}:{}", addr.ip(), addr.port());

		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		Self {
			base_url,
			state,
			handle,
		}
	}

	/// Endpoint under this server for one venue, e.g. `endpoint("paraswap")`
	pub fn endpoint(&self, prefix: &str) -> String {
		format!("{}/{}", self.base_url, prefix)
	}

	pub fn respond(&self, path: &str, status: u16, body: Value) {
		self.respond_after(path, Duration::ZERO, status, body);
	}

	pub fn respond_raw(&self, path: &str, status: u16, body: &str) {
		self.insert(path, CannedResponse {
			status,
			body: body.to_string(),
			delay: Duration::ZERO,
		});
	}

	pub fn respond_after(&self, path: &str, delay: Duration, status: u16, body: Value) {
		self.insert(path, CannedResponse {
			status,
			body: body.to_string(),
			delay,
		});
	}

	fn insert(&self, path: &str, response: CannedResponse) {
		self.state
			.responses
			.lock()
			.unwrap()
			.insert(path.to_string(), response);
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.state.recorded.lock().unwrap().clone()
	}

	pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
		self.requests().into_iter().filter(|r| r.path == path).collect()
	}
}

impl Drop for VenueServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

async fn respond(
	State(state): State<ServerState>,
	uri: Uri,
	headers: HeaderMap,
	Query(query): Query<HashMap<String, String>>,
) -> Response {
	let path = uri.path().to_string();
	state.recorded.lock().unwrap().push(RecordedRequest {
		path: path.clone(),
		query,
		headers: headers
			.iter()
			.filter_map(|(name, value)| {
				value
					.to_str()
					.ok()
					.map(|value| (name.as_str().to_string(), value.to_string()))
			})
			.collect(),
	});

	let canned = state.responses.lock().unwrap().get(&path).cloned();
	let Some(canned) = canned else {
		return (StatusCode::NOT_FOUND, format!("no route for {}", path)).into_response();
	};

	if !canned.delay.is_zero() {
		tokio::time::sleep(canned.delay).await;
	}

	let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
	(status, [(header::CONTENT_TYPE, "application/json")], canned.body).into_response()
}
