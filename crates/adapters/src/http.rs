//! Request and response plumbing shared by the REST sources

use alloy::primitives::U256;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use tradepulse_types::{AdapterError, AdapterResult};
use url::Url;

/// Join `path` onto `base_url`, treating the base as a directory
pub fn build_url(base_url: &str, path: &str) -> AdapterResult<Url> {
	let mut base = Url::parse(base_url)
		.map_err(|e| AdapterError::config(format!("Invalid base URL '{}': {}", base_url, e)))?;

	if !base.path().ends_with('/') {
		base.set_path(&format!("{}/", base.path()));
	}

	base.join(path).map_err(|e| {
		AdapterError::config(format!(
			"Failed to join URL path '{}' to base '{}': {}",
			path, base_url, e
		))
	})
}

/// Largest response body a venue may send
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Status and body of a finished response, capped at [`MAX_BODY_BYTES`]
pub async fn read_body(response: Response) -> AdapterResult<(u16, String)> {
	read_body_limited(response, MAX_BODY_BYTES).await
}

pub async fn read_body_limited(mut response: Response, limit: usize) -> AdapterResult<(u16, String)> {
	let status = response.status().as_u16();
	if let Some(length) = response.content_length() {
		if length > limit as u64 {
			return Err(body_too_large(limit));
		}
	}

	let mut body = Vec::new();
	while let Some(chunk) = response.chunk().await.map_err(AdapterError::HttpError)? {
		append_capped(&mut body, &chunk, limit)?;
	}
	Ok((status, String::from_utf8_lossy(&body).into_owned()))
}

fn append_capped(body: &mut Vec<u8>, chunk: &[u8], limit: usize) -> AdapterResult<()> {
	if body.len() + chunk.len() > limit {
		return Err(body_too_large(limit));
	}
	body.extend_from_slice(chunk);
	Ok(())
}

fn body_too_large(limit: usize) -> AdapterError {
	AdapterError::invalid_response(format!("Response body exceeds {} bytes", limit))
}

pub fn is_success(status: u16) -> bool {
	(200..300).contains(&status)
}

pub fn parse_json<T: DeserializeOwned>(body: &str, what: &str) -> AdapterResult<T> {
	serde_json::from_str(body)
		.map_err(|e| AdapterError::invalid_response(format!("Failed to parse {}: {}", what, e)))
}

/// Parse an integer amount that APIs send either as a string or a JSON number
pub fn json_amount(value: &serde_json::Value, field: &str) -> AdapterResult<U256> {
	let text = match value {
		serde_json::Value::String(s) => s.clone(),
		serde_json::Value::Number(n) => n.to_string(),
		other => {
			return Err(AdapterError::invalid_response(format!(
				"{} is not an amount: {}",
				field, other
			)))
		},
	};
	U256::from_str(text.trim()).map_err(|e| {
		AdapterError::invalid_response(format!("{} '{}' is not an integer: {}", field, text, e))
	})
}
