pub mod arxiv;
pub mod extract;
pub mod fetch;
pub mod publisher;
pub mod summarizer;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client, Response, StatusCode,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

const ERROR_BODY_PREVIEW_CHARS: usize = 256;

pub fn auth_headers(token: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {token}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

fn http_client(timeout_ms: u64, user_agent: Option<&str>) -> Result<Client> {
	let mut builder = Client::builder().timeout(Duration::from_millis(timeout_ms));

	if let Some(user_agent) = user_agent {
		builder = builder.user_agent(user_agent);
	}

	Ok(builder.build()?)
}

/// Maps HTTP 429 to [`Error::RateLimited`] and any other failure status to a response error.
async fn check_status(provider: &str, res: Response) -> Result<Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	let body = res.text().await.unwrap_or_default();
	let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();

	if status == StatusCode::TOO_MANY_REQUESTS {
		return Err(Error::RateLimited { provider: provider.to_string(), message: preview });
	}

	Err(Error::InvalidResponse { message: format!("{provider} returned HTTP {status}: {preview}") })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn non_string_default_header_is_rejected() {
		let mut defaults = Map::new();

		defaults.insert("X-Retries".to_string(), Value::from(3));

		assert!(matches!(auth_headers("secret", &defaults), Err(Error::InvalidConfig { .. })));
	}
}
