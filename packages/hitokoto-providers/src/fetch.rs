use std::time::Duration;

use reqwest::{Client, header::CONTENT_TYPE};

use crate::{Error, Result};
use hitokoto_config::Fetch;

const PROVIDER: &str = "content host";
const HTML_PREFIXES: [&[u8]; 2] = [b"<!doctype html", b"<html"];

/// Downloads paper bytes with fixed pauses around each request.
pub struct HttpFetcher {
	client: Client,
	pre_delay: Duration,
	post_delay: Duration,
}
impl HttpFetcher {
	pub fn new(cfg: &Fetch, user_agent: &str) -> Result<Self> {
		Ok(Self {
			client: crate::http_client(cfg.timeout_ms, Some(user_agent))?,
			pre_delay: Duration::from_millis(cfg.pre_delay_ms),
			post_delay: Duration::from_millis(cfg.post_delay_ms),
		})
	}

	pub async fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
		tokio::time::sleep(self.pre_delay).await;

		let res = self.client.get(locator).send().await?;
		let res = crate::check_status(PROVIDER, res).await?;
		let content_type = res
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map(str::to_string);
		let body = res.bytes().await?;

		if looks_like_html(content_type.as_deref(), &body) {
			return Err(Error::UnexpectedContent {
				message: format!("{locator} returned an HTML page instead of a document."),
			});
		}

		tracing::debug!(locator, bytes = body.len(), "Downloaded document.");

		tokio::time::sleep(self.post_delay).await;

		Ok(body.to_vec())
	}
}

/// Hosts answer rate-limited or missing documents with an HTML page and status 200.
pub fn looks_like_html(content_type: Option<&str>, body: &[u8]) -> bool {
	if content_type.is_some_and(|value| value.to_ascii_lowercase().contains("text/html")) {
		return true;
	}

	let head = body
		.iter()
		.skip_while(|byte| byte.is_ascii_whitespace())
		.take(16)
		.map(u8::to_ascii_lowercase)
		.collect::<Vec<_>>();

	HTML_PREFIXES.iter().any(|prefix| head.starts_with(prefix))
}
