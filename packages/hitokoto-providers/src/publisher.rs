use reqwest::Client;
use serde_json::{Map, Value};

use crate::{Error, Result};
use hitokoto_config::PublisherConfig;

const PROVIDER: &str = "X";

/// X API v2 create-post client using an OAuth 2.0 user-context token.
pub struct XPublisher {
	client: Client,
	url: String,
	bearer_token: Option<String>,
}
impl XPublisher {
	pub fn new(cfg: &PublisherConfig) -> Result<Self> {
		Ok(Self {
			client: crate::http_client(cfg.timeout_ms, None)?,
			url: format!("{}{}", cfg.api_base, cfg.path),
			bearer_token: cfg.bearer_token.clone(),
		})
	}

	/// Posts `text` once and returns the new post id.
	pub async fn publish(&self, text: &str) -> Result<String> {
		let Some(token) = self.bearer_token.as_deref() else {
			return Err(Error::InvalidConfig {
				message: "providers.publisher.bearer_token is required to publish.".to_string(),
			});
		};
		let res = self
			.client
			.post(&self.url)
			.headers(crate::auth_headers(token, &Map::new())?)
			.json(&serde_json::json!({ "text": text }))
			.send()
			.await?;
		let json: Value = crate::check_status(PROVIDER, res).await?.json().await?;

		parse_post_id(&json)
	}
}

fn parse_post_id(json: &Value) -> Result<String> {
	json.get("data")
		.and_then(|data| data.get("id"))
		.and_then(|id| match id {
			Value::String(id) => Some(id.clone()),
			Value::Number(id) => Some(id.to_string()),
			_ => None,
		})
		.ok_or_else(|| Error::InvalidResponse {
			message: "Create-post response is missing data.id.".to_string(),
		})
}
