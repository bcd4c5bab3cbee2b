use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use hitokoto_config::{Prompt, SummarizerProviderConfig};

/// OpenAI-compatible chat completion client.
pub struct ChatSummarizer {
	client: Client,
	cfg: SummarizerProviderConfig,
}
impl ChatSummarizer {
	pub fn new(cfg: &SummarizerProviderConfig) -> Result<Self> {
		Ok(Self { client: crate::http_client(cfg.timeout_ms, None)?, cfg: cfg.clone() })
	}

	/// One completion call. Retries belong to the caller.
	pub async fn summarize(&self, text: &str, prompt: &Prompt) -> Result<String> {
		let url = format!("{}{}", self.cfg.api_base, self.cfg.path);
		let body = request_body(&self.cfg, &render_prompt(prompt, text));
		let res = self
			.client
			.post(url)
			.headers(crate::auth_headers(&self.cfg.api_key, &self.cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = crate::check_status(&self.cfg.provider_id, res).await?.json().await?;

		parse_completion(json)
	}
}

pub fn render_prompt(prompt: &Prompt, text: &str) -> String {
	prompt.template.replace(&prompt.placeholder, text)
}

fn request_body(cfg: &SummarizerProviderConfig, prompt: &str) -> Value {
	serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": [
			{ "role": "system", "content": cfg.system_prompt },
			{ "role": "user", "content": prompt },
		],
	})
}

fn parse_completion(json: Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::trim)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing message content.".to_string(),
		})?;

	if content.is_empty() {
		return Err(Error::InvalidResponse { message: "Completion content is empty.".to_string() });
	}

	Ok(content.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_every_placeholder() {
		let prompt = Prompt {
			template: "Summarize: {paper_text}\n---\n{paper_text}".to_string(),
			placeholder: "{paper_text}".to_string(),
		};

		assert_eq!(render_prompt(&prompt, "body"), "Summarize: body\n---\nbody");
	}

	#[test]
	fn parses_first_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "role": "assistant", "content": "  A tidy synopsis.\n" } }
			]
		});

		assert_eq!(parse_completion(json).expect("parse failed"), "A tidy synopsis.");
	}

	#[test]
	fn rejects_missing_or_blank_content() {
		assert!(parse_completion(serde_json::json!({ "choices": [] })).is_err());
		assert!(
			parse_completion(serde_json::json!({
				"choices": [{ "message": { "content": "   " } }]
			}))
			.is_err()
		);
	}
}
