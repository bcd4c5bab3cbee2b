mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Fetch, Paths, Pipeline, Post, Prompt, Providers, PublisherConfig, Retry, Scheduler,
	Search, SearchSet, Service, SummarizerProviderConfig,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.paths.root.as_os_str().is_empty() {
		return Err(Error::Validation { message: "paths.root must be non-empty.".to_string() });
	}
	if cfg.search.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.search.page_size == 0 {
		return Err(Error::Validation {
			message: "search.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.timeout_ms == 0 || cfg.fetch.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.timeout_ms and fetch.timeout_ms must be greater than zero."
				.to_string(),
		});
	}

	let summarizer = &cfg.providers.summarizer;

	if summarizer.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.summarizer.api_key must be non-empty.".to_string(),
		});
	}
	if summarizer.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.summarizer.model must be non-empty.".to_string(),
		});
	}
	if !summarizer.temperature.is_finite() || !(0.0..=2.0).contains(&summarizer.temperature) {
		return Err(Error::Validation {
			message: "providers.summarizer.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if summarizer.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.summarizer.max_tokens must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &summarizer.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!(
					"providers.summarizer.default_headers.{key} must be a string value."
				),
			});
		}
	}

	if cfg.prompt.placeholder.is_empty() {
		return Err(Error::Validation {
			message: "prompt.placeholder must be non-empty.".to_string(),
		});
	}
	if !cfg.prompt.template.contains(&cfg.prompt.placeholder) {
		return Err(Error::MissingPlaceholder { placeholder: cfg.prompt.placeholder.clone() });
	}

	let ellipsis_len = cfg.post.ellipsis.chars().count();

	if cfg.post.hard_cap <= ellipsis_len {
		return Err(Error::Validation {
			message: "post.hard_cap must be longer than post.ellipsis.".to_string(),
		});
	}
	if cfg.post.short_form_threshold == 0 || cfg.post.short_form_threshold > cfg.post.hard_cap {
		return Err(Error::Validation {
			message: "post.short_form_threshold must be in the range 1..=post.hard_cap."
				.to_string(),
		});
	}
	if cfg.post.greeting.chars().count() >= cfg.post.hard_cap {
		return Err(Error::Validation {
			message: "post.greeting must be shorter than post.hard_cap.".to_string(),
		});
	}
	if cfg.retry.max_attempts == 0 {
		return Err(Error::Validation {
			message: "retry.max_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.retry.multiplier == 0 {
		return Err(Error::Validation {
			message: "retry.multiplier must be greater than zero.".to_string(),
		});
	}

	for (idx, set) in cfg.search_sets.iter().enumerate() {
		if set.max_results == 0 {
			return Err(Error::InvalidSearchSet {
				index: idx,
				field: "max_results",
				reason: "must be greater than zero",
			});
		}
		if set.max_process == 0 {
			return Err(Error::InvalidSearchSet {
				index: idx,
				field: "max_process",
				reason: "must be greater than zero",
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.providers
		.publisher
		.bearer_token
		.as_deref()
		.map(|token| token.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.publisher.bearer_token = None;
	}

	for set in &mut cfg.search_sets {
		set.keywords = set
			.keywords
			.iter()
			.map(|keyword| keyword.trim().to_string())
			.filter(|keyword| !keyword.is_empty())
			.collect();
	}
}
