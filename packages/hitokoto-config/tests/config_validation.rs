use std::{fs, path::PathBuf};

use toml::Value;

use hitokoto_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn set_key(value: &mut Value, section: &[&str], key: &str, new_value: Value) {
	let mut table = value.as_table_mut().expect("Template config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{name}]."));
	}

	table.insert(key.to_string(), new_value);
}

fn write_temp_config(dir: &tempfile::TempDir, payload: &str) -> PathBuf {
	let path = dir.path().join("hitokoto.toml");

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_value(value: &Value) -> Result<Config, Error> {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let payload = toml::to_string(value).expect("Failed to render template config.");
	let path = write_temp_config(&dir, &payload);

	hitokoto_config::load(&path)
}

fn validation_message(result: Result<Config, Error>) -> String {
	match result {
		Err(Error::Validation { message }) => message,
		Err(other) => panic!("Expected validation error, got {other:?}."),
		Ok(_) => panic!("Expected validation error, got a config."),
	}
}

#[test]
fn sample_config_loads() {
	let cfg = load_value(&sample_value()).expect("Sample config must load.");

	assert_eq!(cfg.search_sets.len(), 2);
	assert_eq!(cfg.search_sets[0].keywords, vec!["quantum", "cryptography"]);
	assert!(cfg.search_sets[0].tweet_enabled);
	assert!(!cfg.search_sets[0].use_or);
	assert_eq!(cfg.search_sets[0].max_process, 9_999);
	assert!(cfg.search_sets[1].use_or);
	assert_eq!(cfg.post.hard_cap, 280);
	assert_eq!(cfg.retry.max_attempts, 3);
}

#[test]
fn optional_sections_fall_back_to_defaults() {
	let mut value = sample_value();
	let root = value.as_table_mut().expect("Template config must be a table.");

	for section in ["post", "retry", "pipeline", "scheduler"] {
		root.remove(section);
	}

	let cfg = load_value(&value).expect("Config without optional sections must load.");

	assert_eq!(cfg.post.short_form_threshold, 130);
	assert_eq!(cfg.post.ellipsis, "...");
	assert_eq!(cfg.retry.initial_delay_ms, 2_000);
	assert_eq!(cfg.retry.multiplier, 2);
	assert_eq!(cfg.pipeline.inter_paper_delay_ms, 5_000);
	assert_eq!(cfg.scheduler.wait_between_sets_ms, 10_000);
	assert!(cfg.scheduler.current_only);
}

#[test]
fn blank_bearer_token_normalizes_to_none() {
	let mut value = sample_value();

	set_key(&mut value, &["providers", "publisher"], "bearer_token", Value::String("  ".into()));

	let cfg = load_value(&value).expect("Blank bearer token must load.");

	assert!(cfg.providers.publisher.bearer_token.is_none());
}

#[test]
fn blank_keywords_are_dropped() {
	let mut value = sample_value();
	let sets = value
		.as_table_mut()
		.and_then(|root| root.get_mut("search_sets"))
		.and_then(Value::as_array_mut)
		.expect("Template config must include [[search_sets]].");
	let first = sets[0].as_table_mut().expect("Search set must be a table.");

	first.insert(
		"keywords".to_string(),
		Value::Array(vec![Value::String(" ".into()), Value::String(" quantum ".into())]),
	);

	let cfg = load_value(&value).expect("Config must load.");

	assert_eq!(cfg.search_sets[0].keywords, vec!["quantum"]);
}

#[test]
fn template_without_placeholder_is_rejected() {
	let mut value = sample_value();

	set_key(&mut value, &["prompt"], "template", Value::String("Summarize.".into()));

	match load_value(&value) {
		Err(err @ Error::MissingPlaceholder { .. }) => {
			assert_eq!(
				err.to_string(),
				"prompt.template must contain the placeholder {paper_text}."
			);
		},
		other => panic!("Expected missing placeholder error, got {other:?}."),
	}
}

#[test]
fn zero_max_results_names_the_search_set() {
	let mut value = sample_value();
	let sets = value
		.as_table_mut()
		.and_then(|root| root.get_mut("search_sets"))
		.and_then(Value::as_array_mut)
		.expect("Template config must include [[search_sets]].");

	sets[1]
		.as_table_mut()
		.expect("Search set must be a table.")
		.insert("max_results".to_string(), Value::Integer(0));

	match load_value(&value) {
		Err(err @ Error::InvalidSearchSet { index: 1, field: "max_results", .. }) => {
			assert_eq!(err.to_string(), "search_sets[1].max_results must be greater than zero.");
		},
		other => panic!("Expected invalid search set error, got {other:?}."),
	}
}

#[test]
fn empty_summarizer_key_is_rejected() {
	let mut value = sample_value();

	set_key(&mut value, &["providers", "summarizer"], "api_key", Value::String(String::new()));

	let message = validation_message(load_value(&value));

	assert_eq!(message, "providers.summarizer.api_key must be non-empty.");
}

#[test]
fn short_form_threshold_above_hard_cap_is_rejected() {
	let mut value = sample_value();

	set_key(&mut value, &["post"], "short_form_threshold", Value::Integer(500));

	let message = validation_message(load_value(&value));

	assert!(message.contains("post.short_form_threshold"), "Unexpected message: {message}");
}

#[test]
fn zero_retry_attempts_are_rejected() {
	let mut value = sample_value();

	set_key(&mut value, &["retry"], "max_attempts", Value::Integer(0));

	let message = validation_message(load_value(&value));

	assert_eq!(message, "retry.max_attempts must be greater than zero.");
}

#[test]
fn non_string_default_header_is_rejected() {
	let mut value = sample_value();

	set_key(
		&mut value,
		&["providers", "summarizer", "default_headers"],
		"X-Retry",
		Value::Integer(1),
	);

	let message = validation_message(load_value(&value));

	assert!(message.contains("default_headers.X-Retry"), "Unexpected message: {message}");
}

#[test]
fn missing_file_reports_path() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let path = dir.path().join("missing.toml");

	match hitokoto_config::load(&path) {
		Err(Error::ReadConfig { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("Expected read error, got {other:?}."),
	}
}
