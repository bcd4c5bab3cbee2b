use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub paths: Paths,
	pub search: Search,
	pub fetch: Fetch,
	pub providers: Providers,
	pub prompt: Prompt,
	#[serde(default)]
	pub post: Post,
	#[serde(default)]
	pub retry: Retry,
	#[serde(default)]
	pub pipeline: Pipeline,
	#[serde(default)]
	pub scheduler: Scheduler,
	#[serde(default)]
	pub search_sets: Vec<SearchSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
	/// Data root. Downloads, ledger markers, artifacts, publish logs and run state live below it.
	pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	#[serde(default = "default_search_api_base")]
	pub api_base: String,
	pub page_size: u32,
	pub page_delay_ms: u64,
	pub timeout_ms: u64,
	pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fetch {
	pub timeout_ms: u64,
	/// Pause before each download request.
	pub pre_delay_ms: u64,
	/// Pause after each completed download.
	pub post_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub summarizer: SummarizerProviderConfig,
	pub publisher: PublisherConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub max_tokens: u32,
	pub timeout_ms: u64,
	pub system_prompt: String,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublisherConfig {
	pub api_base: String,
	pub path: String,
	/// OAuth 2.0 user-context token. Optional so that runs with publishing disabled need no secret.
	pub bearer_token: Option<String>,
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prompt {
	pub template: String,
	#[serde(default = "default_placeholder")]
	pub placeholder: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Post {
	#[serde(default = "default_greeting")]
	pub greeting: String,
	#[serde(default = "default_short_form_threshold")]
	pub short_form_threshold: usize,
	#[serde(default = "default_hard_cap")]
	pub hard_cap: usize,
	#[serde(default = "default_ellipsis")]
	pub ellipsis: String,
	#[serde(default = "default_reference_url_base")]
	pub reference_url_base: String,
}
impl Default for Post {
	fn default() -> Self {
		Self {
			greeting: default_greeting(),
			short_form_threshold: default_short_form_threshold(),
			hard_cap: default_hard_cap(),
			ellipsis: default_ellipsis(),
			reference_url_base: default_reference_url_base(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Retry {
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	#[serde(default = "default_initial_delay_ms")]
	pub initial_delay_ms: u64,
	#[serde(default = "default_multiplier")]
	pub multiplier: u32,
}
impl Default for Retry {
	fn default() -> Self {
		Self {
			max_attempts: default_max_attempts(),
			initial_delay_ms: default_initial_delay_ms(),
			multiplier: default_multiplier(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
	#[serde(default = "default_inter_paper_delay_ms")]
	pub inter_paper_delay_ms: u64,
}
impl Default for Pipeline {
	fn default() -> Self {
		Self { inter_paper_delay_ms: default_inter_paper_delay_ms() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scheduler {
	#[serde(default = "default_wait_between_sets_ms")]
	pub wait_between_sets_ms: u64,
	#[serde(default = "default_true")]
	pub current_only: bool,
}
impl Default for Scheduler {
	fn default() -> Self {
		Self { wait_between_sets_ms: default_wait_between_sets_ms(), current_only: true }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSet {
	#[serde(default)]
	pub keywords: Vec<String>,
	/// Site output directory for this set's archive.
	#[serde(default)]
	pub output_dir: PathBuf,
	#[serde(default = "default_max_results")]
	pub max_results: u32,
	#[serde(default = "default_true")]
	pub tweet_enabled: bool,
	#[serde(default)]
	pub use_or: bool,
	#[serde(default = "default_max_process")]
	pub max_process: usize,
}

fn default_search_api_base() -> String {
	"http://export.arxiv.org/api/query".to_string()
}

fn default_placeholder() -> String {
	"{paper_text}".to_string()
}

fn default_greeting() -> String {
	"C(・ω・ )つ みんなー！".to_string()
}

fn default_short_form_threshold() -> usize {
	130
}

fn default_hard_cap() -> usize {
	280
}

fn default_ellipsis() -> String {
	"...".to_string()
}

fn default_reference_url_base() -> String {
	"https://arxiv.org/abs/".to_string()
}

fn default_max_attempts() -> u32 {
	3
}

fn default_initial_delay_ms() -> u64 {
	2_000
}

fn default_multiplier() -> u32 {
	2
}

fn default_inter_paper_delay_ms() -> u64 {
	5_000
}

fn default_wait_between_sets_ms() -> u64 {
	10_000
}

fn default_max_results() -> u32 {
	100
}

fn default_max_process() -> usize {
	9_999
}

fn default_true() -> bool {
	true
}
