pub mod batch;
pub mod executor;
pub mod orchestrator;
pub mod retry;

mod error;

pub use batch::{BatchOptions, BatchReport};
pub use error::{Error, PaperError, Result};
pub use executor::{PaperOutcome, PipelineExecutor};
pub use orchestrator::{Orchestrator, PassReport, SetOutcome, SetReport};
pub use retry::RetryPolicy;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use hitokoto_config::{Config, Post, Prompt};
use hitokoto_domain::records::{CandidateRecord, SearchQuery};
use hitokoto_providers::{
	arxiv::ArxivClient, extract, fetch::HttpFetcher, publisher::XPublisher,
	summarizer::ChatSummarizer,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type ProviderError = hitokoto_providers::Error;

pub type ProviderResult<T> = hitokoto_providers::Result<T>;

pub trait PaperSearch
where
	Self: Send + Sync,
{
	/// Candidates newest first, already filtered by both floors of `query`.
	fn search<'a>(&'a self, query: &'a SearchQuery)
	-> BoxFuture<'a, ProviderResult<Vec<CandidateRecord>>>;
}

pub trait ContentFetcher
where
	Self: Send + Sync,
{
	fn fetch<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>>;
}

pub trait TextExtractor
where
	Self: Send + Sync,
{
	fn extract(&self, bytes: &[u8]) -> ProviderResult<String>;
}

pub trait Summarizer
where
	Self: Send + Sync,
{
	/// One attempt. Rate limits surface as [`ProviderError::RateLimited`].
	fn summarize<'a>(
		&'a self,
		text: &'a str,
		prompt: &'a Prompt,
	) -> BoxFuture<'a, ProviderResult<String>>;
}

pub trait Publisher
where
	Self: Send + Sync,
{
	fn publish<'a>(&'a self, text: &'a str) -> BoxFuture<'a, ProviderResult<String>>;
}

#[derive(Clone)]
pub struct Collaborators {
	pub search: Arc<dyn PaperSearch>,
	pub fetcher: Arc<dyn ContentFetcher>,
	pub extractor: Arc<dyn TextExtractor>,
	pub summarizer: Arc<dyn Summarizer>,
	pub publisher: Arc<dyn Publisher>,
}
impl Collaborators {
	pub fn new(
		search: Arc<dyn PaperSearch>,
		fetcher: Arc<dyn ContentFetcher>,
		extractor: Arc<dyn TextExtractor>,
		summarizer: Arc<dyn Summarizer>,
		publisher: Arc<dyn Publisher>,
	) -> Self {
		Self { search, fetcher, extractor, summarizer, publisher }
	}

	/// arXiv search, HTTP fetch, PDF extraction, chat completion and X posting.
	pub fn live(cfg: &Config) -> Result<Self> {
		Ok(Self {
			search: Arc::new(ArxivClient::new(&cfg.search)?),
			fetcher: Arc::new(HttpFetcher::new(&cfg.fetch, &cfg.search.user_agent)?),
			extractor: Arc::new(PdfTextExtractor),
			summarizer: Arc::new(ChatSummarizer::new(&cfg.providers.summarizer)?),
			publisher: Arc::new(XPublisher::new(&cfg.providers.publisher)?),
		})
	}
}

/// Per-paper settings shared by every executor in a pass.
#[derive(Clone)]
pub struct PipelineSettings {
	pub prompt: Prompt,
	pub post: Post,
	pub retry: RetryPolicy<ProviderError>,
	pub inter_paper_delay: Duration,
}
impl PipelineSettings {
	pub fn from_config(cfg: &Config) -> Self {
		Self {
			prompt: cfg.prompt.clone(),
			post: cfg.post.clone(),
			retry: RetryPolicy::from_config(&cfg.retry)
				.with_retryable(is_transient)
				.with_rate_limit_signal(ProviderError::is_rate_limited),
			inter_paper_delay: Duration::from_millis(cfg.pipeline.inter_paper_delay_ms),
		}
	}
}

struct PdfTextExtractor;

impl PaperSearch for ArxivClient {
	fn search<'a>(
		&'a self,
		query: &'a SearchQuery,
	) -> BoxFuture<'a, ProviderResult<Vec<CandidateRecord>>> {
		Box::pin(ArxivClient::search(self, query))
	}
}

impl ContentFetcher for HttpFetcher {
	fn fetch<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>> {
		Box::pin(HttpFetcher::fetch(self, locator))
	}
}

impl TextExtractor for PdfTextExtractor {
	fn extract(&self, bytes: &[u8]) -> ProviderResult<String> {
		extract::extract_text(bytes)
	}
}

impl Summarizer for ChatSummarizer {
	fn summarize<'a>(
		&'a self,
		text: &'a str,
		prompt: &'a Prompt,
	) -> BoxFuture<'a, ProviderResult<String>> {
		Box::pin(ChatSummarizer::summarize(self, text, prompt))
	}
}

impl Publisher for XPublisher {
	fn publish<'a>(&'a self, text: &'a str) -> BoxFuture<'a, ProviderResult<String>> {
		Box::pin(XPublisher::publish(self, text))
	}
}

/// Configuration and header errors will not heal on retry.
fn is_transient(err: &ProviderError) -> bool {
	!matches!(
		err,
		ProviderError::InvalidConfig { .. }
			| ProviderError::InvalidHeaderName(_)
			| ProviderError::InvalidHeaderValue(_)
	)
}
