//! In-memory collaborators and fixtures for pipeline tests.

mod error;

pub use error::{Error, Result};

use std::{
	collections::{BTreeSet, VecDeque},
	path::Path,
	sync::{
		Arc, Mutex,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
};

use time::OffsetDateTime;

use hitokoto_config::{Config, Prompt};
use hitokoto_domain::records::{CandidateRecord, SearchQuery};
use hitokoto_service::{
	BoxFuture, Collaborators, ContentFetcher, PaperSearch, ProviderError, ProviderResult,
	Publisher, Summarizer, TextExtractor,
};

/// Builds a candidate whose locator resolves to `id`.
pub fn candidate(id: &str, published: OffsetDateTime) -> CandidateRecord {
	CandidateRecord {
		id: id.to_string(),
		title: format!("Paper {id}"),
		published,
		locator: format!("http://arxiv.org/pdf/{id}"),
	}
}

/// A valid configuration rooted at `root` with every delay set to zero and two search sets.
pub fn sample_config(root: &Path) -> Result<Config> {
	let raw = format!(
		r#"
[service]
log_level = "debug"

[paths]
root = '{root}'

[search]
page_size     = 10
page_delay_ms = 0
timeout_ms    = 1000
user_agent    = "hitokoto-test"

[fetch]
timeout_ms    = 1000
pre_delay_ms  = 0
post_delay_ms = 0

[providers.summarizer]
provider_id   = "test"
api_base      = "http://127.0.0.1:9"
api_key       = "test-key"
path          = "/v1/chat/completions"
model         = "test-model"
temperature   = 0.7
max_tokens    = 300
timeout_ms    = 1000
system_prompt = "Summarize."

[providers.publisher]
api_base   = "http://127.0.0.1:9"
path       = "/2/tweets"
timeout_ms = 1000

[prompt]
template = "Summarize this: {{paper_text}}"

[post]
greeting = "Hi! "

[retry]
max_attempts     = 3
initial_delay_ms = 0
multiplier       = 2

[pipeline]
inter_paper_delay_ms = 0

[scheduler]
wait_between_sets_ms = 0
current_only         = false

[[search_sets]]
keywords    = ["quantum", "cryptography"]
output_dir  = '{root}/site/quantum'
max_results = 10
max_process = 5

[[search_sets]]
keywords      = ["large language model"]
output_dir    = '{root}/site/llm'
max_results   = 10
max_process   = 5
tweet_enabled = false
"#,
		root = root.display()
	);
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Message(format!("Failed to parse sample config: {err}.")))?;

	hitokoto_config::validate(&cfg)?;

	Ok(cfg)
}

/// One of each fake, shared so tests can inspect them after handing clones to the pipeline.
#[derive(Clone, Default)]
pub struct Fakes {
	pub search: Arc<FakeSearch>,
	pub fetcher: Arc<FakeFetcher>,
	pub extractor: Arc<FakeExtractor>,
	pub summarizer: Arc<FakeSummarizer>,
	pub publisher: Arc<FakePublisher>,
}
impl Fakes {
	pub fn with_candidates(candidates: Vec<CandidateRecord>) -> Self {
		Self { search: Arc::new(FakeSearch::new(candidates)), ..Self::default() }
	}

	pub fn collaborators(&self) -> Collaborators {
		Collaborators::new(
			self.search.clone(),
			self.fetcher.clone(),
			self.extractor.clone(),
			self.summarizer.clone(),
			self.publisher.clone(),
		)
	}
}

/// Serves a fixed candidate list, honoring both query floors and `max_results`.
#[derive(Default)]
pub struct FakeSearch {
	candidates: Mutex<Vec<CandidateRecord>>,
	failing_keywords: Mutex<BTreeSet<String>>,
	queries: Mutex<Vec<SearchQuery>>,
}
impl FakeSearch {
	pub fn new(candidates: Vec<CandidateRecord>) -> Self {
		Self { candidates: Mutex::new(candidates), ..Self::default() }
	}

	pub fn set_candidates(&self, candidates: Vec<CandidateRecord>) {
		*self.candidates.lock().unwrap_or_else(|err| err.into_inner()) = candidates;
	}

	/// Every query whose keyword list contains `keyword` fails.
	pub fn fail_for_keyword(&self, keyword: &str) {
		self.failing_keywords
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.insert(keyword.to_string());
	}

	pub fn queries(&self) -> Vec<SearchQuery> {
		self.queries.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl PaperSearch for FakeSearch {
	fn search<'a>(
		&'a self,
		query: &'a SearchQuery,
	) -> BoxFuture<'a, ProviderResult<Vec<CandidateRecord>>> {
		Box::pin(async move {
			self.queries.lock().unwrap_or_else(|err| err.into_inner()).push(query.clone());

			let failing = self.failing_keywords.lock().unwrap_or_else(|err| err.into_inner());

			if query.keywords.iter().any(|keyword| failing.contains(keyword)) {
				return Err(ProviderError::InvalidResponse {
					message: "search backend unavailable".to_string(),
				});
			}

			drop(failing);

			let candidates = self.candidates.lock().unwrap_or_else(|err| err.into_inner());

			Ok(candidates
				.iter()
				.filter(|candidate| query.admits(candidate))
				.take(query.max_results as usize)
				.cloned()
				.collect())
		})
	}
}

/// Returns deterministic bytes per locator and counts every request.
#[derive(Default)]
pub struct FakeFetcher {
	calls: AtomicUsize,
	failing: Mutex<BTreeSet<String>>,
}
impl FakeFetcher {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn fail_for(&self, locator: &str) {
		self.failing.lock().unwrap_or_else(|err| err.into_inner()).insert(locator.to_string());
	}
}
impl ContentFetcher for FakeFetcher {
	fn fetch<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);

			if self.failing.lock().unwrap_or_else(|err| err.into_inner()).contains(locator) {
				return Err(ProviderError::InvalidResponse {
					message: format!("download of {locator} failed"),
				});
			}

			Ok(format!("%PDF-fake {locator}").into_bytes())
		})
	}
}

/// Treats the document bytes as text.
#[derive(Default)]
pub struct FakeExtractor {
	calls: AtomicUsize,
	fail: AtomicBool,
}
impl FakeExtractor {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn set_failing(&self, fail: bool) {
		self.fail.store(fail, Ordering::SeqCst);
	}
}
impl TextExtractor for FakeExtractor {
	fn extract(&self, bytes: &[u8]) -> ProviderResult<String> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		if self.fail.load(Ordering::SeqCst) {
			return Err(ProviderError::UnexpectedContent { message: "no text layer".to_string() });
		}

		Ok(String::from_utf8_lossy(bytes).into_owned())
	}
}

/// Scripted attempt outcome for [`FakeSummarizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
	Succeed,
	Fail,
	RateLimit,
}

/// Answers `Synopsis N.` per successful attempt; queued [`Attempt`]s are consumed first.
#[derive(Default)]
pub struct FakeSummarizer {
	calls: AtomicUsize,
	script: Mutex<VecDeque<Attempt>>,
}
impl FakeSummarizer {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn push_script(&self, attempts: impl IntoIterator<Item = Attempt>) {
		self.script.lock().unwrap_or_else(|err| err.into_inner()).extend(attempts);
	}
}
impl Summarizer for FakeSummarizer {
	fn summarize<'a>(
		&'a self,
		_text: &'a str,
		_prompt: &'a Prompt,
	) -> BoxFuture<'a, ProviderResult<String>> {
		Box::pin(async move {
			let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
			let next = self
				.script
				.lock()
				.unwrap_or_else(|err| err.into_inner())
				.pop_front()
				.unwrap_or(Attempt::Succeed);

			match next {
				Attempt::Succeed => Ok(format!("Synopsis {call}.")),
				Attempt::Fail => Err(ProviderError::InvalidResponse {
					message: "completion service unavailable".to_string(),
				}),
				Attempt::RateLimit => Err(ProviderError::RateLimited {
					provider: "test".to_string(),
					message: "slow down".to_string(),
				}),
			}
		})
	}
}

/// Records every posted text and hands out sequential post ids.
#[derive(Default)]
pub struct FakePublisher {
	posts: Mutex<Vec<String>>,
	fail: AtomicBool,
}
impl FakePublisher {
	pub fn posts(&self) -> Vec<String> {
		self.posts.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn set_failing(&self, fail: bool) {
		self.fail.store(fail, Ordering::SeqCst);
	}
}
impl Publisher for FakePublisher {
	fn publish<'a>(&'a self, text: &'a str) -> BoxFuture<'a, ProviderResult<String>> {
		Box::pin(async move {
			if self.fail.load(Ordering::SeqCst) {
				return Err(ProviderError::InvalidResponse {
					message: "403 Forbidden: Authorization: Bearer secret-token".to_string(),
				});
			}

			let mut posts = self.posts.lock().unwrap_or_else(|err| err.into_inner());

			posts.push(text.to_string());

			Ok((1000 + posts.len()).to_string())
		})
	}
}
