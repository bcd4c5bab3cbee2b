//! arXiv Atom API search.

use std::time::Duration;

use feed_rs::model::Entry;
use reqwest::Client;
use time::OffsetDateTime;

use crate::{Error, Result};
use hitokoto_config::Search;
use hitokoto_domain::{
	identity,
	records::{CandidateRecord, SearchQuery},
	timestamp,
};

const PROVIDER: &str = "arXiv";
/// Upper bound of the submission-date range; the API has no open-ended form.
const OPEN_UPPER_BOUND: &str = "999912312359";
const PDF_MEDIA_TYPE: &str = "application/pdf";

pub struct ArxivClient {
	client: Client,
	api_base: String,
	page_size: u32,
	page_delay: Duration,
}
impl ArxivClient {
	pub fn new(cfg: &Search) -> Result<Self> {
		Ok(Self {
			client: crate::http_client(cfg.timeout_ms, Some(&cfg.user_agent))?,
			api_base: cfg.api_base.clone(),
			page_size: cfg.page_size,
			page_delay: Duration::from_millis(cfg.page_delay_ms),
		})
	}

	/// Pages through results newest first, then applies both floors client side.
	pub async fn search(&self, query: &SearchQuery) -> Result<Vec<CandidateRecord>> {
		let search_query = build_search_query(query);
		let mut candidates = Vec::new();
		let mut start = 0_u32;

		tracing::info!(query = %search_query, max_results = query.max_results, "Searching arXiv.");

		while start < query.max_results {
			if start > 0 {
				tokio::time::sleep(self.page_delay).await;
			}

			let size = self.page_size.min(query.max_results - start);
			let res = self
				.client
				.get(&self.api_base)
				.query(&[
					("search_query", search_query.clone()),
					("start", start.to_string()),
					("max_results", size.to_string()),
					("sortBy", "submittedDate".to_string()),
					("sortOrder", "descending".to_string()),
				])
				.send()
				.await?;
			let body = crate::check_status(PROVIDER, res).await?.bytes().await?;
			let page = parse_feed(&body)?;
			let fetched = page.len() as u32;

			tracing::debug!(start, fetched, "Fetched arXiv result page.");

			candidates.extend(page);

			if fetched < size {
				break;
			}

			start += size;
		}

		let found = candidates.len();
		let admitted: Vec<_> =
			candidates.into_iter().filter(|candidate| query.admits(candidate)).collect();

		tracing::info!(found, admitted = admitted.len(), "arXiv search finished.");

		Ok(admitted)
	}
}

/// Builds the `search_query` parameter.
///
/// Multi-word keywords are quoted as phrases. The keyword group is parenthesized when a date floor
/// is added so that an OR group stays a single operand.
pub fn build_search_query(query: &SearchQuery) -> String {
	let joiner = if query.use_or { " OR " } else { " AND " };
	let terms = query
		.keywords
		.iter()
		.map(|keyword| {
			if keyword.contains(char::is_whitespace) {
				format!("\"{keyword}\"")
			} else {
				keyword.clone()
			}
		})
		.collect::<Vec<_>>()
		.join(joiner);

	match query.since_timestamp {
		Some(since) => format!(
			"({terms}) AND submittedDate:[{} TO {OPEN_UPPER_BOUND}]",
			timestamp::format_query(since)
		),
		None => terms,
	}
}

/// Parses one Atom page. Entries without a usable PDF locator or publication time are skipped.
pub fn parse_feed(body: &[u8]) -> Result<Vec<CandidateRecord>> {
	let feed = feed_rs::parser::parse(body)?;
	let mut candidates = Vec::with_capacity(feed.entries.len());

	for entry in feed.entries {
		match candidate_from_entry(&entry) {
			Ok(candidate) => candidates.push(candidate),
			Err(err) => {
				tracing::warn!(entry_id = %entry.id, error = %err, "Skipping arXiv entry.");
			},
		}
	}

	Ok(candidates)
}

fn candidate_from_entry(entry: &Entry) -> Result<CandidateRecord> {
	let locator = pdf_locator(entry).ok_or_else(|| Error::UnexpectedContent {
		message: "Entry has no PDF link.".to_string(),
	})?;
	let id = identity::resolve(&locator)
		.map_err(|err| Error::UnexpectedContent { message: err.to_string() })?;
	let published = entry.published.or(entry.updated).ok_or_else(|| Error::UnexpectedContent {
		message: "Entry has no publication time.".to_string(),
	})?;
	let published = OffsetDateTime::from_unix_timestamp(published.timestamp())
		.map_err(|err| Error::UnexpectedContent { message: err.to_string() })?;
	let title = entry
		.title
		.as_ref()
		.map(|title| title.content.split_whitespace().collect::<Vec<_>>().join(" "))
		.unwrap_or_default();

	Ok(CandidateRecord { id, title, published, locator })
}

fn pdf_locator(entry: &Entry) -> Option<String> {
	if let Some(link) = entry.links.iter().find(|link| {
		link.media_type.as_deref() == Some(PDF_MEDIA_TYPE) || link.title.as_deref() == Some("pdf")
	}) {
		return Some(link.href.clone());
	}

	entry.id.contains("/abs/").then(|| entry.id.replacen("/abs/", "/pdf/", 1))
}
