//! Drives one paper through fetch, extract, summarize, publish and record.
//!
//! Side effects accumulate and are never rolled back. A paper that fails after fetch keeps its
//! downloaded bytes, so the next pass reuses them.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::{Collaborators, PaperError, PipelineSettings};
use hitokoto_domain::{
	identity, post_text,
	records::{CandidateRecord, PublishLogRecord, SummaryArtifact},
	timestamp,
};
use hitokoto_storage::{
	artifacts::ArtifactStore, downloads::DownloadCache, ledger::Ledger, publish_log::PublishLog,
};

const MAX_FAILURE_TEXT_CHARS: usize = 1_024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperOutcome {
	/// The ledger now holds the paper. `published` is true only when a post was created.
	Recorded { published: bool },
	/// The ledger already held the paper when the skip check ran.
	Skipped,
	Failed(PaperError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaperOptions {
	pub force_process: bool,
	pub publish: bool,
}

pub struct PipelineExecutor {
	collaborators: Collaborators,
	ledger: Arc<dyn Ledger>,
	artifacts: ArtifactStore,
	downloads: DownloadCache,
	publish_log: PublishLog,
	settings: PipelineSettings,
}
impl PipelineExecutor {
	pub fn new(
		collaborators: Collaborators,
		ledger: Arc<dyn Ledger>,
		artifacts: ArtifactStore,
		downloads: DownloadCache,
		publish_log: PublishLog,
		settings: PipelineSettings,
	) -> Self {
		Self { collaborators, ledger, artifacts, downloads, publish_log, settings }
	}

	pub fn ledger(&self) -> &dyn Ledger {
		self.ledger.as_ref()
	}

	pub fn downloads(&self) -> &DownloadCache {
		&self.downloads
	}

	pub fn settings(&self) -> &PipelineSettings {
		&self.settings
	}

	/// Makes the paper's bytes available in this executor's download partition.
	///
	/// Unless `force_download` is set, an existing local copy or a copy from a sibling partition
	/// is used before anything is fetched.
	pub async fn stage(
		&self,
		candidate: &CandidateRecord,
		id: &str,
		force_download: bool,
	) -> Result<(), PaperError> {
		if !force_download && let Some(source) = self.downloads.copy_from_sibling(id)? {
			tracing::debug!(arxiv_id = id, source = %source.display(), "Using cached document.");

			return Ok(());
		}

		self.download(candidate, id).await.map(|_| ())
	}

	/// Runs the paper to a terminal state. Every failure is logged and folded into the outcome.
	pub async fn run(&self, candidate: &CandidateRecord, options: PaperOptions) -> PaperOutcome {
		let id = match identity::resolve(&candidate.locator) {
			Ok(id) => id,
			Err(err) => {
				let err = PaperError::from(err);

				tracing::warn!(locator = %candidate.locator, error = %err, "Skipping paper.");

				return PaperOutcome::Failed(err);
			},
		};

		match self.try_run(candidate, &id, options).await {
			Ok(outcome) => outcome,
			Err(err) => {
				tracing::error!(
					arxiv_id = %id,
					stage = err.stage(),
					error = %err,
					"Paper failed; it stays unrecorded for the next pass."
				);

				PaperOutcome::Failed(err)
			},
		}
	}

	async fn try_run(
		&self,
		candidate: &CandidateRecord,
		id: &str,
		options: PaperOptions,
	) -> Result<PaperOutcome, PaperError> {
		let bytes = self.load_or_fetch(candidate, id).await?;

		if !options.force_process && self.ledger.contains(id)? {
			tracing::info!(arxiv_id = id, "Paper already processed; skipping.");

			return Ok(PaperOutcome::Skipped);
		}

		let text = self
			.collaborators
			.extractor
			.extract(&bytes)
			.map_err(|err| PaperError::ExtractionFailed { message: err.to_string() })?;

		self.artifacts.write_text(id, &text)?;

		tracing::debug!(arxiv_id = id, chars = text.chars().count(), "Extracted text.");

		let summary = self.summarize(&text).await?;
		let reference_url = identity::reference_url(&self.settings.post.reference_url_base, id);
		let composed = post_text::compose(&summary, &self.settings.post);
		let final_text =
			post_text::attach_reference(&composed, &reference_url, self.settings.post.hard_cap);
		let now = timestamp::format_log(OffsetDateTime::now_utc());

		self.artifacts.write_summary(&SummaryArtifact {
			title: candidate.title.clone(),
			timestamp: now.clone(),
			summary: summary.clone(),
			post_text: final_text.clone(),
			arxiv_id: id.to_string(),
		})?;

		if options.publish {
			self.publish(candidate, id, &summary, &final_text, now).await?;
		} else {
			self.publish_log.write(&PublishLogRecord::silent(
				&candidate.title,
				now,
				&summary,
				&final_text,
				id,
			))?;

			tracing::info!(arxiv_id = id, "Publishing skipped for this paper.");
		}

		self.ledger.mark(id, &candidate.title)?;

		tracing::info!(arxiv_id = id, published = options.publish, "Paper recorded.");

		Ok(PaperOutcome::Recorded { published: options.publish })
	}

	async fn load_or_fetch(
		&self,
		candidate: &CandidateRecord,
		id: &str,
	) -> Result<Vec<u8>, PaperError> {
		if let Some(bytes) = self.downloads.read(id)? {
			return Ok(bytes);
		}

		self.download(candidate, id).await
	}

	async fn download(&self, candidate: &CandidateRecord, id: &str) -> Result<Vec<u8>, PaperError> {
		tracing::info!(arxiv_id = id, title = %candidate.title, "Downloading paper.");

		let bytes = self
			.collaborators
			.fetcher
			.fetch(&candidate.locator)
			.await
			.map_err(|err| PaperError::FetchFailed { message: err.to_string() })?;

		self.downloads.store(id, &bytes)?;

		Ok(bytes)
	}

	async fn summarize(&self, text: &str) -> Result<String, PaperError> {
		let summarizer = &self.collaborators.summarizer;
		let prompt = &self.settings.prompt;

		self.settings
			.retry
			.run("summarize", move || summarizer.summarize(text, prompt))
			.await
			.map_err(|err| PaperError::SummarizationFailed { message: err.to_string() })
	}

	async fn publish(
		&self,
		candidate: &CandidateRecord,
		id: &str,
		summary: &str,
		text: &str,
		now: String,
	) -> Result<(), PaperError> {
		match self.collaborators.publisher.publish(text).await {
			Ok(post_id) => {
				self.publish_log.write(&PublishLogRecord::published(
					&candidate.title,
					now,
					summary,
					text,
					id,
					post_id.clone(),
				))?;

				tracing::info!(arxiv_id = id, post_id = %post_id, "Published paper.");

				Ok(())
			},
			Err(err) => {
				let message = sanitize_failure_text(&err.to_string());
				let record =
					PublishLogRecord::failed(&candidate.title, now, summary, id, message.clone());

				if let Err(write_err) = self.publish_log.write(&record) {
					tracing::error!(
						arxiv_id = id,
						error = %write_err,
						"Failed to write publish failure record."
					);
				}

				Err(PaperError::PublishFailed { message })
			},
		}
	}
}

/// Redacts bearer tokens and credential assignments and caps the length.
pub fn sanitize_failure_text(text: &str) -> String {
	let mut parts = Vec::new();
	let mut redact_next = false;

	for raw in text.split_whitespace() {
		let mut word = raw.to_string();

		if redact_next {
			word = "[REDACTED]".to_string();
			redact_next = false;
		}
		if raw.eq_ignore_ascii_case("bearer") {
			redact_next = true;
		}

		let lowered = raw.to_ascii_lowercase();

		for key in ["api_key", "apikey", "password", "secret", "token"] {
			if lowered.contains(key) && (lowered.contains('=') || lowered.contains(':')) {
				let sep = if raw.contains('=') { '=' } else { ':' };
				let prefix = raw.split(sep).next().unwrap_or(raw);

				word = format!("{prefix}{sep}[REDACTED]");

				break;
			}
		}

		parts.push(word);
	}

	let mut out = parts.join(" ");

	if out.chars().count() > MAX_FAILURE_TEXT_CHARS {
		out = out.chars().take(MAX_FAILURE_TEXT_CHARS).collect();
		out.push_str("...");
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn redacts_credentials() {
		let text = "401 Unauthorized: Bearer abc123 rejected, access_token=xyz";

		assert_eq!(
			sanitize_failure_text(text),
			"401 Unauthorized: Bearer [REDACTED] rejected, access_token=[REDACTED]"
		);
	}

	#[test]
	fn caps_length() {
		let text = "x ".repeat(2_000);

		assert_eq!(sanitize_failure_text(&text).chars().count(), MAX_FAILURE_TEXT_CHARS + 3);
	}
}
