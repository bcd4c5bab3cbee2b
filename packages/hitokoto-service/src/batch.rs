//! Selects candidates for one keyword set and runs them through the executor.
//!
//! Only the last selected paper publishes. Earlier papers are recorded silently.

use std::{collections::BTreeSet, time::Duration};

use crate::{PaperOutcome, PipelineExecutor, executor::PaperOptions};
use hitokoto_domain::{identity, records::CandidateRecord};
use hitokoto_storage::ledger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
	pub max_process: usize,
	pub force_download: bool,
	pub force_process: bool,
	pub skip_publish: bool,
	/// Caps selection at one paper.
	pub test_mode: bool,
	pub inter_paper_delay: Duration,
}
impl BatchOptions {
	pub fn effective_cap(&self) -> usize {
		if self.test_mode { 1 } else { self.max_process }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
	pub candidates: usize,
	pub selected: usize,
	/// Identifiers that reached the ledger in this batch, in execution order.
	pub newly_processed: Vec<String>,
	/// True only when a post was actually created.
	pub published: bool,
	pub skipped: usize,
	pub failed: usize,
	/// Candidates dropped during selection (malformed locator or failed download).
	pub dropped: usize,
}

struct Selected<'a> {
	candidate: &'a CandidateRecord,
	id: String,
}

pub async fn run_batch(
	executor: &PipelineExecutor,
	candidates: &[CandidateRecord],
	preloaded: &BTreeSet<String>,
	options: &BatchOptions,
) -> BatchReport {
	let mut report = BatchReport { candidates: candidates.len(), ..BatchReport::default() };
	let selected = select(executor, candidates, preloaded, options, &mut report).await;

	report.selected = selected.len();

	if selected.is_empty() {
		tracing::info!(candidates = candidates.len(), "No papers need processing.");

		return report;
	}

	let last = selected.len() - 1;

	for (idx, paper) in selected.iter().enumerate() {
		if idx > 0 {
			tokio::time::sleep(options.inter_paper_delay).await;
		}

		let publish = !options.skip_publish && idx == last;

		tracing::info!(
			arxiv_id = %paper.id,
			position = idx + 1,
			total = selected.len(),
			publish,
			"Processing paper."
		);

		let outcome = executor
			.run(paper.candidate, PaperOptions { force_process: options.force_process, publish })
			.await;

		match outcome {
			PaperOutcome::Recorded { published } => {
				report.newly_processed.push(paper.id.clone());
				report.published |= published;
			},
			PaperOutcome::Skipped => report.skipped += 1,
			PaperOutcome::Failed(_) => report.failed += 1,
		}
	}

	tracing::info!(
		selected = report.selected,
		recorded = report.newly_processed.len(),
		skipped = report.skipped,
		failed = report.failed,
		published = report.published,
		"Batch finished."
	);

	report
}

async fn select<'a>(
	executor: &PipelineExecutor,
	candidates: &'a [CandidateRecord],
	preloaded: &BTreeSet<String>,
	options: &BatchOptions,
	report: &mut BatchReport,
) -> Vec<Selected<'a>> {
	let cap = options.effective_cap();
	let mut selected: Vec<Selected<'a>> = Vec::new();

	for candidate in candidates {
		if selected.len() >= cap {
			break;
		}

		let id = match identity::resolve(&candidate.locator) {
			Ok(id) => id,
			Err(err) => {
				tracing::warn!(locator = %candidate.locator, error = %err, "Skipping candidate.");

				report.dropped += 1;

				continue;
			},
		};

		if selected.iter().any(|paper| paper.id == id) {
			continue;
		}

		if !options.force_process {
			match ledger::is_processed(executor.ledger(), &id, Some(preloaded)) {
				Ok(true) => continue,
				Ok(false) => {},
				Err(err) => {
					tracing::warn!(arxiv_id = %id, error = %err, "Ledger lookup failed; skipping.");

					report.dropped += 1;

					continue;
				},
			}
		}

		if let Err(err) = executor.stage(candidate, &id, options.force_download).await {
			tracing::warn!(arxiv_id = %id, error = %err, "Download failed; dropping candidate.");

			report.dropped += 1;

			continue;
		}

		selected.push(Selected { candidate, id });
	}

	selected
}
