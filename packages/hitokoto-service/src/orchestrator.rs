//! Runs every configured keyword set in sequence and carries state between passes.
//!
//! Watermarks and the shared processed-id set are loaded once before the first set and saved once
//! after the last, so an interrupted pass reruns every set from its previous watermark.

use std::{collections::BTreeSet, sync::Arc, time::Duration};

use time::OffsetDateTime;

use crate::{
	BatchOptions, BatchReport, Collaborators, Error, PipelineExecutor, PipelineSettings, Result,
	batch,
};
use hitokoto_archive::RenderMode;
use hitokoto_config::{Config, SearchSet};
use hitokoto_domain::{
	keyword_set,
	records::{SearchQuery, WatermarkEntry},
	timestamp,
};
use hitokoto_storage::{
	DataLayout,
	artifacts::ArtifactStore,
	downloads::DownloadCache,
	ledger::Ledger,
	publish_log::PublishLog,
	state::{RunState, StateStore},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
	Completed(BatchReport),
	Skipped { reason: String },
	Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetReport {
	pub set_id: String,
	pub outcome: SetOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
	pub sets: Vec<SetReport>,
}
impl PassReport {
	pub fn completed(&self) -> usize {
		self.sets.iter().filter(|set| matches!(set.outcome, SetOutcome::Completed(_))).count()
	}

	pub fn failed(&self) -> usize {
		self.sets.iter().filter(|set| matches!(set.outcome, SetOutcome::Failed { .. })).count()
	}

	pub fn newly_processed(&self) -> usize {
		self.sets
			.iter()
			.map(|set| match &set.outcome {
				SetOutcome::Completed(batch) => batch.newly_processed.len(),
				_ => 0,
			})
			.sum()
	}
}

pub struct Orchestrator {
	layout: DataLayout,
	collaborators: Collaborators,
	ledger: Arc<dyn Ledger>,
	state: Arc<dyn StateStore>,
	settings: PipelineSettings,
	wait_between_sets: Duration,
	render_mode: RenderMode,
}
impl Orchestrator {
	pub fn new(
		layout: DataLayout,
		collaborators: Collaborators,
		ledger: Arc<dyn Ledger>,
		state: Arc<dyn StateStore>,
		settings: PipelineSettings,
		wait_between_sets: Duration,
	) -> Self {
		Self {
			layout,
			collaborators,
			ledger,
			state,
			settings,
			wait_between_sets,
			render_mode: RenderMode::CurrentOnly,
		}
	}

	pub fn from_config(
		cfg: &Config,
		collaborators: Collaborators,
		ledger: Arc<dyn Ledger>,
		state: Arc<dyn StateStore>,
	) -> Self {
		let render_mode =
			if cfg.scheduler.current_only { RenderMode::CurrentOnly } else { RenderMode::All };

		Self::new(
			DataLayout::new(&cfg.paths.root),
			collaborators,
			ledger,
			state,
			PipelineSettings::from_config(cfg),
			Duration::from_millis(cfg.scheduler.wait_between_sets_ms),
		)
		.with_render_mode(render_mode)
	}

	pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
		self.render_mode = render_mode;

		self
	}

	/// Executor bound to the keyword set's download and publish-log partitions.
	pub fn executor_for(&self, keywords: &[String]) -> PipelineExecutor {
		PipelineExecutor::new(
			self.collaborators.clone(),
			self.ledger.clone(),
			ArtifactStore::new(&self.layout),
			DownloadCache::new(&self.layout, &keyword_set::download_partition(keywords)),
			PublishLog::new(self.layout.log_dir(&keyword_set::log_partition(keywords))),
			self.settings.clone(),
		)
	}

	/// One full pass. Only loading or saving run state can fail the pass.
	pub async fn run(&self, sets: &[SearchSet]) -> Result<PassReport> {
		let mut state = self.state.load()?;
		let mut report = PassReport::default();
		let mut ran_any = false;

		tracing::info!(
			sets = sets.len(),
			known_ids = state.processed_ids.len(),
			"Starting scheduler pass."
		);

		for set in sets {
			let set_id = keyword_set::set_id(&set.keywords);

			if let Some(reason) = skip_reason(set) {
				tracing::warn!(set_id = %set_id, reason, "Skipping search set.");

				report
					.sets
					.push(SetReport {
						set_id,
						outcome: SetOutcome::Skipped { reason: reason.into() },
					});

				continue;
			}

			if ran_any {
				tokio::time::sleep(self.wait_between_sets).await;
			}

			ran_any = true;

			let outcome = self.run_set(set, &set_id, &mut state).await;

			report.sets.push(SetReport { set_id, outcome });
		}

		self.state.save(&state)?;

		tracing::info!(
			completed = report.completed(),
			failed = report.failed(),
			recorded = report.newly_processed(),
			"Scheduler pass finished."
		);

		Ok(report)
	}

	async fn run_set(&self, set: &SearchSet, set_id: &str, state: &mut RunState) -> SetOutcome {
		let watermark = state.watermarks.get(set_id).cloned();
		let since_timestamp =
			watermark.as_ref().and_then(|entry| match timestamp::parse_since(&entry.timestamp) {
				Ok(ts) => Some(ts),
				Err(err) => {
					tracing::warn!(set_id, error = %err, "Ignoring unreadable watermark.");

					None
				},
			});
		let last_paper_id = watermark.and_then(|entry| entry.last_paper_id);
		let run_start = OffsetDateTime::now_utc();
		let query = SearchQuery {
			keywords: set.keywords.clone(),
			max_results: set.max_results,
			use_or: set.use_or,
			since_timestamp,
			since_id: last_paper_id.clone(),
		};
		let options = BatchOptions {
			max_process: set.max_process,
			force_download: false,
			force_process: false,
			skip_publish: !set.tweet_enabled,
			test_mode: false,
			inter_paper_delay: self.settings.inter_paper_delay,
		};
		let executor = self.executor_for(&set.keywords);

		tracing::info!(
			set_id,
			since = %since_timestamp.map(timestamp::format_watermark).unwrap_or_default(),
			"Running keyword set."
		);

		let batch = match search_and_process(
			&self.collaborators,
			&executor,
			&query,
			&state.processed_ids,
			&options,
		)
		.await
		{
			Ok(batch) => batch,
			Err(err) => {
				tracing::error!(
					set_id,
					error = %err,
					"Keyword set failed; continuing with the next set."
				);

				return SetOutcome::Failed { message: err.to_string() };
			},
		};

		state.watermarks.insert(
			set_id.to_string(),
			WatermarkEntry { timestamp: timestamp::format_watermark(run_start), last_paper_id },
		);
		state.processed_ids.extend(batch.newly_processed.iter().cloned());

		self.render(set);

		SetOutcome::Completed(batch)
	}

	fn render(&self, set: &SearchSet) {
		let log_dir = self.layout.log_dir(&keyword_set::log_partition(&set.keywords));
		let today = OffsetDateTime::now_utc().date();

		if let Err(err) =
			hitokoto_archive::render(&log_dir, &set.output_dir, self.render_mode, today)
		{
			tracing::warn!(
				output_dir = %set.output_dir.display(),
				error = %err,
				"Archive rendering failed."
			);
		}
	}
}

/// Searches once and runs the batch over whatever came back.
///
/// A search failure is the only way a keyword set fails; per-paper failures stay inside the batch
/// report.
pub async fn search_and_process(
	collaborators: &Collaborators,
	executor: &PipelineExecutor,
	query: &SearchQuery,
	preloaded: &BTreeSet<String>,
	options: &BatchOptions,
) -> Result<BatchReport> {
	let candidates = collaborators.search.search(query).await.map_err(|err| {
		Error::KeywordSetFailed {
			set_id: keyword_set::set_id(&query.keywords),
			message: err.to_string(),
		}
	})?;

	tracing::info!(found = candidates.len(), "Search returned candidates.");

	if candidates.is_empty() {
		return Ok(BatchReport::default());
	}

	Ok(batch::run_batch(executor, &candidates, preloaded, options).await)
}

fn skip_reason(set: &SearchSet) -> Option<&'static str> {
	if set.keywords.is_empty() {
		return Some("no keywords");
	}
	if set.output_dir.as_os_str().is_empty() {
		return Some("no output directory");
	}

	None
}
