use std::{collections::BTreeSet, path::PathBuf, sync::Arc};

use clap::Parser;

use hitokoto_domain::{keyword_set, records::SearchQuery, timestamp};
use hitokoto_service::{
	BatchOptions, Collaborators, PipelineExecutor, PipelineSettings, orchestrator,
};
use hitokoto_storage::{
	DataLayout, artifacts::ArtifactStore, downloads::DownloadCache, ledger::FileLedger,
	publish_log::PublishLog, state,
};

/// Searches arXiv for one keyword set, summarizes new papers and posts the last one.
#[derive(Debug, Parser)]
#[command(
	version = hitokoto_cli::VERSION,
	rename_all = "kebab",
	styles = hitokoto_cli::styles(),
)]
pub struct Args {
	#[arg(required = true, value_name = "KEYWORD")]
	pub keywords: Vec<String>,
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[arg(long, default_value_t = 200)]
	pub max_results: u32,
	/// Join keywords with OR instead of AND.
	#[arg(long)]
	pub use_or: bool,
	#[arg(long)]
	pub force_download: bool,
	/// Process papers that are already in the ledger.
	#[arg(long)]
	pub force_process: bool,
	/// Process at most one paper.
	#[arg(long)]
	pub test_mode: bool,
	#[arg(long)]
	pub skip_publish: bool,
	#[arg(long, default_value_t = 9999)]
	pub max_process: usize,
	/// Publish-log directory. Defaults to the keyword set's partition under the data root.
	#[arg(long, value_name = "DIR")]
	pub log_dir: Option<PathBuf>,
	/// Only papers published at or after this time (`YYYY-MM-DDTHH:MM:SSZ` or `YYYY-MM-DD`).
	#[arg(long, value_name = "TIMESTAMP")]
	pub since_timestamp: Option<String>,
	/// Only papers whose identifier sorts after this one.
	#[arg(long, value_name = "ID")]
	pub last_paper_id: Option<String>,
	/// Newline-separated identifiers to treat as already processed.
	#[arg(long, value_name = "FILE")]
	pub processed_ids_file: Option<PathBuf>,
	/// Where to write the identifiers recorded by this run.
	#[arg(long, value_name = "FILE")]
	pub output_processed_ids: Option<PathBuf>,
	#[arg(long, short = 'v')]
	pub verbose: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = hitokoto_config::load(&args.config)?;

	hitokoto_cli::init_tracing(&config.service.log_level, args.verbose);

	let keywords = args
		.keywords
		.iter()
		.map(|keyword| keyword.trim().to_string())
		.filter(|keyword| !keyword.is_empty())
		.collect::<Vec<_>>();

	if keywords.is_empty() {
		return Err(color_eyre::eyre::eyre!("At least one non-empty keyword is required."));
	}

	let since_timestamp = args.since_timestamp.as_deref().map(timestamp::parse_since).transpose()?;
	let preloaded = match &args.processed_ids_file {
		Some(path) => state::read_id_list(path)?,
		None => BTreeSet::new(),
	};
	let layout = DataLayout::new(&config.paths.root);
	let log_dir = args
		.log_dir
		.clone()
		.unwrap_or_else(|| layout.log_dir(&keyword_set::log_partition(&keywords)));
	let collaborators = Collaborators::live(&config)?;
	let settings = PipelineSettings::from_config(&config);
	let options = BatchOptions {
		max_process: args.max_process,
		force_download: args.force_download,
		force_process: args.force_process,
		skip_publish: args.skip_publish,
		test_mode: args.test_mode,
		inter_paper_delay: settings.inter_paper_delay,
	};
	let executor = PipelineExecutor::new(
		collaborators.clone(),
		Arc::new(FileLedger::new(layout.processed_dir())),
		ArtifactStore::new(&layout),
		DownloadCache::new(&layout, &keyword_set::download_partition(&keywords)),
		PublishLog::new(log_dir),
		settings,
	);
	let query = SearchQuery {
		keywords,
		max_results: args.max_results,
		use_or: args.use_or,
		since_timestamp,
		since_id: args.last_paper_id.clone(),
	};

	tracing::info!(preloaded = preloaded.len(), "Loaded processed identifiers.");

	let report =
		orchestrator::search_and_process(&collaborators, &executor, &query, &preloaded, &options)
			.await?;

	if let Some(path) = &args.output_processed_ids
		&& !report.newly_processed.is_empty()
	{
		let ids = report.newly_processed.iter().cloned().collect::<BTreeSet<_>>();

		state::write_id_list(path, &ids)?;
		tracing::info!(path = %path.display(), count = ids.len(), "Wrote processed identifiers.");
	}

	tracing::info!(
		candidates = report.candidates,
		recorded = report.newly_processed.len(),
		failed = report.failed,
		published = report.published,
		"Search finished."
	);

	Ok(())
}
