use std::{path::PathBuf, sync::Arc};

use clap::Parser;

use hitokoto_archive::RenderMode;
use hitokoto_service::{Collaborators, Orchestrator};
use hitokoto_storage::{DataLayout, ledger::FileLedger, state::FileStateStore};

/// Runs every configured keyword set once, sharing one ledger and one state file.
#[derive(Debug, Parser)]
#[command(
	version = hitokoto_cli::VERSION,
	rename_all = "kebab",
	styles = hitokoto_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Re-render every archive page.
	#[arg(long, conflicts_with = "current_only")]
	pub all_pages: bool,
	/// Render only today's pages and the index.
	#[arg(long)]
	pub current_only: bool,
	#[arg(long, short = 'v')]
	pub verbose: bool,
}
impl Args {
	/// Flags override `scheduler.current_only` from the config.
	pub fn render_mode(&self, configured_current_only: bool) -> RenderMode {
		if self.all_pages {
			RenderMode::All
		} else if self.current_only || configured_current_only {
			RenderMode::CurrentOnly
		} else {
			RenderMode::All
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = hitokoto_config::load(&args.config)?;

	hitokoto_cli::init_tracing(&config.service.log_level, args.verbose);

	let layout = DataLayout::new(&config.paths.root);
	let orchestrator = Orchestrator::from_config(
		&config,
		Collaborators::live(&config)?,
		Arc::new(FileLedger::new(layout.processed_dir())),
		Arc::new(FileStateStore::from_layout(&layout)),
	)
	.with_render_mode(args.render_mode(config.scheduler.current_only));
	let report = orchestrator.run(&config.search_sets).await?;

	tracing::info!(
		sets = report.sets.len(),
		completed = report.completed(),
		failed = report.failed(),
		recorded = report.newly_processed(),
		"Scheduler finished."
	);

	Ok(())
}
