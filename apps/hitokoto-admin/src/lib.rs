use std::{io::Write, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use time::OffsetDateTime;

use hitokoto_storage::{
	DataLayout,
	purge::{self, PurgeTargets},
};

/// Operator tools for the data root and the publish logs.
#[derive(Debug, Parser)]
#[command(
	version = hitokoto_cli::VERSION,
	rename_all = "kebab",
	styles = hitokoto_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Empty selected directories under the data root. This is the only way to forget processed
	/// papers.
	Purge(PurgeArgs),
	/// Write Markdown statistics for a publish-log directory, optionally with a CSV export.
	Report(ReportArgs),
}

#[derive(Debug, clap::Args)]
pub struct PurgeArgs {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[arg(long)]
	pub pdfs: bool,
	#[arg(long)]
	pub texts: bool,
	#[arg(long)]
	pub summaries: bool,
	/// Ledger markers and the shared processed-id list.
	#[arg(long)]
	pub processed: bool,
	#[arg(long)]
	pub logs: bool,
	#[arg(long)]
	pub all: bool,
}
impl PurgeArgs {
	pub fn targets(&self) -> PurgeTargets {
		if self.all {
			return PurgeTargets::all();
		}

		PurgeTargets {
			pdfs: self.pdfs,
			texts: self.texts,
			summaries: self.summaries,
			processed: self.processed,
			logs: self.logs,
		}
	}
}

#[derive(Debug, clap::Args)]
pub struct ReportArgs {
	#[arg(long, value_name = "DIR")]
	pub log_dir: PathBuf,
	/// Markdown destination. Printed to stdout when omitted.
	#[arg(long, short = 'o', value_name = "FILE")]
	pub output: Option<PathBuf>,
	/// Also export every record, one row each, to this CSV file.
	#[arg(long, value_name = "FILE")]
	pub csv: Option<PathBuf>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	match args.command {
		Command::Purge(purge_args) => run_purge(purge_args, args.verbose),
		Command::Report(report_args) => run_report(report_args, args.verbose),
	}
}

fn run_purge(args: PurgeArgs, verbose: bool) -> color_eyre::Result<()> {
	let targets = args.targets();

	if targets.is_empty() {
		let mut command = Args::command();

		if let Some(purge) = command.find_subcommand_mut("purge") {
			purge.print_help()?;
		}

		return Ok(());
	}

	let config = hitokoto_config::load(&args.config)?;

	hitokoto_cli::init_tracing(&config.service.log_level, verbose);

	let report = purge::purge(&DataLayout::new(&config.paths.root), targets)?;

	for dir in &report.cleared_dirs {
		tracing::info!(dir = %dir.display(), "Cleared directory.");
	}

	tracing::info!(removed = report.removed.len(), "Purge finished.");

	Ok(())
}

fn run_report(args: ReportArgs, verbose: bool) -> color_eyre::Result<()> {
	hitokoto_cli::init_tracing("info", verbose);

	let records = hitokoto_archive::records::load_dir(&args.log_dir)?;
	let markdown = hitokoto_archive::report::markdown(&records, OffsetDateTime::now_utc());

	match &args.output {
		Some(path) => {
			hitokoto_storage::write_atomic(path, markdown.as_bytes())?;
			tracing::info!(path = %path.display(), records = records.len(), "Report written.");
		},
		None => std::io::stdout().write_all(markdown.as_bytes())?,
	}

	if let Some(path) = &args.csv {
		if records.is_empty() {
			tracing::warn!(path = %path.display(), "No publish logs to export.");
		} else {
			let bytes = hitokoto_archive::report::to_csv(&records)?;

			hitokoto_storage::write_atomic(path, &bytes)?;
			tracing::info!(path = %path.display(), records = records.len(), "CSV export written.");
		}
	}

	Ok(())
}
