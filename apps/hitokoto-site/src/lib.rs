use std::path::PathBuf;

use clap::Parser;
use time::{Date, OffsetDateTime};

use hitokoto_archive::RenderMode;
use hitokoto_domain::timestamp;

/// Renders the static archive for one publish-log directory.
#[derive(Debug, Parser)]
#[command(
	version = hitokoto_cli::VERSION,
	rename_all = "kebab",
	styles = hitokoto_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[arg(long, value_name = "DIR")]
	pub log_dir: PathBuf,
	#[arg(long, value_name = "DIR")]
	pub output_dir: PathBuf,
	/// Render only the pages for `--date` and the index.
	#[arg(long)]
	pub current_only: bool,
	/// Date treated as today (`YYYY-MM-DD`). Defaults to the current UTC date.
	#[arg(long, value_name = "DATE")]
	pub date: Option<String>,
	#[arg(long, short = 'v')]
	pub verbose: bool,
}
impl Args {
	pub fn today(&self) -> color_eyre::Result<Date> {
		match &self.date {
			Some(raw) => Ok(timestamp::parse_since(raw)?.date()),
			None => Ok(OffsetDateTime::now_utc().date()),
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = hitokoto_config::load(&args.config)?;

	hitokoto_cli::init_tracing(&config.service.log_level, args.verbose);

	let mode = if args.current_only { RenderMode::CurrentOnly } else { RenderMode::All };
	let summary = hitokoto_archive::render(&args.log_dir, &args.output_dir, mode, args.today()?)?;

	if summary.records == 0 {
		tracing::warn!(log_dir = %args.log_dir.display(), "Nothing was rendered.");
	} else {
		println!("{}", args.output_dir.join("index.html").display());
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use super::*;

	#[test]
	fn explicit_date_overrides_today() {
		let args = Args::try_parse_from([
			"hitokoto-site",
			"-c",
			"cfg.toml",
			"--log-dir",
			"logs",
			"--output-dir",
			"site",
			"--date",
			"2024-03-05",
		])
		.expect("Failed to parse arguments.");

		assert_eq!(args.today().expect("Bad date."), date!(2024-03-05));
	}
}
