use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

/// Installs the global fmt subscriber unless one is already set.
///
/// `verbose` overrides the configured directive with `debug`. An unparsable directive falls back
/// to `info`.
pub fn init_tracing(log_level: &str, verbose: bool) {
	let directive = if verbose { "debug" } else { log_level };
	let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

	let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
