use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = hitokoto_scheduler::Args::parse();
	hitokoto_scheduler::run(args).await
}
