use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = hitokoto_search::Args::parse();
	hitokoto_search::run(args).await
}
