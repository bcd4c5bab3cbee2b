use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = hitokoto_site::Args::parse();
	hitokoto_site::run(args).await
}
