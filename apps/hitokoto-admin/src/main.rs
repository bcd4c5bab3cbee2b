use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = hitokoto_admin::Args::parse();
	hitokoto_admin::run(args).await
}
