use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = biota_api::Args::parse();

	biota_api::run(args).await
}
