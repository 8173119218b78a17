use anyhow::Result;
use clap::Parser;
use weather_now::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    weather_now::init_tracing();
    let cli = Cli::parse();
    weather_now::run(cli).await
}
