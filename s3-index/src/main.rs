use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use s3_index::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // RUST_LOG wins over the flag when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match s3_index::run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("[ERROR] Run failed: {e:#}");
            std::process::exit(1);
        }
    }
}
