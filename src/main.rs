//! Scorebox - Main Entry Point
//!
//! Binary classification serving with durable prediction logging.

use clap::Parser;
use scorebox::cli::{cmd_check, cmd_serve, Cli, Commands};
use scorebox::server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scorebox=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            cmd_serve(&host, port).await?;
        }
        Some(Commands::Check) => {
            cmd_check().await?;
        }
        None => {
            // Default: serve with env-driven configuration
            let config = ServerConfig::default();
            let (host, port) = (config.host.clone(), config.port);
            cmd_serve(&host, port).await?;
        }
    }

    Ok(())
}
