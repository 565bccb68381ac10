//! Scorebox CLI
//!
//! Command-line interface for running the prediction server and for
//! one-shot operational checks.

use clap::{Parser, Subcommand};
use colored::*;

use crate::server::{run_server, ServerConfig};
use crate::storage::LogStore;

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}

fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn fail(s: &str) -> ColoredString {
    s.truecolor(230, 100, 100)
}

#[derive(Parser)]
#[command(
    name = "scorebox",
    version,
    about = "Binary classification serving with durable prediction logging"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the prediction API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Bind port
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Check database connectivity and exit
    Check,
}

pub async fn cmd_serve(host: &str, port: u16) -> anyhow::Result<()> {
    println!();
    println!("  {} {}", "scorebox".white().bold(), dim(env!("CARGO_PKG_VERSION")));
    println!("  {} http://{}:{}/predict", dim("predict"), host, port);
    println!("  {} http://{}:{}/health", dim("health "), host, port);
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    let config = ServerConfig {
        host: host.to_string(),
        port,
        ..Default::default()
    };

    run_server(config).await
}

pub async fn cmd_check() -> anyhow::Result<()> {
    let config = ServerConfig::default();
    let store = LogStore::connect_lazy(&config.database_url, 1)?;

    match store.check_connectivity().await {
        Ok(()) => {
            println!("  {} database reachable ({})", ok("✓"), config.database_url);
            Ok(())
        }
        Err(e) => {
            println!("  {} database unreachable: {}", fail("✗"), e);
            Err(e.into())
        }
    }
}
