//! witpkg CLI entry point
//!
//! Parses arguments, installs the tracing subscriber, and executes the
//! selected pipeline. The subscriber writes to stderr and honors the
//! `WITPKG_LOG` environment variable over the verbosity flags.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};
use witpkg_cli::cli::Cli;
use witpkg_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        std::env::var("WITPKG_LOG").unwrap_or_else(|_| cli.log_filter().to_string());
    fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(error) => {
            user_friendly_error(error).display();
            std::process::exit(1);
        }
    }
}
