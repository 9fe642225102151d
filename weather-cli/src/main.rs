//! Binary crate for the interactive `weather` client.
//!
//! This crate focuses on:
//! - Start-up: configuration, credentials, logging
//! - Reading commands from the terminal
//! - Dispatching commands and background fetch results
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod command;
mod dispatcher;
mod input;
mod render;
mod setup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so they never mix with the REPL on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
