//! Binary crate for the `multiweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive vendor configuration
//! - Fetching readings and writing the raw envelope to disk

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cmd.log_level)
        .init();

    cmd.run().await
}
