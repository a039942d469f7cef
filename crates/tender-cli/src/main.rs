//! Tender CLI - recalculate construction tenders from a snapshot file.
//!
//! # Usage
//!
//! ```bash
//! # Recalculate every tender in a snapshot
//! tender recalc --snapshot tenders.json
//!
//! # One tender, as JSON, with a stricter sanity check
//! tender --format json recalc --snapshot tenders.json --tender T-1 --sanity-factor 20
//!
//! # Show every cascade stage of one item
//! tender trace --snapshot tenders.json --tender T-1 --item I-1
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Recalc(ref args) => commands::recalc::execute(args, &cli).await?,
        Commands::Trace(ref args) => commands::trace::execute(args, &cli)?,
    }

    Ok(())
}

/// Logs go to stderr so JSON on stdout stays parseable. `RUST_LOG` wins over `--log-level`.
fn init_tracing(level: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
