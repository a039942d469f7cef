//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{RecalcArgs, TraceArgs};

/// Tender - construction tender markup engine
#[derive(Parser)]
#[command(name = "tender")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Log filter, e.g. "info" or "tender_engine=debug"
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, env = "TENDER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Recompute commercial amounts and totals from base amounts
    Recalc(RecalcArgs),

    /// Show every cascade stage for one item
    Trace(TraceArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}
