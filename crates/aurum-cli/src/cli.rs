//! CLI argument definitions for aurum.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ingest` | Fetch one day's OHLC rate and append it to the series |
//! | `report` | Compose the weekly, daily and live messages and send them |
//! | `run` | `ingest` followed by `report` |
//! | `series` | Print the selected window as JSON |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--series` | `AURUM_SERIES_PATH` | Series CSV file |
//! | `--today` | current UTC date | Reference date |
//! | `--timeout-ms` | `AURUM_TIMEOUT_MS` | HTTP timeout in ms |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Daily cron entry
//! aurum run --live
//!
//! # Preview messages without sending them
//! aurum report --dry-run --today 2024-01-05
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Daily precious-metal price digest.
#[derive(Debug, Parser)]
#[command(
    name = "aurum",
    author,
    version,
    about = "Daily precious-metal price ingestion and summaries"
)]
pub struct Cli {
    /// Series CSV file. Overrides AURUM_SERIES_PATH.
    #[arg(long, global = true)]
    pub series: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD) instead of the current UTC date.
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// HTTP timeout in milliseconds. Overrides AURUM_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one day's OHLC rate and append it unless already stored.
    Ingest(IngestArgs),
    /// Compose the summary messages and send them.
    Report(ReportArgs),
    /// Ingest, then report.
    Run(ReportArgs),
    /// Print the selected window as JSON.
    Series(SeriesArgs),
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Date to ingest. Defaults to today minus the settlement lag.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Also fetch the latest spot price and compare it with the last close.
    #[arg(long, default_value_t = false)]
    pub live: bool,

    /// Print the messages instead of sending them.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// Trailing window length. Defaults to AURUM_WINDOW.
    #[arg(long)]
    pub days: Option<u32>,
}
