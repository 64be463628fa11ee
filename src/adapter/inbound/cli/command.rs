//! Command-line interface definitions.
//!
//! Defines the CLI structure for the closeline application using `clap`.
//! Every command prints JSON to stdout; errors go to stderr with a nonzero
//! exit code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::domain::Outcome;

/// Parlay consistency checking and closing-line-value tracking.
#[derive(Parser, Debug)]
#[command(name = "closeline")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the closeline CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check parlay legs for contradictions
    #[command(subcommand)]
    Parlay(ParlayCommand),

    /// Start tracking a suggestion from a JSON file
    Track(TrackArgs),

    /// Record the closing line for a tracked suggestion
    Close(CloseArgs),

    /// Record the settlement of a tracked suggestion
    Settle(SettleArgs),

    /// Show a tracked suggestion
    Show(ShowArgs),

    /// Show daily accuracy summaries
    Summary(SummaryArgs),

    /// Validate the configuration file
    CheckConfig,
}

/// Subcommands for `closeline parlay`.
#[derive(Subcommand, Debug)]
pub enum ParlayCommand {
    /// Report contradicting leg pairs per game.
    Validate(LegsFileArg),
    /// Keep the first leg of each contradiction and drop the rest.
    Filter(LegsFileArg),
}

/// A JSON file holding an array of legs.
#[derive(Parser, Debug)]
pub struct LegsFileArg {
    /// Path to the legs file.
    pub file: PathBuf,
}

/// Arguments for `closeline track`.
#[derive(Parser, Debug)]
pub struct TrackArgs {
    /// Path to a JSON file with the suggestion fields (camelCase).
    pub file: PathBuf,
}

/// Arguments for `closeline close`.
#[derive(Parser, Debug)]
pub struct CloseArgs {
    /// Tracking id or bet id.
    pub key: String,

    /// Closing decimal odds.
    #[arg(long)]
    pub decimal: Option<Decimal>,

    /// Closing American odds.
    #[arg(long, allow_negative_numbers = true)]
    pub american: Option<i32>,

    /// Sportsbook the closing price was taken from.
    #[arg(long)]
    pub book: Option<String>,
}

/// Arguments for `closeline settle`.
#[derive(Parser, Debug)]
pub struct SettleArgs {
    /// Tracking id or bet id.
    pub key: String,

    /// Outcome: win, loss, push or cancelled.
    #[arg(long)]
    pub outcome: Option<Outcome>,

    /// The prediction was correct.
    #[arg(long)]
    pub correct: bool,
}

/// Arguments for `closeline show`.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Tracking id or bet id.
    pub key: String,
}

/// Arguments for `closeline summary`.
#[derive(Parser, Debug)]
pub struct SummaryArgs {
    /// First day to include (YYYY-MM-DD). Defaults to 29 days before `--to`.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Print daily rows as CSV instead of JSON.
    #[arg(long)]
    pub csv: bool,
}
