//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{CalendarArgs, ExpirationsArgs, LoadArgs, PullArgs, ReconcileArgs};

/// Divyield - index implied dividend yield reconciliation
#[derive(Parser)]
#[command(name = "divyield")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(short, long, global = true, env = "DIVYIELD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List canonical option expirations for a date range
    Expirations(ExpirationsArgs),

    /// Reconcile a vendor CSV table to the front quarterly maturities
    Reconcile(ReconcileArgs),

    /// Fetch, store and reconcile implied dividend yields per index
    Pull(PullArgs),

    /// Print a stored dataset
    Load(LoadArgs),

    /// List trading days or holidays of a market calendar
    Calendar(CalendarArgs),

    /// Show the effective configuration
    Config,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}
