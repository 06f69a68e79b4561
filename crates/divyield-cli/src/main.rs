//! Divyield CLI - pull, reconcile and inspect index implied dividend yields.
//!
//! # Usage
//!
//! ```bash
//! # Canonical quarterly expirations for 2020
//! divyield expirations --start 2020-01-01 --end 2020-12-31
//!
//! # Reconcile a vendor table
//! divyield reconcile --input SPX_raw.csv --output SPX_front.csv --start 2020-01-01 --end 2020-12-31
//!
//! # Pull every configured index from vendor exports
//! divyield --config divyield.toml pull --source-dir ./exports
//!
//! # Show a stored dataset
//! divyield load --index SPX --reconciled
//! ```

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use divyield_config::PipelineConfig;

mod cli;
mod commands;
mod error;
mod output;
mod pipeline;

use cli::{Cli, Commands};
use commands::Context;

/// Configuration file picked up from the working directory when `--config`
/// is not given.
const DEFAULT_CONFIG_FILE: &str = "divyield.toml";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    // Logs go to stderr so table/json/csv output stays clean on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().or_else(|| {
        let default = Path::new(DEFAULT_CONFIG_FILE);
        default.exists().then(|| default.to_path_buf())
    });
    match &config_path {
        Some(path) => tracing::debug!(path = %path.display(), "loading configuration"),
        None => tracing::debug!("using default configuration"),
    }
    let config = PipelineConfig::load(config_path.as_deref())?;
    config.validate_settings()?;

    let ctx = Context {
        config,
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Expirations(args) => commands::expirations::execute(args, &ctx)?,
        Commands::Reconcile(args) => commands::reconcile::execute(args, &ctx)?,
        Commands::Pull(args) => commands::pull::execute(args, &ctx)?,
        Commands::Load(args) => commands::load::execute(args, &ctx)?,
        Commands::Calendar(args) => commands::calendar::execute(args, &ctx)?,
        Commands::Config => commands::show_config(&ctx)?,
    }

    Ok(())
}
