//! Pull command implementation.
//!
//! For each index: fetch from the vendor export, store the raw table, reload
//! it, reconcile, and store the front maturities.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use divyield_core::Date;
use divyield_ext_file::{CsvObservationSource, CsvObservationStore};
use divyield_traits::IndexId;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::error::CliError;
use crate::output::{print_output, print_success, print_warning};
use crate::pipeline::Pipeline;

/// Arguments for the pull command.
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Index to pull; repeat for several. Defaults to the configured list.
    #[arg(short, long = "index")]
    pub indices: Vec<IndexId>,

    /// Directory of vendor exports (<INDEX>.csv). Defaults to source_dir.
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Dataset directory. Defaults to data_dir.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// First observation date. Defaults to start_date.
    #[arg(short, long)]
    pub start: Option<Date>,

    /// Last observation date. Defaults to end_date.
    #[arg(short, long)]
    pub end: Option<Date>,
}

/// Execute the pull command.
pub fn execute(args: PullArgs, ctx: &Context) -> Result<()> {
    let (start, end) = ctx.date_range(args.start, args.end)?;
    let source_dir = args
        .source_dir
        .or_else(|| ctx.config.source_dir.clone())
        .ok_or_else(|| {
            CliError::MissingArgument("--source-dir (or source_dir in the configuration)".into())
        })?;
    let data_dir = args.data_dir.unwrap_or_else(|| ctx.config.data_dir.clone());
    let indices = if args.indices.is_empty() {
        ctx.config.indices.clone()
    } else {
        args.indices
    };
    if indices.is_empty() {
        return Err(CliError::MissingArgument("--index".into()).into());
    }

    if let Some(user) = &ctx.config.credentials.username {
        tracing::debug!(%user, "vendor credentials are not used by the file source");
    }

    let source = CsvObservationSource::new(&source_dir)?;
    let store = CsvObservationStore::new(&data_dir)?;
    let calendar = ctx.calendar(None)?;
    let pipeline = Pipeline::new(&source, &store, ctx.reconciler(calendar.as_calendar()));

    let summaries = pipeline.run(&indices, start, end)?;

    if ctx.quiet {
        return Ok(());
    }
    print_output(&summaries, ctx.format)?;
    if ctx.format == OutputFormat::Table {
        for summary in summaries.iter().filter(|s| s.raw_rows == 0) {
            print_warning(&format!("{}: no vendor rows in {start} .. {end}", summary.index));
        }
        print_success(&format!(
            "Stored {} indices under {}",
            summaries.len(),
            data_dir.display()
        ));
    }
    Ok(())
}
