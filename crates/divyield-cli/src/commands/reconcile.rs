//! Reconcile command implementation.
//!
//! Reads a vendor table from CSV, rewrites day-after expirations, keeps the
//! front quarterly maturities per date and writes the result.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::builder::RangedU64ValueParser;
use clap::Args;

use divyield_core::calendars::Market;
use divyield_core::reconcile::ReconcileReport;
use divyield_core::Date;
use divyield_ext_file::{read_observations, write_observations};

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::error::CliError;
use crate::output::{print_header, print_output, print_rows, print_success, KeyValue};

/// Arguments for the reconcile command.
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Raw vendor table (CSV)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the reconciled table. Prints the rows when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// First observation date. Defaults to start_date, then the earliest row.
    #[arg(short, long)]
    pub start: Option<Date>,

    /// Last date of the expiration cycle. Defaults to end_date, then the
    /// latest observation or expiration date in the table.
    #[arg(short, long)]
    pub end: Option<Date>,

    /// Market calendar (sifma, nyse, weekend). Defaults to the configuration.
    #[arg(long)]
    pub market: Option<Market>,

    /// Front maturities kept per date. Defaults to the configuration.
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub maturities: Option<usize>,
}

/// Execute the reconcile command.
pub fn execute(args: ReconcileArgs, ctx: &Context) -> Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let rows = read_observations(BufReader::new(file))
        .with_context(|| format!("reading {}", args.input.display()))?;

    let start = args
        .start
        .or(ctx.config.start_date)
        .or_else(|| rows.iter().map(|r| r.date).min());
    let end = args
        .end
        .or(ctx.config.end_date)
        .or_else(|| {
            rows.iter()
                .flat_map(|r| std::iter::once(r.date).chain(r.expiration))
                .max()
        });
    if start.is_none() || end.is_none() {
        return Err(CliError::EmptyInput(args.input).into());
    }
    let (start, end) = ctx.date_range(start, end)?;

    let calendar = ctx.calendar(args.market)?;
    let mut reconciler = ctx.reconciler(calendar.as_calendar());
    if let Some(n) = args.maturities {
        reconciler = reconciler.with_maturities_per_date(n);
    }

    let (front, report) = reconciler.reconcile_with_report(rows, start, end)?;
    tracing::info!(
        input = report.input_rows,
        output = report.output_rows,
        remapped = report.remapped,
        dropped = report.input_rows - report.output_rows,
        "reconciled {}",
        args.input.display()
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_observations(BufWriter::new(file), &front)?;
            if ctx.quiet {
                return Ok(());
            }
            let summary = report_rows(&report, start, end);
            if ctx.format == OutputFormat::Table {
                print_header("Reconciliation");
                print_output(&summary, ctx.format)?;
                print_success(&format!(
                    "Wrote {} rows to {}",
                    front.len(),
                    path.display()
                ));
            } else {
                print_output(&summary, ctx.format)?;
            }
        }
        None => print_rows(&front, ctx.format)?,
    }
    Ok(())
}

/// Report counts as display rows.
fn report_rows(report: &ReconcileReport, start: Date, end: Date) -> Vec<KeyValue> {
    vec![
        KeyValue::new("Range", format!("{start} .. {end}")),
        KeyValue::new("Input rows", report.input_rows),
        KeyValue::new("Remapped expirations", report.remapped),
        KeyValue::new("Missing expiration", report.missing_expiration),
        KeyValue::new("Non-quarterly", report.non_canonical),
        KeyValue::new("Beyond front maturities", report.beyond_front),
        KeyValue::new("Output rows", report.output_rows),
        KeyValue::new("Observation dates", report.observation_dates),
    ]
}
