//! Load command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use divyield_ext_file::CsvObservationStore;
use divyield_traits::{DatasetKind, IndexId, ObservationStore};

use crate::commands::Context;
use crate::output::print_rows;

/// Arguments for the load command.
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Index to show
    #[arg(short, long)]
    pub index: IndexId,

    /// Show the reconciled table instead of the raw one
    #[arg(long)]
    pub reconciled: bool,

    /// Dataset directory. Defaults to data_dir.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Show at most this many rows
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Execute the load command.
pub fn execute(args: LoadArgs, ctx: &Context) -> Result<()> {
    let data_dir = args.data_dir.unwrap_or_else(|| ctx.config.data_dir.clone());
    let kind = if args.reconciled {
        DatasetKind::Reconciled
    } else {
        DatasetKind::Raw
    };

    let store = CsvObservationStore::new(&data_dir)?;
    let mut rows = store.load(&args.index, kind)?;
    tracing::debug!(index = %args.index, %kind, rows = rows.len(), "loaded dataset");

    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }
    print_rows(&rows, ctx.format)
}
