//! Vendor export source.

use std::path::{Path, PathBuf};

use divyield_core::{Date, ObservationRow};
use divyield_traits::error::{TraitError, TraitResult};
use divyield_traits::ids::IndexId;
use divyield_traits::source::{select_rows, ObservationSource};

use crate::records::read_observations_file;

/// Reads vendor exports laid out as `<source_dir>/<INDEX>.csv`.
///
/// Each file holds the vendor table for one index; rows are filtered to the
/// requested ticker and date range and ordered by observation date. Rows of
/// the same date keep their file order, which must be ascending maturity.
#[derive(Debug, Clone)]
pub struct CsvObservationSource {
    source_dir: PathBuf,
}

impl CsvObservationSource {
    /// Create a source over an existing export directory.
    pub fn new(source_dir: impl AsRef<Path>) -> TraitResult<Self> {
        let source_dir = source_dir.as_ref().to_path_buf();
        if !source_dir.is_dir() {
            return Err(TraitError::SourceNotAvailable(format!(
                "{} is not a directory",
                source_dir.display()
            )));
        }
        Ok(Self { source_dir })
    }

    /// Export file for `index`.
    pub fn path_for(&self, index: &IndexId) -> PathBuf {
        self.source_dir.join(format!("{index}.csv"))
    }
}

impl ObservationSource for CsvObservationSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, index: &IndexId, start: Date, end: Date) -> TraitResult<Vec<ObservationRow>> {
        if start > end {
            return Err(TraitError::InvalidInput(format!(
                "start {start} is after end {end}"
            )));
        }
        let path = self.path_for(index);
        let rows = read_observations_file(&path)?;
        let selected = select_rows(&rows, index, start, end);
        log::info!(
            "{index}: {} of {} rows from {} within {start}..{end}",
            selected.len(),
            rows.len(),
            path.display()
        );
        Ok(selected)
    }
}
