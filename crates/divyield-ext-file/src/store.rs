//! CSV dataset store.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use divyield_core::ObservationRow;
use divyield_traits::error::TraitResult;
use divyield_traits::ids::{DatasetKind, IndexId};
use divyield_traits::store::ObservationStore;

use crate::records::{read_observations_file, write_observations};

/// Stores each dataset as `<data_dir>/<dataset name>.csv`.
#[derive(Debug, Clone)]
pub struct CsvObservationStore {
    data_dir: PathBuf,
}

impl CsvObservationStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl AsRef<Path>) -> TraitResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.exists() {
            log::info!("creating data directory {}", data_dir.display());
            fs::create_dir_all(&data_dir)?;
        }
        Ok(Self { data_dir })
    }

    /// Root directory of the store.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File backing the dataset for `index` and `kind`.
    pub fn path_for(&self, index: &IndexId, kind: DatasetKind) -> PathBuf {
        self.data_dir.join(format!("{}.csv", kind.dataset_name(index)))
    }
}

impl ObservationStore for CsvObservationStore {
    fn save(&self, index: &IndexId, kind: DatasetKind, rows: &[ObservationRow]) -> TraitResult<()> {
        let path = self.path_for(index, kind);
        // Write beside the target and rename so readers never see half a table.
        let tmp = path.with_extension("csv.tmp");
        write_observations(BufWriter::new(fs::File::create(&tmp)?), rows)?;
        fs::rename(&tmp, &path)?;
        log::info!("saved {} {kind} rows to {}", rows.len(), path.display());
        Ok(())
    }

    fn load(&self, index: &IndexId, kind: DatasetKind) -> TraitResult<Vec<ObservationRow>> {
        let path = self.path_for(index, kind);
        let rows = read_observations_file(&path)?;
        log::debug!("loaded {} {kind} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    fn exists(&self, index: &IndexId, kind: DatasetKind) -> bool {
        self.path_for(index, kind).is_file()
    }
}
