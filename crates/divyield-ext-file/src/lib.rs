//! # Divyield Ext File
//!
//! File-backed and in-memory collaborators for the reconciliation pipeline.
//!
//! This crate provides default implementations for local runs and tests:
//! - CSV vendor export source (one `<INDEX>.csv` per index)
//! - CSV dataset store (`<INDEX>_implied_div_yield[_front].csv`)
//! - In-memory source and store
//!
//! A live vendor database client would be a separate extension implementing
//! the same traits.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod memory;
mod records;
mod source;
mod store;

pub use memory::{MemoryObservationSource, MemoryObservationStore};
pub use records::{read_observations, write_observations, COLUMNS};
pub use source::CsvObservationSource;
pub use store::CsvObservationStore;

use std::path::Path;
use std::sync::Arc;

use divyield_traits::error::TraitResult;
use divyield_traits::{ObservationSource, ObservationStore};

/// Create a vendor source reading CSV exports from `source_dir`.
pub fn create_file_source(source_dir: impl AsRef<Path>) -> TraitResult<Arc<dyn ObservationSource>> {
    Ok(Arc::new(CsvObservationSource::new(source_dir)?))
}

/// Create a dataset store writing CSV tables under `data_dir`.
pub fn create_file_store(data_dir: impl AsRef<Path>) -> TraitResult<Arc<dyn ObservationStore>> {
    Ok(Arc::new(CsvObservationStore::new(data_dir)?))
}
