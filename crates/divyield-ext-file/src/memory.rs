//! In-memory source and store.
//!
//! Useful for tests and for driving the pipeline from rows built in code.
//! Nothing is persisted.

use std::collections::HashMap;
use std::sync::RwLock;

use divyield_core::{Date, ObservationRow};
use divyield_traits::error::{TraitError, TraitResult};
use divyield_traits::ids::{DatasetKind, IndexId};
use divyield_traits::source::{select_rows, ObservationSource};
use divyield_traits::store::ObservationStore;

/// Serves a fixed set of rows with the vendor query filter applied.
#[derive(Debug, Clone, Default)]
pub struct MemoryObservationSource {
    rows: Vec<ObservationRow>,
}

impl MemoryObservationSource {
    /// Creates a source over `rows`, in vendor order.
    pub fn new(rows: Vec<ObservationRow>) -> Self {
        Self { rows }
    }

    /// Number of rows held across all indices.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the source holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ObservationSource for MemoryObservationSource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, index: &IndexId, start: Date, end: Date) -> TraitResult<Vec<ObservationRow>> {
        if start > end {
            return Err(TraitError::InvalidInput(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(select_rows(&self.rows, index, start, end))
    }
}

/// Keeps datasets in a map keyed by index and kind.
#[derive(Debug, Default)]
pub struct MemoryObservationStore {
    tables: RwLock<HashMap<(IndexId, DatasetKind), Vec<ObservationRow>>>,
}

impl MemoryObservationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored datasets.
    pub fn dataset_count(&self) -> usize {
        self.tables.read().map(|t| t.len()).unwrap_or(0)
    }
}

impl ObservationStore for MemoryObservationStore {
    fn save(&self, index: &IndexId, kind: DatasetKind, rows: &[ObservationRow]) -> TraitResult<()> {
        self.tables
            .write()
            .map_err(|e| TraitError::IoError(format!("Lock error: {}", e)))?
            .insert((index.clone(), kind), rows.to_vec());
        Ok(())
    }

    fn load(&self, index: &IndexId, kind: DatasetKind) -> TraitResult<Vec<ObservationRow>> {
        self.tables
            .read()
            .map_err(|e| TraitError::IoError(format!("Lock error: {}", e)))?
            .get(&(index.clone(), kind))
            .cloned()
            .ok_or_else(|| TraitError::NotFound(kind.dataset_name(index)))
    }

    fn exists(&self, index: &IndexId, kind: DatasetKind) -> bool {
        self.tables
            .read()
            .map(|t| t.contains_key(&(index.clone(), kind)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_memory_source_filters() {
        let source = MemoryObservationSource::new(vec![
            ObservationRow::new(1, "SPX", d(2020, 3, 3), None, None),
            ObservationRow::new(1, "SPX", d(2020, 3, 2), None, None),
            ObservationRow::new(2, "NDX", d(2020, 3, 2), None, None),
        ]);
        let rows = source
            .fetch(&IndexId::new("SPX"), d(2020, 3, 1), d(2020, 3, 31))
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, d(2020, 3, 2));

        let err = source
            .fetch(&IndexId::new("SPX"), d(2020, 3, 31), d(2020, 3, 1))
            .unwrap_err();
        assert!(matches!(err, TraitError::InvalidInput(_)));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryObservationStore::new();
        let spx = IndexId::new("SPX");
        assert!(!store.exists(&spx, DatasetKind::Raw));
        assert!(matches!(
            store.load(&spx, DatasetKind::Raw),
            Err(TraitError::NotFound(_))
        ));

        let rows = vec![ObservationRow::new(1, "SPX", d(2020, 3, 2), Some(d(2020, 3, 20)), None)];
        store.save(&spx, DatasetKind::Raw, &rows).unwrap();
        assert!(store.exists(&spx, DatasetKind::Raw));
        assert!(!store.exists(&spx, DatasetKind::Reconciled));
        assert_eq!(store.load(&spx, DatasetKind::Raw).unwrap(), rows);
        assert_eq!(store.dataset_count(), 1);
    }
}
