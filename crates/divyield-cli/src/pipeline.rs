//! Pull pipeline: fetch, store, reload, reconcile, store.

use anyhow::{Context as _, Result};
use serde::Serialize;
use tabled::Tabled;

use divyield_core::reconcile::MaturityReconciler;
use divyield_core::Date;
use divyield_traits::{DatasetKind, IndexId, ObservationSource, ObservationStore};

/// Outcome of one index run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct IndexSummary {
    #[tabled(rename = "Index")]
    pub index: String,
    #[tabled(rename = "Raw rows")]
    pub raw_rows: usize,
    #[tabled(rename = "Front rows")]
    pub front_rows: usize,
    #[tabled(rename = "Dates")]
    pub observation_dates: usize,
    #[tabled(rename = "Remapped")]
    pub remapped: usize,
    #[tabled(rename = "Dropped")]
    pub dropped: usize,
}

/// Wires a source and a store around the maturity reconciler.
pub struct Pipeline<'a> {
    source: &'a dyn ObservationSource,
    store: &'a dyn ObservationStore,
    reconciler: MaturityReconciler<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn ObservationSource,
        store: &'a dyn ObservationStore,
        reconciler: MaturityReconciler<'a>,
    ) -> Self {
        Self {
            source,
            store,
            reconciler,
        }
    }

    /// Runs one index. The raw table is stored before reconciliation and the
    /// reconciled table is built from what the store returns.
    pub fn run_index(&self, index: &IndexId, start: Date, end: Date) -> Result<IndexSummary> {
        let raw = self
            .source
            .fetch(index, start, end)
            .with_context(|| format!("fetching {index} from {}", self.source.name()))?;
        tracing::info!(%index, rows = raw.len(), source = self.source.name(), "fetched raw rows");
        if raw.is_empty() {
            tracing::warn!(%index, %start, %end, "vendor returned no rows");
        }

        self.store
            .save(index, DatasetKind::Raw, &raw)
            .with_context(|| format!("saving raw {index} rows"))?;
        let stored = self
            .store
            .load(index, DatasetKind::Raw)
            .with_context(|| format!("loading raw {index} rows"))?;

        let (front, report) = self
            .reconciler
            .reconcile_with_report(stored, start, end)
            .with_context(|| format!("reconciling {index}"))?;
        tracing::info!(%index, %report, "reconciled");

        self.store
            .save(index, DatasetKind::Reconciled, &front)
            .with_context(|| format!("saving reconciled {index} rows"))?;

        Ok(IndexSummary {
            index: index.to_string(),
            raw_rows: report.input_rows,
            front_rows: report.output_rows,
            observation_dates: report.observation_dates,
            remapped: report.remapped,
            dropped: report.input_rows - report.output_rows,
        })
    }

    /// Runs every index in order, stopping at the first failure.
    pub fn run(&self, indices: &[IndexId], start: Date, end: Date) -> Result<Vec<IndexSummary>> {
        indices
            .iter()
            .map(|index| self.run_index(index, start, end))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use divyield_core::calendars::sifma;
    use divyield_core::ObservationRow;
    use divyield_ext_file::{MemoryObservationSource, MemoryObservationStore};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn vendor_rows() -> Vec<ObservationRow> {
        let obs = d(2020, 3, 2);
        vec![
            ObservationRow::new(108105, "SPX", obs, Some(d(2020, 3, 21)), Some(dec!(0.0192))),
            ObservationRow::new(108105, "SPX", obs, Some(d(2020, 4, 17)), Some(dec!(0.0191))),
            ObservationRow::new(108105, "SPX", obs, Some(d(2020, 6, 19)), Some(dec!(0.0190))),
            ObservationRow::new(108105, "SPX", obs, Some(d(2020, 9, 18)), Some(dec!(0.0188))),
            ObservationRow::new(102456, "DJX", obs, Some(d(2020, 3, 20)), Some(dec!(0.0221))),
        ]
    }

    #[test]
    fn test_run_index_stores_both_datasets() {
        let source = MemoryObservationSource::new(vendor_rows());
        let store = MemoryObservationStore::new();
        let pipeline = Pipeline::new(&source, &store, MaturityReconciler::new(sifma()));
        let spx = IndexId::new("SPX");

        let summary = pipeline.run_index(&spx, d(2020, 1, 1), d(2020, 12, 31)).unwrap();
        assert_eq!(
            summary,
            IndexSummary {
                index: "SPX".into(),
                raw_rows: 4,
                front_rows: 2,
                observation_dates: 1,
                remapped: 1,
                dropped: 2,
            }
        );

        assert_eq!(store.load(&spx, DatasetKind::Raw).unwrap().len(), 4);
        let front = store.load(&spx, DatasetKind::Reconciled).unwrap();
        let expirations: Vec<_> = front.iter().map(|r| r.expiration.unwrap()).collect();
        assert_eq!(expirations, vec![d(2020, 3, 20), d(2020, 6, 19)]);
    }

    #[test]
    fn test_run_all_indices() {
        let source = MemoryObservationSource::new(vendor_rows());
        let store = MemoryObservationStore::new();
        let pipeline = Pipeline::new(&source, &store, MaturityReconciler::new(sifma()));

        let summaries = pipeline
            .run(&IndexId::defaults(), d(2020, 1, 1), d(2020, 12, 31))
            .unwrap();
        let fronts: Vec<_> = summaries.iter().map(|s| (s.index.as_str(), s.front_rows)).collect();
        assert_eq!(fronts, vec![("SPX", 2), ("DJX", 1), ("NDX", 0)]);
        assert_eq!(store.dataset_count(), 6);
    }

    #[test]
    fn test_date_errors_surface() {
        let source = MemoryObservationSource::new(vendor_rows());
        let store = MemoryObservationStore::new();
        let pipeline = Pipeline::new(&source, &store, MaturityReconciler::new(sifma()));

        let err = pipeline
            .run_index(&IndexId::new("SPX"), d(2020, 4, 1), d(2020, 5, 31))
            .unwrap_err();
        assert!(format!("{err:#}").contains("Empty range"));
        assert!(!store.exists(&IndexId::new("SPX"), DatasetKind::Reconciled));
    }
}
