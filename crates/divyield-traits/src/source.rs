//! Vendor observation sources.
//!
//! A source answers one query: every implied dividend yield row for an index
//! between two observation dates, ordered by ascending date with the rows of
//! each date in ascending maturity. The reconciler relies on that order to
//! pick the front maturities.

use std::sync::Arc;

use divyield_core::{Date, ObservationRow};

use crate::error::TraitResult;
use crate::ids::IndexId;

/// Source of raw vendor observation rows.
pub trait ObservationSource: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Fetches rows for `index` observed between `start` and `end` inclusive.
    fn fetch(&self, index: &IndexId, start: Date, end: Date) -> TraitResult<Vec<ObservationRow>>;
}

impl<T: ObservationSource + ?Sized> ObservationSource for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, index: &IndexId, start: Date, end: Date) -> TraitResult<Vec<ObservationRow>> {
        (**self).fetch(index, start, end)
    }
}

impl<T: ObservationSource + ?Sized> ObservationSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, index: &IndexId, start: Date, end: Date) -> TraitResult<Vec<ObservationRow>> {
        (**self).fetch(index, start, end)
    }
}

/// Applies the vendor query filter to an in-memory row set: matching ticker,
/// observation date within `[start, end]`, stable-sorted by date.
pub fn select_rows<'a>(
    rows: impl IntoIterator<Item = &'a ObservationRow>,
    index: &IndexId,
    start: Date,
    end: Date,
) -> Vec<ObservationRow> {
    let mut selected: Vec<ObservationRow> = rows
        .into_iter()
        .filter(|row| index.matches(&row.ticker) && row.date >= start && row.date <= end)
        .cloned()
        .collect();
    selected.sort_by_key(|row| row.date);
    selected
}
