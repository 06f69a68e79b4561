//! Dataset persistence.
//!
//! A store keeps one table per (index, dataset kind). Saving replaces the
//! whole table; the column identities of [`ObservationRow`] are preserved.

use std::sync::Arc;

use divyield_core::ObservationRow;

use crate::error::TraitResult;
use crate::ids::{DatasetKind, IndexId};

/// Persistence for raw and reconciled observation tables.
pub trait ObservationStore: Send + Sync {
    /// Replaces the stored table for `index` and `kind`.
    fn save(&self, index: &IndexId, kind: DatasetKind, rows: &[ObservationRow]) -> TraitResult<()>;

    /// Loads the stored table, failing with `NotFound` if it was never saved.
    fn load(&self, index: &IndexId, kind: DatasetKind) -> TraitResult<Vec<ObservationRow>>;

    /// Returns true if a table is stored for `index` and `kind`.
    fn exists(&self, index: &IndexId, kind: DatasetKind) -> bool;
}

impl<T: ObservationStore + ?Sized> ObservationStore for Arc<T> {
    fn save(&self, index: &IndexId, kind: DatasetKind, rows: &[ObservationRow]) -> TraitResult<()> {
        (**self).save(index, kind, rows)
    }

    fn load(&self, index: &IndexId, kind: DatasetKind) -> TraitResult<Vec<ObservationRow>> {
        (**self).load(index, kind)
    }

    fn exists(&self, index: &IndexId, kind: DatasetKind) -> bool {
        (**self).exists(index, kind)
    }
}
