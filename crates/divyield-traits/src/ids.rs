//! Identifier types used across the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Indices pulled when none are configured.
pub const DEFAULT_INDICES: [&str; 3] = ["SPX", "DJX", "NDX"];

/// Equity index identifier, the vendor ticker (SPX, DJX, NDX).
///
/// Tickers are stored trimmed and upper-cased so `spx` and `SPX` name the
/// same dataset.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct IndexId(String);

impl IndexId {
    /// Create a new index ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_uppercase())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `ticker` names this index.
    pub fn matches(&self, ticker: &str) -> bool {
        ticker.trim().eq_ignore_ascii_case(&self.0)
    }

    /// The default index list.
    pub fn defaults() -> Vec<IndexId> {
        DEFAULT_INDICES.iter().map(|s| IndexId::new(*s)).collect()
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IndexId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for IndexId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<IndexId> for String {
    fn from(id: IndexId) -> Self {
        id.0
    }
}

/// Which stage of the pipeline a stored dataset holds.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Rows as fetched from the vendor.
    Raw,
    /// Rows after maturity reconciliation.
    Reconciled,
}

impl DatasetKind {
    /// Dataset name without extension, e.g. `SPX_implied_div_yield`.
    pub fn dataset_name(self, index: &IndexId) -> String {
        match self {
            DatasetKind::Raw => format!("{index}_implied_div_yield"),
            DatasetKind::Reconciled => format!("{index}_implied_div_yield_front"),
        }
    }

    /// Stable identifier for logs and output.
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Raw => "raw",
            DatasetKind::Reconciled => "reconciled",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
