//! Maturity reconciliation for vendor dividend yield rows.
//!
//! Vendor tables record an expiration either on the third Friday or on the
//! calendar day after it. Reconciliation maps the day-after encoding back onto
//! the canonical quarterly expiration, drops every row whose expiration is not
//! canonical (serial months, missing values), and keeps the first rows of each
//! observation date, which are the front maturities because vendor rows arrive
//! sorted by ascending maturity within a date.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::calendars::Calendar;
use crate::error::CoreResult;
use crate::expirations::{ExpirationGenerator, QUARTERLY_MONTHS};
use crate::types::{Date, Maturity};

/// Default number of maturities kept per observation date.
pub const DEFAULT_MATURITIES_PER_DATE: usize = 2;

/// A canonical expiration and the day-after date vendors sometimes record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpirationPair {
    /// Canonical expiration (normally the third Friday).
    pub friday: Date,
    /// Calendar day after `friday`.
    pub day_after: Date,
}

/// Remap keys for a set of canonical expirations.
pub fn expiration_pairs(canonical: &[Date]) -> Vec<ExpirationPair> {
    canonical
        .iter()
        .map(|&friday| ExpirationPair {
            friday,
            day_after: friday.add_days(1),
        })
        .collect()
}

/// Row counts from one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Rows received.
    pub input_rows: usize,
    /// Rows whose day-after expiration was rewritten.
    pub remapped: usize,
    /// Rows dropped for a missing or malformed expiration.
    pub missing_expiration: usize,
    /// Rows dropped for a non-canonical expiration.
    pub non_canonical: usize,
    /// Canonical rows dropped behind the front maturities of their date.
    pub beyond_front: usize,
    /// Rows returned.
    pub output_rows: usize,
    /// Distinct observation dates returned.
    pub observation_dates: usize,
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows in, {} out over {} dates ({} remapped, {} missing expiration, {} non-canonical, {} beyond front)",
            self.input_rows,
            self.output_rows,
            self.observation_dates,
            self.remapped,
            self.missing_expiration,
            self.non_canonical,
            self.beyond_front
        )
    }
}

/// Rewrites and filters observation rows against canonical quarterly
/// expirations.
///
/// # Example
///
/// ```
/// use divyield_core::calendars::Market;
/// use divyield_core::reconcile::MaturityReconciler;
/// use divyield_core::types::{Date, ObservationRow};
///
/// let date = Date::from_ymd(2020, 3, 2).unwrap();
/// let rows = vec![
///     ObservationRow::new(108105, "SPX", date, Date::from_ymd(2020, 3, 21).ok(), None),
///     ObservationRow::new(108105, "SPX", date, Date::from_ymd(2020, 4, 17).ok(), None),
/// ];
///
/// let out = MaturityReconciler::new(Market::UsFinancialMarkets.calendar())
///     .reconcile(rows, Date::from_ymd(2020, 1, 1).unwrap(), Date::from_ymd(2020, 12, 31).unwrap())
///     .unwrap();
/// assert_eq!(out.len(), 1);
/// assert_eq!(out[0].expiration, Date::from_ymd(2020, 3, 20).ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MaturityReconciler<'a> {
    generator: ExpirationGenerator<'a>,
    maturities_per_date: usize,
}

impl<'a> MaturityReconciler<'a> {
    /// Creates a reconciler with the default generator for `calendar`.
    pub fn new(calendar: &'a dyn Calendar) -> Self {
        Self::from_generator(ExpirationGenerator::new(calendar))
    }

    /// Creates a reconciler around a configured generator.
    pub fn from_generator(generator: ExpirationGenerator<'a>) -> Self {
        Self {
            generator,
            maturities_per_date: DEFAULT_MATURITIES_PER_DATE,
        }
    }

    /// Sets how many maturities are kept per observation date.
    pub fn with_maturities_per_date(mut self, n: usize) -> Self {
        self.maturities_per_date = n;
        self
    }

    /// Returns the expiration generator.
    pub fn generator(&self) -> &ExpirationGenerator<'a> {
        &self.generator
    }

    /// Reconciles `rows` observed between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Propagates every generator error (`InvalidDateRange`, `EmptyRange`,
    /// `CalendarGap`). Rows with unusable expirations are dropped, not errors.
    pub fn reconcile<R: Maturity>(&self, rows: Vec<R>, start: Date, end: Date) -> CoreResult<Vec<R>> {
        self.reconcile_with_report(rows, start, end)
            .map(|(rows, _)| rows)
    }

    /// Like [`reconcile`](Self::reconcile), also returning row counts.
    pub fn reconcile_with_report<R: Maturity>(
        &self,
        rows: Vec<R>,
        start: Date,
        end: Date,
    ) -> CoreResult<(Vec<R>, ReconcileReport)> {
        let canonical = self.generator.generate(start, end, &QUARTERLY_MONTHS)?;
        log::debug!(
            "{} canonical expirations between {start} and {end}",
            canonical.len()
        );
        Ok(self.reconcile_against(rows, &canonical))
    }

    /// Reconciles `rows` against an explicit canonical expiration set.
    pub fn reconcile_against<R: Maturity>(
        &self,
        rows: Vec<R>,
        canonical: &[Date],
    ) -> (Vec<R>, ReconcileReport) {
        let remap: HashMap<Date, Date> = expiration_pairs(canonical)
            .into_iter()
            .map(|pair| (pair.day_after, pair.friday))
            .collect();
        let canonical: HashSet<Date> = canonical.iter().copied().collect();

        let mut report = ReconcileReport {
            input_rows: rows.len(),
            ..ReconcileReport::default()
        };
        let mut kept_per_date: HashMap<Date, usize> = HashMap::new();
        let mut out = Vec::new();

        for mut row in rows {
            let Some(recorded) = row.expiration() else {
                report.missing_expiration += 1;
                continue;
            };
            let expiration = match remap.get(&recorded) {
                Some(&friday) => {
                    log::trace!("expiration {recorded} rewritten to {friday}");
                    row.set_expiration(friday);
                    report.remapped += 1;
                    friday
                }
                None => recorded,
            };
            if !canonical.contains(&expiration) {
                report.non_canonical += 1;
                continue;
            }

            let kept = kept_per_date.entry(row.observation_date()).or_insert(0);
            if *kept >= self.maturities_per_date {
                report.beyond_front += 1;
                continue;
            }
            *kept += 1;
            out.push(row);
        }

        report.output_rows = out.len();
        report.observation_dates = kept_per_date.values().filter(|&&n| n > 0).count();
        log::debug!("reconciled: {report}");
        (out, report)
    }
}

/// Reconciles `rows` with the default generator and two maturities per date.
pub fn reconcile<R: Maturity>(
    calendar: &dyn Calendar,
    rows: Vec<R>,
    start_date: Date,
    end_date: Date,
) -> CoreResult<Vec<R>> {
    MaturityReconciler::new(calendar).reconcile(rows, start_date, end_date)
}
