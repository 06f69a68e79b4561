//! Expirations command implementation.
//!
//! Lists the canonical expiration of every target contract month in a range,
//! with the nominal rule date it was derived from.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use divyield_core::calendars::Market;
use divyield_core::expirations::{CanonicalExpiration, DayRule, QUARTERLY_MONTHS};
use divyield_core::Date;

use crate::commands::Context;
use crate::output::print_output;

/// Arguments for the expirations command.
#[derive(Args, Debug)]
pub struct ExpirationsArgs {
    /// First date of the range (YYYY-MM-DD). Defaults to start_date.
    #[arg(short, long)]
    pub start: Option<Date>,

    /// Last date of the range (YYYY-MM-DD). Defaults to end_date.
    #[arg(short, long)]
    pub end: Option<Date>,

    /// Contract months, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = QUARTERLY_MONTHS.to_vec())]
    pub months: Vec<u32>,

    /// Day rule (WOM-3FRI, LAST-FRI, ...). Defaults to the configured rule.
    #[arg(long)]
    pub rule: Option<DayRule>,

    /// Market calendar (sifma, nyse, weekend). Defaults to the configuration.
    #[arg(long)]
    pub market: Option<Market>,

    /// Bound on the backward holiday search, in days
    #[arg(long)]
    pub max_adjustment_days: Option<u32>,
}

/// One expiration in the listing.
#[derive(Debug, Serialize, Tabled)]
pub struct ExpirationRow {
    #[tabled(rename = "Contract")]
    pub contract: String,
    #[tabled(rename = "Nominal")]
    pub nominal: Date,
    #[tabled(rename = "Expiration")]
    pub expiration: Date,
    #[tabled(rename = "Weekday")]
    pub weekday: String,
    #[tabled(rename = "Shift (days)")]
    pub shift_days: i64,
}

impl From<&CanonicalExpiration> for ExpirationRow {
    fn from(exp: &CanonicalExpiration) -> Self {
        Self {
            contract: format!("{}-{:02}", exp.contract_year, exp.contract_month),
            nominal: exp.nominal,
            expiration: exp.date,
            weekday: exp.date.weekday().to_string(),
            shift_days: exp.adjustment_days(),
        }
    }
}

/// Execute the expirations command.
pub fn execute(args: ExpirationsArgs, ctx: &Context) -> Result<()> {
    let (start, end) = ctx.date_range(args.start, args.end)?;
    let calendar = ctx.calendar(args.market)?;

    let mut generator = ctx.generator(calendar.as_calendar());
    if let Some(rule) = args.rule {
        generator = generator.with_day_rule(rule);
    }
    if let Some(days) = args.max_adjustment_days {
        generator = generator.with_max_adjustment_days(days);
    }

    tracing::debug!(
        calendar = generator.calendar().name(),
        rule = %generator.day_rule(),
        %start,
        %end,
        "generating expirations"
    );
    let expirations = generator.generate_detailed(start, end, &args.months)?;

    let rows: Vec<ExpirationRow> = expirations.iter().map(ExpirationRow::from).collect();
    print_output(&rows, ctx.format)
}
