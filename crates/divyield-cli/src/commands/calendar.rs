//! Calendar command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use divyield_core::calendars::Market;
use divyield_core::Date;

use crate::commands::Context;
use crate::output::print_output;

/// Arguments for the calendar command.
#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// First date (YYYY-MM-DD). Defaults to start_date.
    #[arg(short, long)]
    pub start: Option<Date>,

    /// Last date (YYYY-MM-DD). Defaults to end_date.
    #[arg(short, long)]
    pub end: Option<Date>,

    /// Market calendar (sifma, nyse, weekend). Defaults to the configuration.
    #[arg(long)]
    pub market: Option<Market>,

    /// List weekday holidays instead of trading days
    #[arg(long)]
    pub holidays: bool,
}

/// One calendar day in the listing.
#[derive(Debug, Serialize, Tabled)]
pub struct DayRow {
    #[tabled(rename = "Date")]
    pub date: Date,
    #[tabled(rename = "Weekday")]
    pub weekday: String,
}

/// Execute the calendar command.
pub fn execute(args: CalendarArgs, ctx: &Context) -> Result<()> {
    let (start, end) = ctx.date_range(args.start, args.end)?;
    let choice = ctx.calendar(args.market)?;
    let calendar = choice.as_calendar();
    let trading = calendar.valid_days(start, end);

    let days: Vec<Date> = if args.holidays {
        let mut holidays = Vec::new();
        let mut current = start;
        while current <= end {
            if !current.is_weekend() && !trading.contains(current) {
                holidays.push(current);
            }
            match current.checked_add_days(1) {
                Some(next) => current = next,
                None => break,
            }
        }
        holidays
    } else {
        trading.days().to_vec()
    };

    tracing::debug!(
        calendar = calendar.name(),
        trading_days = trading.len(),
        listed = days.len(),
        "calendar listing"
    );

    let rows: Vec<DayRow> = days
        .into_iter()
        .map(|date| DayRow {
            date,
            weekday: date.weekday().to_string(),
        })
        .collect();
    print_output(&rows, ctx.format)
}
