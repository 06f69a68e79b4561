//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use divyield_core::ObservationRow;
use divyield_ext_file::write_observations;

use crate::cli::OutputFormat;

/// Formats and prints output based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
    }
}

/// Prints observation rows: a compact table, or every column as JSON/CSV.
pub fn print_rows(rows: &[ObservationRow], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            let view: Vec<RowView> = rows.iter().map(RowView::from).collect();
            print_table(&view)
        }
        OutputFormat::Json => print_json(rows),
        OutputFormat::Csv => {
            write_observations(std::io::stdout().lock(), rows)?;
            Ok(())
        }
    }
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as JSON.
fn print_json<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl ToString) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

/// Table view of an observation row.
#[derive(Debug, Tabled)]
struct RowView {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Expiration")]
    expiration: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

impl From<&ObservationRow> for RowView {
    fn from(row: &ObservationRow) -> Self {
        Self {
            date: row.date.to_string(),
            ticker: row.ticker.clone(),
            expiration: row.expiration.map(|d| d.to_string()).unwrap_or_default(),
            days: row
                .days_to_expiration()
                .map(|d| d.to_string())
                .unwrap_or_default(),
            rate: row.rate.map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}
