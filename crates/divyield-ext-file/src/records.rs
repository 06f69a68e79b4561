//! CSV layout of observation tables.

use std::io;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divyield_core::{Date, ObservationRow};
use divyield_traits::error::{TraitError, TraitResult};

/// Column names of an observation table, in vendor order.
pub const COLUMNS: [&str; 12] = [
    "secid",
    "date",
    "cusip",
    "ticker",
    "sic",
    "index_flag",
    "exchange_d",
    "class",
    "issue_type",
    "industry_group",
    "expiration",
    "rate",
];

/// CSV record for observation rows, vendor column order.
///
/// Dates and rates are kept as text so blank and malformed cells survive
/// deserialization and are handled per column.
#[derive(Debug, Serialize, Deserialize)]
struct ObservationRecord {
    secid: String,
    date: String,
    #[serde(default)]
    cusip: Option<String>,
    ticker: String,
    #[serde(default)]
    sic: Option<String>,
    #[serde(default)]
    index_flag: Option<String>,
    #[serde(default, alias = "exchange")]
    exchange_d: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    issue_type: Option<String>,
    #[serde(default)]
    industry_group: Option<String>,
    #[serde(default)]
    expiration: Option<String>,
    #[serde(default)]
    rate: Option<String>,
}

impl ObservationRecord {
    fn into_row(self, line: u64) -> TraitResult<ObservationRow> {
        let secid = parse_secid(&self.secid).ok_or_else(|| {
            TraitError::ParseError(format!("line {line}: invalid secid '{}'", self.secid))
        })?;
        let date = Date::parse_vendor(&self.date).ok_or_else(|| {
            TraitError::ParseError(format!("line {line}: invalid date '{}'", self.date))
        })?;

        let expiration = self.expiration.as_deref().and_then(|s| {
            let parsed = Date::parse_vendor(s);
            if parsed.is_none() && !s.trim().is_empty() {
                log::warn!("line {line}: unreadable expiration '{s}', treating as missing");
            }
            parsed
        });

        let rate = self.rate.as_deref().and_then(|s| {
            let parsed = parse_rate(s);
            if parsed.is_none() && !is_blank(s) {
                log::warn!("line {line}: unreadable rate '{s}', treating as missing");
            }
            parsed
        });

        Ok(ObservationRow {
            secid,
            date,
            cusip: non_empty(self.cusip),
            ticker: self.ticker.trim().to_string(),
            sic: non_empty(self.sic),
            index_flag: non_empty(self.index_flag),
            exchange_d: non_empty(self.exchange_d),
            class: non_empty(self.class),
            issue_type: non_empty(self.issue_type),
            industry_group: non_empty(self.industry_group),
            expiration,
            rate,
        })
    }
}

impl From<&ObservationRow> for ObservationRecord {
    fn from(row: &ObservationRow) -> Self {
        Self {
            secid: row.secid.to_string(),
            date: row.date.to_string(),
            cusip: row.cusip.clone(),
            ticker: row.ticker.clone(),
            sic: row.sic.clone(),
            index_flag: row.index_flag.clone(),
            exchange_d: row.exchange_d.clone(),
            class: row.class.clone(),
            issue_type: row.issue_type.clone(),
            industry_group: row.industry_group.clone(),
            expiration: row.expiration.map(|d| d.to_string()),
            rate: row.rate.map(|r| r.to_string()),
        }
    }
}

/// Vendor exports sometimes carry the security id as a float (`108105.0`).
fn parse_secid(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        let f = s.parse::<f64>().ok()?;
        (f.fract() == 0.0 && f.is_finite()).then_some(f as i64)
    })
}

fn parse_rate(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if is_blank(s) {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn is_blank(s: &str) -> bool {
    matches!(s.trim(), "" | "NaN" | "nan" | "NA" | "null")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reads an observation table from CSV.
///
/// A row whose observation date or secid cannot be read fails the whole
/// table; unreadable expirations and rates become `None`.
pub fn read_observations<R: io::Read>(reader: R) -> TraitResult<Vec<ObservationRow>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (i, result) in reader.deserialize::<ObservationRecord>().enumerate() {
        // Header is line 1.
        let line = i as u64 + 2;
        let record = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
        rows.push(record.into_row(line)?);
    }
    Ok(rows)
}

/// Writes an observation table as CSV with a header row.
///
/// An empty table still gets its header.
pub fn write_observations<W: io::Write>(writer: W, rows: &[ObservationRow]) -> TraitResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        writer
            .write_record(COLUMNS)
            .map_err(|e| TraitError::SerializationError(e.to_string()))?;
    }
    for row in rows {
        writer
            .serialize(ObservationRecord::from(row))
            .map_err(|e| TraitError::SerializationError(e.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn read_observations_file(path: &Path) -> TraitResult<Vec<ObservationRow>> {
    if !path.exists() {
        return Err(TraitError::NotFound(path.display().to_string()));
    }
    let file = std::fs::File::open(path)?;
    read_observations(io::BufReader::new(file))
        .map_err(|e| match e {
            TraitError::ParseError(msg) => {
                TraitError::ParseError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const VENDOR: &str = "\
secid,date,cusip,ticker,sic,index_flag,exchange_d,class,issue_type,industry_group,expiration,rate
108105.0,2020-03-02,64881510,SPX,,1,32768,,A,,2020-03-21,0.019216
108105,2020-03-02,64881510,SPX,,1,32768,,A,,20200417,1.9e-2
108105,2020-03-02,64881510,SPX,,1,32768,,A,,,
108105,2020-03-02,64881510,SPX,,1,32768,,A,,not-a-date,NaN
";

    #[test]
    fn test_read_vendor_export() {
        let rows = read_observations(VENDOR.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0].secid, 108105);
        assert_eq!(rows[0].cusip.as_deref(), Some("64881510"));
        assert_eq!(rows[0].sic, None);
        assert_eq!(rows[0].exchange_d.as_deref(), Some("32768"));
        assert_eq!(rows[0].expiration, Date::from_ymd(2020, 3, 21).ok());
        assert_eq!(rows[0].rate, Some(dec!(0.019216)));

        assert_eq!(rows[1].expiration, Date::from_ymd(2020, 4, 17).ok());
        assert_eq!(rows[1].rate, Some(dec!(0.019)));

        assert_eq!(rows[2].expiration, None);
        assert_eq!(rows[2].rate, None);
        assert_eq!(rows[3].expiration, None);
        assert_eq!(rows[3].rate, None);
    }

    #[test]
    fn test_exchange_alias() {
        let csv = "secid,date,ticker,exchange,expiration,rate\n1,2020-03-02,DJX,1,2020-03-20,0.02\n";
        let rows = read_observations(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].exchange_d.as_deref(), Some("1"));
        assert_eq!(rows[0].industry_group, None);
    }

    #[test]
    fn test_bad_date_fails_table() {
        let csv = "secid,date,ticker,expiration,rate\n1,2020-03-02,SPX,,\n1,03/32/2020,SPX,,\n";
        let err = read_observations(csv.as_bytes()).unwrap_err();
        match err {
            TraitError::ParseError(msg) => assert!(msg.contains("line 3"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_write_then_read() {
        let mut row = ObservationRow::new(
            108105,
            "SPX",
            Date::from_ymd(2020, 3, 2).unwrap(),
            Date::from_ymd(2020, 3, 20).ok(),
            Some(dec!(0.0192160)),
        );
        row.cusip = Some("64881510".into());
        let missing = ObservationRow::new(108105, "SPX", row.date, None, None);

        let mut buf = Vec::new();
        write_observations(&mut buf, &[row.clone(), missing.clone()]).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("secid,date,cusip,ticker,"));

        let back = read_observations(buf.as_slice()).unwrap();
        assert_eq!(back, vec![row, missing]);
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let mut buf = Vec::new();
        write_observations(&mut buf, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.trim_end(), COLUMNS.join(","));
        assert!(read_observations(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_header_matches_serialized_record() {
        let mut buf = Vec::new();
        let row = ObservationRow::new(108105, "SPX", Date::from_ymd(2020, 3, 2).unwrap(), None, None);
        write_observations(&mut buf, &[row]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next(), Some(COLUMNS.join(",").as_str()));
    }

    #[test]
    fn test_parse_secid() {
        assert_eq!(parse_secid("108105"), Some(108105));
        assert_eq!(parse_secid("108105.0"), Some(108105));
        assert_eq!(parse_secid("108105.5"), None);
        assert_eq!(parse_secid("abc"), None);
    }
}
