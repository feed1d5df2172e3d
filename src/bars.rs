//! Bar loading for offline replay
//!
//! CSV with header `timestamp,open,high,low,close,volume`. Timestamps are
//! either RFC 3339 (converted into the chart timezone) or naive
//! `%Y-%m-%d %H:%M:%S` taken as already chart-local.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::types::Bar;

const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Parse a timestamp into chart-local wall clock time
pub fn parse_timestamp(raw: &str, tz: Tz) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&tz).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
        .with_context(|| format!("Failed to parse timestamp: {}", raw))
}

/// Read bars from any CSV source, assigning indices in row order and
/// flagging the final row as terminal
pub fn read_bars<R: Read>(reader: R, tz: Tz) -> Result<Vec<Bar>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result.with_context(|| format!("Failed to parse CSV row {}", index + 1))?;
        bars.push(Bar {
            timestamp: parse_timestamp(&row.timestamp, tz)?,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            index,
            is_last: false,
        });
    }

    if let Some(last) = bars.last_mut() {
        last.is_last = true;
    }

    Ok(bars)
}

pub fn load_bars(path: &Path, tz: Tz) -> Result<Vec<Bar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open bars file: {:?}", path))?;
    let bars = read_bars(std::io::BufReader::new(file), tz)
        .with_context(|| format!("Failed to load bars from {:?}", path))?;
    debug!("Loaded {} bars from {:?}", bars.len(), path);
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use chrono_tz::America::New_York;

    #[test]
    fn test_rfc3339_converted_to_chart_time() {
        // 14:30 UTC in December is 09:30 in New York
        let ts = parse_timestamp("2025-12-01T14:30:00Z", New_York).unwrap();
        assert_eq!((ts.hour(), ts.minute()), (9, 30));
    }

    #[test]
    fn test_naive_taken_as_local() {
        let ts = parse_timestamp("2025-12-01 09:30:00", New_York).unwrap();
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap().and_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_timestamp("yesterday", New_York).is_err());
    }

    #[test]
    fn test_read_bars() {
        let csv = "timestamp,open,high,low,close,volume\n\
                   2025-12-01 09:29:00, 90, 91, 89, 90, 5\n\
                   2025-12-01 09:30:00, 100, 105, 95, 101, 12\n";
        let bars = read_bars(csv.as_bytes(), New_York).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].index, 1);
        assert_eq!(bars[1].high, 105.0);
        assert!(!bars[0].is_last);
        assert!(bars[1].is_last);
    }

    #[test]
    fn test_bad_row_is_an_error() {
        let csv = "timestamp,open,high,low,close,volume\n2025-12-01 09:29:00,x,91,89,90,5\n";
        assert!(read_bars(csv.as_bytes(), New_York).is_err());
    }
}
