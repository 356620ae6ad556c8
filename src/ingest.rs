use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{ClimateError, Result};
use crate::models::Reading;

/// One CSV row as it appears on disk. Columns other than these are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    city: String,
    timestamp: String,
    temperature: f64,
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339, keeping the date.
fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Reads `city,timestamp,temperature` CSV rows.
///
/// Stops at the first bad row with `MalformedRecord`; `line` counts data rows
/// from 1, not including the header.
pub fn read_readings<R: Read>(reader: R) -> Result<Vec<Reading>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut readings = Vec::new();

    for (index, row) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let line = index + 1;
        let record = row.map_err(|e| ClimateError::MalformedRecord {
            line,
            reason: e.to_string(),
        })?;
        let timestamp =
            parse_timestamp(&record.timestamp).ok_or_else(|| ClimateError::MalformedRecord {
                line,
                reason: format!("unparseable timestamp {:?}", record.timestamp),
            })?;
        if !record.temperature.is_finite() {
            return Err(ClimateError::MalformedRecord {
                line,
                reason: "temperature is not a finite number".to_string(),
            });
        }
        readings.push(Reading {
            city: record.city,
            timestamp,
            temperature: record.temperature,
        });
    }
    Ok(readings)
}

/// Loads the dataset at `path`.
pub fn load_readings(path: impl AsRef<Path>) -> anyhow::Result<Vec<Reading>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;
    let readings = read_readings(file)?;
    tracing::info!("Loaded {} readings from {}", readings.len(), path.display());
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_rows_and_ignores_extra_columns() {
        let csv = "city,timestamp,temperature,season\n\
                   Berlin,2023-01-01,-1.5,winter\n\
                   Cairo,2023-07-01 12:00:00,35.2,summer\n\
                   Tokyo,2023-04-01T09:00:00+09:00,14.0,spring\n";
        let readings = read_readings(csv.as_bytes()).unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].city, "Berlin");
        assert_eq!(readings[0].temperature, -1.5);
        assert_eq!(readings[1].timestamp, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
        assert_eq!(readings[2].timestamp, NaiveDate::from_ymd_opt(2023, 4, 1).unwrap());
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let csv = "city,timestamp,temperature\n\
                   Berlin,2023-01-01,1.0\n\
                   Berlin,yesterday,2.0\n";
        let err = read_readings(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ClimateError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_bad_temperature_is_malformed() {
        let csv = "city,timestamp,temperature\nBerlin,2023-01-01,warm\n";
        assert!(matches!(
            read_readings(csv.as_bytes()),
            Err(ClimateError::MalformedRecord { line: 1, .. })
        ));
        let csv = "city,timestamp,temperature\nBerlin,2023-01-01,NaN\n";
        assert!(matches!(
            read_readings(csv.as_bytes()),
            Err(ClimateError::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let readings = read_readings("city,timestamp,temperature\n".as_bytes()).unwrap();
        assert!(readings.is_empty());
    }
}
