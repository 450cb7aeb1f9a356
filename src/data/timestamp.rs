//! Timestamp formatting and lenient parsing for the "Date Time" column.
//!
//! Accepted inputs, tried in order:
//! - Canonical: `2026-02-07 17:00:00` (optionally with fractional seconds)
//! - ISO 8601: `2026-02-07T17:00:00` (optionally with fractional seconds)
//! - RFC 3339 with offset: `2026-02-07T17:00:00+02:00` (kept as UTC wall time)
//! - Minute precision: `2026-02-07 17:00`, `2026-02-07T17:00`
//! - Slash dates: `2026/02/07 17:00:00`, `2026/02/07`
//! - Date only: `2026-02-07` (midnight)

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::CellValue;

/// Format used for ingestion timestamps and for every displayed time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("'{0}' is not a recognised date-time")]
    Unrecognized(String),
    #[error("{0} is not a date-time string")]
    NotText(String),
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, TimestampError> {
    let input = input.trim();

    if let Some(ts) = try_parse_datetime(input) {
        return Ok(ts);
    }

    if let Some(ts) = try_parse_rfc3339(input) {
        return Ok(ts);
    }

    if let Some(ts) = try_parse_date_only(input) {
        return Ok(ts);
    }

    Err(TimestampError::Unrecognized(input.to_string()))
}

/// Parse a table cell. Empty cells are missing values, not failures.
pub fn parse_cell(cell: &CellValue) -> Result<Option<NaiveDateTime>, TimestampError> {
    match cell {
        CellValue::Empty => Ok(None),
        CellValue::Text(s) => parse_timestamp(s).map(Some),
        other => Err(TimestampError::NotText(other.to_string())),
    }
}

fn try_parse_datetime(input: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

fn try_parse_rfc3339(input: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.naive_utc())
}

fn try_parse_date_only(input: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::from_ymd_opt(y, mo, d).unwrap(),
            NaiveTime::from_hms_opt(h, mi, s).unwrap(),
        )
    }

    #[test]
    fn test_canonical_round_trip() {
        let ts = at(2026, 2, 7, 17, 5, 9);
        assert_eq!(format_timestamp(&ts), "2026-02-07 17:05:09");
        assert_eq!(parse_timestamp("2026-02-07 17:05:09").unwrap(), ts);
    }

    #[test]
    fn test_iso_and_fractional() {
        assert_eq!(parse_timestamp("2026-02-07T17:00:00").unwrap(), at(2026, 2, 7, 17, 0, 0));
        let frac = parse_timestamp("2026-02-07 17:00:00.250").unwrap();
        assert_eq!(frac.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_rfc3339_offset_is_normalised() {
        assert_eq!(
            parse_timestamp("2026-02-07T17:00:00+02:00").unwrap(),
            at(2026, 2, 7, 15, 0, 0)
        );
    }

    #[test]
    fn test_date_only_and_minutes() {
        assert_eq!(parse_timestamp("2026-02-07").unwrap(), at(2026, 2, 7, 0, 0, 0));
        assert_eq!(parse_timestamp("2026/02/07 08:30").unwrap(), at(2026, 2, 7, 8, 30, 0));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            parse_timestamp("yesterday-ish"),
            Err(TimestampError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(&CellValue::Empty).unwrap(), None);
        assert!(parse_cell(&CellValue::Text("2026-02-07".into())).unwrap().is_some());
        assert!(matches!(
            parse_cell(&CellValue::Integer(2024)),
            Err(TimestampError::NotText(_))
        ));
    }
}
