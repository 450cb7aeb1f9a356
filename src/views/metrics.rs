use std::fmt;

use chrono::NaiveDateTime;

use crate::data::model::{CellValue, Table};
use crate::data::timestamp::{format_timestamp, parse_cell};

/// A scalar indicator with explicit placeholders for the cases where the
/// value is undefined.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric<T> {
    Value(T),
    NoData,
    Invalid(String),
}

/// The four top-of-page summaries, derived fresh from the table each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_rows: usize,
    pub latest_power: Metric<i64>,
    pub average_power: Metric<f64>,
    pub start_time: Metric<NaiveDateTime>,
    /// Power cells left out of the average because they are not numeric.
    pub skipped_power_cells: usize,
}

impl Metrics {
    pub fn compute(table: &Table) -> Self {
        let (average_power, skipped_power_cells) = average_power(table);
        Metrics {
            total_rows: table.len(),
            latest_power: latest_power(table),
            average_power,
            start_time: start_time(table),
            skipped_power_cells,
        }
    }
}

fn latest_power(table: &Table) -> Metric<i64> {
    let Some(last) = table.last() else {
        return Metric::NoData;
    };
    match &last.power {
        CellValue::Integer(i) => Metric::Value(*i),
        CellValue::Float(v) if v.is_finite() => Metric::Value(v.trunc() as i64),
        other => Metric::Invalid(format!("last power '{other}' is not a number")),
    }
}

fn average_power(table: &Table) -> (Metric<f64>, usize) {
    if table.is_empty() {
        return (Metric::NoData, 0);
    }
    let values: Vec<f64> = table.rows().iter().filter_map(|r| r.power.as_f64()).collect();
    let skipped = table.len() - values.len();
    if values.is_empty() {
        return (Metric::Invalid("no numeric power values".to_string()), skipped);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (Metric::Value(round2(mean)), skipped)
}

fn start_time(table: &Table) -> Metric<NaiveDateTime> {
    if table.is_empty() {
        return Metric::NoData;
    }
    table
        .rows()
        .iter()
        .filter_map(|r| parse_cell(&r.timestamp).ok().flatten())
        .min()
        .map_or_else(|| Metric::Invalid("Invalid Date".to_string()), Metric::Value)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Display strings for the metrics strip
// ---------------------------------------------------------------------------

/// Placeholder shown for [`Metric::NoData`].
pub const NO_DATA: &str = "—";

impl fmt::Display for Metric<i64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v}"),
            Metric::NoData => f.write_str(NO_DATA),
            Metric::Invalid(_) => f.write_str("Invalid"),
        }
    }
}

impl fmt::Display for Metric<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Already rounded; whole means keep one decimal ("45.0").
            Metric::Value(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            Metric::Value(v) => write!(f, "{v}"),
            Metric::NoData => f.write_str(NO_DATA),
            Metric::Invalid(_) => f.write_str("Invalid"),
        }
    }
}

impl fmt::Display for Metric<NaiveDateTime> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(ts) => f.write_str(&format_timestamp(ts)),
            Metric::NoData => f.write_str(NO_DATA),
            Metric::Invalid(_) => f.write_str("Invalid Date"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::edit::{edited, TableEdit};
    use crate::data::model::{Column, Row};
    use crate::data::store::test_clock::SteppingClock;
    use crate::data::store::Session;
    use crate::data::timestamp::parse_timestamp;

    fn session() -> Session {
        Session::with_clock(Box::new(SteppingClock::new(30)))
    }

    fn row(ts: &str, power: CellValue) -> Row {
        Row::new(CellValue::text_or_empty(ts), power)
    }

    #[test]
    fn empty_table_reports_no_data() {
        let m = Metrics::compute(&Table::new());
        assert_eq!(m.total_rows, 0);
        assert_eq!(m.latest_power, Metric::NoData);
        assert_eq!(m.average_power, Metric::NoData);
        assert_eq!(m.start_time, Metric::NoData);
        assert_eq!(m.average_power.to_string(), NO_DATA);
    }

    #[test]
    fn single_reading() {
        let mut s = session();
        let m = Metrics::compute(s.add(50).unwrap());
        assert_eq!(m.total_rows, 1);
        assert_eq!(m.latest_power, Metric::Value(50));
        assert_eq!(m.average_power, Metric::Value(50.0));
    }

    #[test]
    fn two_readings_average_and_start() {
        let mut s = session();
        s.add(50).unwrap();
        let m = Metrics::compute(s.add(40).unwrap());
        assert_eq!(m.average_power, Metric::Value(45.0));
        assert_eq!(m.latest_power, Metric::Value(40));
        assert_eq!(
            m.start_time,
            Metric::Value(parse_timestamp("2026-02-07 12:00:00").unwrap())
        );
    }

    #[test]
    fn add_then_clear_is_no_data_again() {
        let mut s = session();
        s.add(10).unwrap();
        let m = Metrics::compute(s.clear());
        assert_eq!(m.total_rows, 0);
        assert_eq!(m.latest_power, Metric::NoData);
        assert_eq!(m.start_time, Metric::NoData);
    }

    #[test]
    fn average_rounds_to_two_places() {
        let t = Table::from_rows(vec![
            row("2026-02-07 12:00:00", CellValue::Integer(1)),
            row("2026-02-07 12:00:01", CellValue::Integer(1)),
            row("2026-02-07 12:00:02", CellValue::Integer(2)),
        ]);
        assert_eq!(Metrics::compute(&t).average_power, Metric::Value(1.33));
    }

    #[test]
    fn non_numeric_power_is_skipped_in_average() {
        let t = Table::from_rows(vec![
            row("2026-02-07 12:00:00", CellValue::Integer(50)),
            row("2026-02-07 12:00:01", CellValue::Text("oops".into())),
            row("2026-02-07 12:00:02", CellValue::Float(40.0)),
        ]);
        let m = Metrics::compute(&t);
        assert_eq!(m.average_power, Metric::Value(45.0));
        assert_eq!(m.skipped_power_cells, 1);
        assert!(matches!(m.latest_power, Metric::Value(40)));
    }

    #[test]
    fn average_displays_like_the_rounded_mean() {
        let mut s = session();
        s.add(50).unwrap();
        assert_eq!(Metrics::compute(s.table()).average_power.to_string(), "50.0");
        s.add(40).unwrap();
        assert_eq!(Metrics::compute(s.table()).average_power.to_string(), "45.0");
        assert_eq!(Metric::Value(1.33).to_string(), "1.33");
        assert_eq!(Metric::Value(2.5).to_string(), "2.5");
    }

    #[test]
    fn nan_and_overflow_edits_are_skipped_in_average() {
        let mut s = session();
        s.add(50).unwrap();
        s.add(40).unwrap();
        s.add(30).unwrap();
        for (row, text) in [(1, "nan"), (2, "1e400")] {
            let next = edited(
                s.table(),
                &TableEdit::SetCell { row, column: Column::Power, text: text.into() },
            );
            s.apply(next);
        }
        let m = Metrics::compute(s.table());
        assert_eq!(m.average_power, Metric::Value(50.0));
        assert_eq!(m.skipped_power_cells, 2);
        assert!(matches!(m.latest_power, Metric::Invalid(_)));
    }

    #[test]
    fn non_numeric_latest_is_invalid_not_a_panic() {
        let t = Table::from_rows(vec![row("2026-02-07 12:00:00", CellValue::Text("x".into()))]);
        let m = Metrics::compute(&t);
        assert!(matches!(m.latest_power, Metric::Invalid(_)));
        assert!(matches!(m.average_power, Metric::Invalid(_)));
    }

    #[test]
    fn start_time_skips_unparseable_and_flags_all_bad() {
        let t = Table::from_rows(vec![
            row("garbage", CellValue::Integer(1)),
            row("2026-02-07 09:00:00", CellValue::Integer(1)),
            row("2026-02-06 23:59:59", CellValue::Integer(1)),
        ]);
        assert_eq!(
            Metrics::compute(&t).start_time,
            Metric::Value(parse_timestamp("2026-02-06 23:59:59").unwrap())
        );

        let bad = Table::from_rows(vec![row("garbage", CellValue::Integer(1))]);
        let m = Metrics::compute(&bad);
        assert!(matches!(m.start_time, Metric::Invalid(_)));
        assert_eq!(m.start_time.to_string(), "Invalid Date");
    }

    #[test]
    fn recomputing_is_stable() {
        let mut s = session();
        s.add(3).unwrap();
        s.add(4).unwrap();
        assert_eq!(Metrics::compute(s.table()), Metrics::compute(s.table()));
    }
}
