use std::path::Path;

use anyhow::{Context, Result};

use super::model::{CellValue, Column, Row, Table};

// ---------------------------------------------------------------------------
// CSV import
// ---------------------------------------------------------------------------

/// Load a power table from a CSV file on disk.
pub fn load_csv(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading CSV {}", path.display()))?;
    parse_csv(&bytes)
}

/// Parse CSV bytes, e.g. the output of an export.
///
/// Layout: header row containing `Date Time` and `Power` in any order.
/// Other columns are ignored. Short records leave the missing cells empty.
pub fn parse_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let position = |column: Column| {
        headers
            .iter()
            .position(|h| h.trim() == column.header())
            .with_context(|| format!("CSV missing '{}' column", column.header()))
    };
    let ts_idx = position(Column::DateTime)?;
    let power_idx = position(Column::Power)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let timestamp = CellValue::text_or_empty(record.get(ts_idx).unwrap_or(""));
        let power = CellValue::guess(record.get(power_idx).unwrap_or(""));
        rows.push(Row::new(timestamp, power));
    }

    Ok(Table::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_found_by_name() {
        let csv = "Note,Power,Date Time\nx,12,2026-02-07 12:00:00\ny,abc,\n";
        let t = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows()[0].timestamp, CellValue::Text("2026-02-07 12:00:00".into()));
        assert_eq!(t.rows()[0].power, CellValue::Integer(12));
        assert_eq!(t.rows()[1].power, CellValue::Text("abc".into()));
        assert!(t.rows()[1].timestamp.is_empty());
    }

    #[test]
    fn short_records_yield_empty_cells() {
        let t = parse_csv(b"Date Time,Power\n2026-02-07 12:00:00\n").unwrap();
        assert_eq!(t.rows()[0].power, CellValue::Empty);
    }

    #[test]
    fn missing_power_column_is_an_error() {
        let err = parse_csv(b"Date Time,Watts\n2026-02-07,1\n").unwrap_err();
        assert!(format!("{err:#}").contains("Power"));
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        assert!(parse_csv(b"Date Time,Power\n").unwrap().is_empty());
    }

    #[test]
    fn load_csv_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readings.csv");
        std::fs::write(&path, "Date Time,Power\n2026-02-07 12:00:00,50\n").unwrap();
        assert_eq!(load_csv(&path).unwrap().len(), 1);
    }
}
