use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::data::model::Table;

pub const CSV_MIME: &str = "text/csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("table is empty, add some data before saving")]
    EmptyTable,
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV buffer could not be flushed: {0}")]
    Flush(String),
}

/// A ready-to-save CSV document.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialize `table` as UTF-8 CSV: header row, one record per row in table
/// order, no index column. The file name is carried through untouched.
pub fn serialize(table: &Table, file_name: &str) -> Result<CsvExport, ExportError> {
    if table.is_empty() {
        return Err(ExportError::EmptyTable);
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in table.rows() {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;

    Ok(CsvExport {
        file_name: file_name.to_string(),
        mime: CSV_MIME,
        bytes,
    })
}

impl CsvExport {
    /// Write the document to `path` (the native stand-in for a download).
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Saved {} bytes of {} to {}",
            self.bytes.len(),
            self.mime,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::model::{CellValue, Row};

    fn row(ts: &str, power: CellValue) -> Row {
        Row::new(CellValue::text_or_empty(ts), power)
    }

    #[test]
    fn single_row_is_exact() {
        let t = Table::from_rows(vec![row("t1", CellValue::Integer(50))]);
        let out = serialize(&t, "out.csv").unwrap();
        assert_eq!(out.file_name, "out.csv");
        assert_eq!(out.mime, "text/csv");
        assert_eq!(String::from_utf8(out.bytes).unwrap(), "Date Time,Power\nt1,50\n");
    }

    #[test]
    fn empty_table_is_refused() {
        assert!(matches!(
            serialize(&Table::new(), "power_data.csv"),
            Err(ExportError::EmptyTable)
        ));
    }

    #[test]
    fn awkward_cells_are_quoted_and_survive_reimport() {
        let t = Table::from_rows(vec![
            row("2026-02-07 12:00:00", CellValue::Integer(50)),
            row("2026-02-07 12:01:00", CellValue::Text("high, \"very\"".into())),
            row("", CellValue::Float(12.5)),
            row("2026-02-07 12:03:00", CellValue::Empty),
            row("2026-02-07 12:04:00", CellValue::Float(7.0)),
        ]);
        let out = serialize(&t, "power_data.csv").unwrap();
        let text = String::from_utf8(out.bytes.clone()).unwrap();
        assert!(text.contains("\"high, \"\"very\"\"\""));

        let back = parse_csv(&out.bytes).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn no_extension_is_enforced() {
        let t = Table::from_rows(vec![row("t1", CellValue::Integer(1))]);
        assert_eq!(serialize(&t, "readings").unwrap().file_name, "readings");
    }

    #[test]
    fn write_to_saves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("power_data.csv");
        let t = Table::from_rows(vec![row("t1", CellValue::Integer(5))]);
        serialize(&t, "power_data.csv").unwrap().write_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Date Time,Power\nt1,5\n");
    }
}
