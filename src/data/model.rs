use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell. The editor may put anything into any cell, so
/// neither column is typed; views decide what they can make of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Empty,
}

impl CellValue {
    /// Infer a cell from free text (user edits, imported CSV fields).
    pub fn guess(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        // "nan", "inf" and overflowing literals stay text.
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }
        CellValue::Text(s.to_string())
    }

    /// Keep text verbatim, mapping blank input to [`CellValue::Empty`].
    pub fn text_or_empty(s: &str) -> Self {
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }

    /// Finite numeric interpretation; text is never coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(v) => Some(*v).filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Whole floats keep their decimal point so they read back as floats.
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Empty => serializer.serialize_str(""),
            other => serializer.collect_str(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – the two fixed columns, in table order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    DateTime,
    Power,
}

impl Column {
    pub const ALL: [Column; 2] = [Column::DateTime, Column::Power];

    /// Header text, also used verbatim in CSV exports.
    pub fn header(self) -> &'static str {
        match self {
            Column::DateTime => "Date Time",
            Column::Power => "Power",
        }
    }
}

// ---------------------------------------------------------------------------
// Row / Table
// ---------------------------------------------------------------------------

/// One (timestamp, power) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    #[serde(rename = "Date Time")]
    pub timestamp: CellValue,
    #[serde(rename = "Power")]
    pub power: CellValue,
}

impl Row {
    pub fn new(timestamp: CellValue, power: CellValue) -> Self {
        Row { timestamp, power }
    }

    pub fn blank() -> Self {
        Row::new(CellValue::Empty, CellValue::Empty)
    }

    pub fn cell(&self, column: Column) -> &CellValue {
        match column {
            Column::DateTime => &self.timestamp,
            Column::Power => &self.power,
        }
    }

    pub fn cell_mut(&mut self, column: Column) -> &mut CellValue {
        match column {
            Column::DateTime => &mut self.timestamp,
            Column::Power => &mut self.power,
        }
    }
}

/// The ordered rows of the session. Order is entry/edit order, not time order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Table { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn last(&self) -> Option<&Row> {
        self.rows.last()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of this table with `row` appended.
    pub fn with_row(&self, row: Row) -> Table {
        let mut rows = self.rows.clone();
        rows.push(row);
        Table { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_infers_numbers_and_keeps_text() {
        assert_eq!(CellValue::guess(" 50 "), CellValue::Integer(50));
        assert_eq!(CellValue::guess("-12.5"), CellValue::Float(-12.5));
        assert_eq!(CellValue::guess("abc"), CellValue::Text("abc".into()));
        assert_eq!(CellValue::guess("   "), CellValue::Empty);
    }

    #[test]
    fn non_finite_numbers_are_not_numeric() {
        assert_eq!(CellValue::guess("nan"), CellValue::Text("nan".into()));
        assert_eq!(CellValue::guess("-inf"), CellValue::Text("-inf".into()));
        assert_eq!(CellValue::guess("1e400"), CellValue::Text("1e400".into()));
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::Float(f64::INFINITY).as_f64(), None);
    }

    #[test]
    fn display_matches_csv_text() {
        assert_eq!(CellValue::Integer(50).to_string(), "50");
        assert_eq!(CellValue::Float(50.0).to_string(), "50.0");
        assert_eq!(CellValue::Float(45.25).to_string(), "45.25");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn with_row_leaves_original_untouched() {
        let t = Table::from_rows(vec![Row::new(CellValue::Text("a".into()), CellValue::Integer(1))]);
        let t2 = t.with_row(Row::blank());
        assert_eq!(t.len(), 1);
        assert_eq!(t2.len(), 2);
        assert_eq!(&t2.rows()[..1], t.rows());
    }

    #[test]
    fn columns_are_in_fixed_order() {
        let headers: Vec<_> = Column::ALL.iter().map(|c| c.header()).collect();
        assert_eq!(headers, ["Date Time", "Power"]);
    }
}
