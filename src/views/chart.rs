use chrono::NaiveDateTime;
use thiserror::Error;

use crate::data::model::{CellValue, Row, Table};
use crate::data::timestamp::{parse_cell, TimestampError};

// ---------------------------------------------------------------------------
// Display options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Scatter,
    Bar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Scatter, ChartKind::Bar];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Scatter => "Scatter",
            ChartKind::Bar => "Bar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub kind: ChartKind,
    /// Only meaningful for [`ChartKind::Line`].
    pub show_markers: bool,
    pub sort_by_time: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            kind: ChartKind::Line,
            show_markers: true,
            sort_by_time: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

/// How x values map back to timestamps.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// x is seconds since the Unix epoch of the (naive) timestamp.
    Time,
    /// Timestamps could not be parsed; x is the row position and the label
    /// is the raw text.
    Ordinal { labels: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    /// `None` for an empty power cell; lines break there.
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartWarning {
    /// Timestamps did not all parse; plotted as opaque text instead.
    TimestampsAsText(TimestampError),
    /// Rows without a timestamp were left off a time axis.
    MissingTimestamps(usize),
}

impl std::fmt::Display for ChartWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartWarning::TimestampsAsText(e) => write!(
                f,
                "Could not parse 'Date Time' as datetime ({e}). Plot will treat it as text."
            ),
            ChartWarning::MissingTimestamps(n) => {
                write!(f, "{n} row(s) without a 'Date Time' value are not plotted.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub kind: ChartKind,
    pub show_markers: bool,
    pub x_axis: XAxis,
    pub points: Vec<ChartPoint>,
    pub bar_width: f64,
    pub warnings: Vec<ChartWarning>,
}

impl ChartSpec {
    /// Runs of consecutive points with a value, split at gaps.
    pub fn line_segments(&self) -> Vec<Vec<[f64; 2]>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for p in &self.points {
            match p.y {
                Some(y) => current.push([p.x, y]),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Points with a value, for scatter markers and bars.
    pub fn present_points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.points.iter().filter_map(|p| p.y.map(|y| [p.x, y]))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    /// Empty table: nothing to draw, show a hint instead.
    NoData,
    Ready(ChartSpec),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("row {row}: power value '{value}' is not numeric")]
    NonNumericPower { row: usize, value: String },
}

pub const CHART_TITLE: &str = "Power vs Date Time";

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

enum TimeColumn {
    Parsed(Vec<Option<NaiveDateTime>>),
    Text(TimestampError),
}

fn parse_time_column(rows: &[Row]) -> TimeColumn {
    let parsed: Result<Vec<_>, _> = rows.iter().map(|r| parse_cell(&r.timestamp)).collect();
    match parsed {
        Ok(times) => TimeColumn::Parsed(times),
        Err(e) => TimeColumn::Text(e),
    }
}

/// Derive a chart from a snapshot of `table`. Never touches the store.
pub fn build_chart(table: &Table, options: &ChartOptions) -> Result<ChartView, ChartError> {
    if table.is_empty() {
        return Ok(ChartView::NoData);
    }

    // Keep each row's original index for error messages.
    let mut rows: Vec<(usize, &Row)> = table.rows().iter().enumerate().collect();
    let mut warnings = Vec::new();

    let (x_axis, xs) = match parse_time_column(table.rows()) {
        TimeColumn::Parsed(times) => {
            let mut keyed: Vec<_> = rows.into_iter().zip(times).collect();
            if options.sort_by_time {
                // Stable; missing times sort last.
                keyed.sort_by(|(_, a), (_, b)| match (a, b) {
                    (Some(a), Some(b)) => a.cmp(b),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                });
            }
            let missing = keyed.iter().filter(|(_, t)| t.is_none()).count();
            if missing > 0 {
                log::debug!("{missing} row(s) have no timestamp; skipping them on the time axis");
                warnings.push(ChartWarning::MissingTimestamps(missing));
            }
            let (kept, xs): (Vec<_>, Vec<f64>) = keyed
                .into_iter()
                .filter_map(|(row, t)| t.map(|t| (row, t.and_utc().timestamp_millis() as f64 / 1000.0)))
                .unzip();
            rows = kept;
            (XAxis::Time, xs)
        }
        TimeColumn::Text(err) => {
            log::debug!("Timestamps fall back to text: {err}");
            warnings.push(ChartWarning::TimestampsAsText(err));
            if options.sort_by_time {
                rows.sort_by_key(|(_, r)| r.timestamp.to_string());
            }
            let labels: Vec<String> = rows.iter().map(|(_, r)| r.timestamp.to_string()).collect();
            let xs: Vec<f64> = (0..rows.len()).map(|i| i as f64).collect();
            (XAxis::Ordinal { labels }, xs)
        }
    };

    let points = rows
        .iter()
        .zip(xs)
        .map(|((idx, row), x)| -> Result<ChartPoint, ChartError> {
            let y = match &row.power {
                CellValue::Empty => None,
                cell => Some(cell.as_f64().ok_or_else(|| ChartError::NonNumericPower {
                    row: *idx,
                    value: cell.to_string(),
                })?),
            };
            Ok(ChartPoint { x, y })
        })
        .collect::<Result<Vec<_>, ChartError>>()?;

    let bar_width = bar_width(&points);

    Ok(ChartView::Ready(ChartSpec {
        title: CHART_TITLE,
        kind: options.kind,
        show_markers: options.show_markers,
        x_axis,
        points,
        bar_width,
        warnings,
    }))
}

/// 80% of the smallest gap between distinct x values, or 1.0 with fewer than
/// two distinct positions.
fn bar_width(points: &[ChartPoint]) -> f64 {
    let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    xs.sort_by(f64::total_cmp);
    xs.windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0.0)
        .min_by(f64::total_cmp)
        .map_or(1.0, |gap| gap * 0.8)
}
