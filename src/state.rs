use std::ops::RangeInclusive;
use std::path::Path;

use crate::config::AppConfig;
use crate::data::edit::{edited, TableEdit};
use crate::data::model::Column;
use crate::data::store::Session;
use crate::views::chart::ChartOptions;
use crate::views::export::{self, CsvExport, ExportError};

// ---------------------------------------------------------------------------
// Small UI-side types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    InputTable,
    Visualization,
    Export,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::InputTable, Tab::Visualization, Tab::Export];

    pub fn label(self) -> &'static str {
        match self {
            Tab::InputTable => "📥 Input & Table",
            Tab::Visualization => "📈 Visualization",
            Tab::Export => "💾 Export",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Feedback for the last user action, shown in the top bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// The cell currently being typed into; committed when it loses focus.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCell {
    pub row: usize,
    pub column: Column,
    pub buffer: String,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// The session table and the operations that write it.
    pub session: Session,

    pub tab: Tab,

    /// Value of the numeric input next to "Add to table".
    pub power_input: i64,
    pub power_range: RangeInclusive<i64>,

    pub chart_options: ChartOptions,

    pub export_file_name: String,

    pub active_cell: Option<ActiveCell>,

    /// Status / error message shown in the UI.
    pub notice: Option<Notice>,
}

impl AppState {
    pub fn new(config: &AppConfig, session: Session) -> Self {
        Self {
            session,
            tab: Tab::default(),
            power_input: config.default_power,
            power_range: config.power_range.clone(),
            chart_options: ChartOptions::default(),
            export_file_name: config.default_file_name.clone(),
            active_cell: None,
            notice: None,
        }
    }

    /// Append the current input value with the current time.
    pub fn add_reading(&mut self) {
        let power = self.power_input;
        match self.session.add(power) {
            Ok(table) => {
                let stamp = table
                    .last()
                    .map(|r| r.timestamp.to_string())
                    .unwrap_or_default();
                log::info!("Added reading {power} at {stamp}");
                self.notice = Some(Notice::new(
                    NoticeLevel::Success,
                    format!("Added row → {stamp} | Power = {power}"),
                ));
            }
            Err(e) => {
                log::warn!("Rejected reading: {e}");
                self.notice = Some(Notice::new(NoticeLevel::Error, e.to_string()));
            }
        }
    }

    pub fn clear_all(&mut self) {
        let dropped = self.session.table().len();
        self.session.clear();
        self.active_cell = None;
        log::info!("Cleared {dropped} row(s)");
        self.notice = Some(Notice::new(NoticeLevel::Warning, "All data cleared."));
    }

    /// Fold the table widget's edits into one edited table and hand it to
    /// the editor sink.
    pub fn apply_edits(&mut self, edits: Vec<TableEdit>) {
        if edits.is_empty() {
            return;
        }
        let table = edits
            .iter()
            .fold(self.session.table().clone(), |t, edit| edited(&t, edit));
        for edit in &edits {
            log::debug!("Table edit: {edit:?}");
            if !matches!(edit, TableEdit::SetCell { .. }) {
                // Row positions shifted; a half-typed cell would land on the wrong row.
                self.active_cell = None;
            }
        }
        self.session.apply(table);
    }

    /// Commit a half-typed cell, e.g. before the table leaves the screen.
    pub fn commit_active_cell(&mut self) {
        if let Some(cell) = self.active_cell.take() {
            self.apply_edits(vec![TableEdit::SetCell {
                row: cell.row,
                column: cell.column,
                text: cell.buffer,
            }]);
        }
    }

    pub fn import_csv(&mut self, path: &Path) {
        match crate::data::loader::load_csv(path) {
            Ok(table) => {
                let n = table.len();
                log::info!("Imported {n} row(s) from {}", path.display());
                self.session.apply(table);
                self.active_cell = None;
                let level = if n == 0 {
                    NoticeLevel::Info
                } else {
                    NoticeLevel::Success
                };
                self.notice = Some(Notice::new(
                    level,
                    format!("Loaded {n} row(s) from {}", path.display()),
                ));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.notice = Some(Notice::new(NoticeLevel::Error, format!("Error: {e:#}")));
            }
        }
    }

    /// CSV of the current table under the chosen file name.
    pub fn export(&self) -> Result<CsvExport, ExportError> {
        export::serialize(self.session.table(), &self.export_file_name)
    }

    pub fn save_export(&mut self, path: &Path) {
        let result = self
            .export()
            .map_err(anyhow::Error::from)
            .and_then(|doc| doc.write_to(path));
        self.notice = Some(match result {
            Ok(()) => Notice::new(
                NoticeLevel::Success,
                format!("Saved {}", path.display()),
            ),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                Notice::new(NoticeLevel::Error, format!("Error: {e:#}"))
            }
        });
    }
}
