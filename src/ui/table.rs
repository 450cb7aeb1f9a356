use eframe::egui::{self, Align, Layout, RichText, TextEdit, Ui};
use egui_extras::{Column as GridColumn, TableBuilder};

use crate::data::edit::TableEdit;
use crate::data::model::{CellValue, Column, Table};
use crate::state::ActiveCell;

// ---------------------------------------------------------------------------
// Editable data table
// ---------------------------------------------------------------------------

/// Render the table and collect the user's edits for this frame. The table
/// itself is not touched here; the caller hands the edits to the editor.
pub fn data_table(ui: &mut Ui, table: &Table, active: &mut Option<ActiveCell>) -> Vec<TableEdit> {
    let mut edits = Vec::new();
    let row_height = ui.spacing().interact_size.y + 4.0;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(GridColumn::exact(40.0))
        .column(GridColumn::initial(200.0).at_least(140.0))
        .column(GridColumn::initial(140.0).at_least(80.0))
        .column(GridColumn::remainder().at_least(90.0))
        .header(row_height, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("#");
            });
            for column in Column::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(column.header());
                });
            }
            header.col(|_ui: &mut Ui| {});
        })
        .body(|body| {
            body.rows(row_height, table.len(), |mut row| {
                let idx = row.index();
                let data = &table.rows()[idx];

                row.col(|ui: &mut Ui| {
                    ui.label(RichText::new(idx.to_string()).weak());
                });
                for column in Column::ALL {
                    row.col(|ui: &mut Ui| {
                        cell(ui, idx, column, data.cell(column), active, &mut edits);
                    });
                }
                row.col(|ui: &mut Ui| {
                    if ui.small_button("⬆").on_hover_text("Move up").clicked() && idx > 0 {
                        edits.push(TableEdit::MoveRow { from: idx, to: idx - 1 });
                    }
                    if ui.small_button("➕").on_hover_text("Insert row below").clicked() {
                        edits.push(TableEdit::InsertRow { at: idx + 1 });
                    }
                    if ui.small_button("🗑").on_hover_text("Delete row").clicked() {
                        edits.push(TableEdit::DeleteRow { row: idx });
                    }
                });
            });
        });

    if ui.button("➕ Add row").clicked() {
        edits.push(TableEdit::AppendRow);
    }
    edits
}

/// One cell: a clickable label, or a text field while it is being edited.
fn cell(
    ui: &mut Ui,
    row: usize,
    column: Column,
    value: &CellValue,
    active: &mut Option<ActiveCell>,
    edits: &mut Vec<TableEdit>,
) {
    let id = ui.make_persistent_id(("cell", row, column));

    if let Some(current) = active.as_mut().filter(|a| a.row == row && a.column == column) {
        let response = ui.add(
            TextEdit::singleline(&mut current.buffer)
                .id(id)
                .desired_width(f32::INFINITY),
        );
        if response.lost_focus() {
            if let Some(done) = active.take() {
                edits.push(commit(done));
            }
        }
        return;
    }

    let text = value.to_string();
    let shown = match value {
        CellValue::Empty => RichText::new("·").weak(),
        CellValue::Text(_) if column == Column::Power => {
            RichText::new(&text).color(ui.visuals().warn_fg_color)
        }
        _ => RichText::new(&text),
    };
    let response = ui.add(egui::Label::new(shown).sense(egui::Sense::click()).truncate());
    if response.clicked() {
        // Switching cells commits whatever was typed in the previous one.
        if let Some(previous) = active.take() {
            edits.push(commit(previous));
        }
        *active = Some(ActiveCell {
            row,
            column,
            buffer: text,
        });
        ui.memory_mut(|mem| mem.request_focus(id));
    }
}

fn commit(cell: ActiveCell) -> TableEdit {
    TableEdit::SetCell {
        row: cell.row,
        column: cell.column,
        text: cell.buffer,
    }
}
