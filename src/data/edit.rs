use super::model::{CellValue, Column, Row, Table};

/// One user action in the table widget.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEdit {
    SetCell {
        row: usize,
        column: Column,
        text: String,
    },
    /// Insert a blank row before `at` (clamped to the end).
    InsertRow { at: usize },
    AppendRow,
    DeleteRow { row: usize },
    MoveRow { from: usize, to: usize },
}

/// Build the table that results from applying `edit` to a snapshot of `table`.
///
/// Indices that fall outside the table make the edit a no-op. Power text is
/// type-guessed but never rejected, so non-numeric power survives into the
/// store for the views to cope with.
pub fn edited(table: &Table, edit: &TableEdit) -> Table {
    let mut rows = table.rows().to_vec();
    match edit {
        TableEdit::SetCell { row, column, text } => {
            if let Some(r) = rows.get_mut(*row) {
                *r.cell_mut(*column) = match column {
                    Column::DateTime => CellValue::text_or_empty(text),
                    Column::Power => CellValue::guess(text),
                };
            }
        }
        TableEdit::InsertRow { at } => {
            let at = (*at).min(rows.len());
            rows.insert(at, Row::blank());
        }
        TableEdit::AppendRow => rows.push(Row::blank()),
        TableEdit::DeleteRow { row } => {
            if *row < rows.len() {
                rows.remove(*row);
            }
        }
        TableEdit::MoveRow { from, to } => {
            if *from < rows.len() && *to < rows.len() && from != to {
                let moved = rows.remove(*from);
                rows.insert(*to, moved);
            }
        }
    }
    Table::from_rows(rows)
}
