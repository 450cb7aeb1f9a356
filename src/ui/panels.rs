use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Table;
use crate::state::{AppState, NoticeLevel, Tab};
use crate::ui::table;
use crate::views::metrics::{Metric, Metrics};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, tab selector and the last notice.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_rows = !state.session.table().is_empty();
            if ui.add_enabled(has_rows, egui::Button::new("Save CSV…")).clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("⚡ Power Logger");
        ui.separator();

        for tab in Tab::ALL {
            if ui.selectable_value(&mut state.tab, tab, tab.label()).changed() {
                state.commit_active_cell();
            }
        }

        ui.separator();

        if let Some(notice) = &state.notice {
            let color = match notice.level {
                NoticeLevel::Success => Color32::from_rgb(60, 170, 90),
                NoticeLevel::Info => ui.visuals().text_color(),
                NoticeLevel::Warning => ui.visuals().warn_fg_color,
                NoticeLevel::Error => ui.visuals().error_fg_color,
            };
            ui.label(RichText::new(&notice.text).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Metrics strip
// ---------------------------------------------------------------------------

pub fn metrics_strip(ui: &mut Ui, table: &Table) {
    let m = Metrics::compute(table);
    let average_hint = invalid_reason(&m.average_power).or_else(|| {
        (m.skipped_power_cells > 0)
            .then(|| format!("{} non-numeric power value(s) skipped", m.skipped_power_cells))
    });

    ui.columns(4, |cols| {
        metric(&mut cols[0], "Total rows", m.total_rows.to_string(), None);
        metric(
            &mut cols[1],
            "Latest Power",
            m.latest_power.to_string(),
            invalid_reason(&m.latest_power),
        );
        metric(&mut cols[2], "Average Power", m.average_power.to_string(), average_hint);
        metric(&mut cols[3], "Start time", m.start_time.to_string(), None);
    });
}

fn invalid_reason<T>(metric: &Metric<T>) -> Option<String> {
    match metric {
        Metric::Invalid(reason) => Some(reason.clone()),
        _ => None,
    }
}

fn metric(ui: &mut Ui, label: &str, value: String, hint: Option<String>) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small().weak());
        let response = ui.label(RichText::new(value).heading());
        if let Some(hint) = hint {
            response.on_hover_text(hint);
        }
    });
}

// ---------------------------------------------------------------------------
// Input & Table tab
// ---------------------------------------------------------------------------

pub fn input_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📥 Input new power data");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Power (integer, e.g. 50, 40, ...)");
        ui.add(
            egui::DragValue::new(&mut state.power_input)
                .range(state.power_range.clone())
                .speed(1.0),
        );
        if ui.button("➕ Add to table").clicked() {
            state.add_reading();
        }
        if ui.button("🗑 Clear all data").clicked() {
            state.clear_all();
        }
    });

    ui.separator();
    ui.strong("🧾 Data table (editable)");
    ui.label(
        RichText::new("Click a cell to edit it, insert or delete rows with the row buttons.")
            .small()
            .weak(),
    );

    let edits = table::data_table(ui, state.session.table(), &mut state.active_cell);
    state.apply_edits(edits);
}

// ---------------------------------------------------------------------------
// Export tab
// ---------------------------------------------------------------------------

pub fn export_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("💾 Save CSV");

    if state.session.table().is_empty() {
        ui.label("Table is empty. Add some data before saving.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("CSV file name");
        ui.text_edit_singleline(&mut state.export_file_name);
    });

    match state.export() {
        Ok(doc) => {
            ui.label(format!(
                "{}: {} row(s), {} bytes ({})",
                doc.file_name,
                state.session.table().len(),
                doc.bytes.len(),
                doc.mime
            ));
            if ui.button("💾 Save CSV…").clicked() {
                save_file_dialog(state);
            }
            ui.label(
                RichText::new("The saved CSV includes all edits you made in the table.")
                    .small()
                    .weak(),
            );
            ui.separator();
            ScrollArea::vertical()
                .max_height(240.0)
                .show(ui, |ui: &mut Ui| {
                    ui.monospace(String::from_utf8_lossy(&doc.bytes).into_owned());
                });
        }
        Err(e) => {
            ui.label(RichText::new(format!("Error: {e}")).color(ui.visuals().error_fg_color));
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open power data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.import_csv(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save power data")
        .set_file_name(&state.export_file_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.save_export(&path);
    }
}
