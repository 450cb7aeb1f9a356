use chrono::DateTime;
use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::state::AppState;
use crate::views::chart::{build_chart, ChartKind, ChartOptions, ChartSpec, ChartView, XAxis};

const SERIES_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
const SERIES_NAME: &str = "Power";

// ---------------------------------------------------------------------------
// Visualization tab
// ---------------------------------------------------------------------------

/// Render chart controls and the chart for the current table.
pub fn chart_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📈 Visualization");

    let view = build_chart(state.session.table(), &state.chart_options);
    if matches!(view, Ok(ChartView::NoData)) {
        ui.label("No data to plot yet. Add some power values in the Input & Table tab.");
        return;
    }

    egui::SidePanel::right("chart_controls")
        .resizable(false)
        .default_width(180.0)
        .show_inside(ui, |ui: &mut Ui| {
            chart_controls(ui, &mut state.chart_options);
        });

    egui::CentralPanel::default().show_inside(ui, |ui: &mut Ui| match view {
        Ok(ChartView::Ready(spec)) => {
            for warning in &spec.warnings {
                ui.label(RichText::new(warning.to_string()).color(ui.visuals().warn_fg_color));
            }
            ui.strong(spec.title);
            ui.label(
                RichText::new("Chart updates automatically as you edit the table.")
                    .small()
                    .weak(),
            );
            power_plot(ui, &spec);
        }
        Ok(ChartView::NoData) => {}
        Err(e) => {
            ui.label(
                RichText::new(format!("Error creating chart: {e}"))
                    .color(ui.visuals().error_fg_color),
            );
        }
    });
}

fn chart_controls(ui: &mut Ui, options: &mut ChartOptions) {
    ui.strong("Chart type");
    egui::ComboBox::from_id_salt("chart_kind")
        .selected_text(options.kind.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in ChartKind::ALL {
                ui.selectable_value(&mut options.kind, kind, kind.label());
            }
        });
    ui.add_enabled(
        options.kind == ChartKind::Line,
        egui::Checkbox::new(&mut options.show_markers, "Show markers"),
    );
    ui.checkbox(&mut options.sort_by_time, "Sort by Date Time");
}

// ---------------------------------------------------------------------------
// Plot
// ---------------------------------------------------------------------------

fn power_plot(ui: &mut Ui, spec: &ChartSpec) {
    let plot = Plot::new("power_plot")
        .legend(Legend::default())
        .x_axis_label("Date Time")
        .y_axis_label("Power")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    let plot = match &spec.x_axis {
        XAxis::Time => plot
            .x_axis_formatter(|mark, _range| format_epoch(mark.value, "%m-%d %H:%M:%S"))
            .label_formatter(|name, value| {
                format!(
                    "{name}\n{}\nPower: {:.2}",
                    format_epoch(value.x, "%Y-%m-%d %H:%M:%S"),
                    value.y
                )
            }),
        XAxis::Ordinal { labels } => {
            let axis_labels = labels.clone();
            let hover_labels = labels.clone();
            plot.x_axis_formatter(move |mark, _range| {
                ordinal_label(&axis_labels, mark.value).unwrap_or_default()
            })
            .label_formatter(move |name, value| {
                let x = ordinal_label(&hover_labels, value.x).unwrap_or_default();
                format!("{name}\n{x}\nPower: {:.2}", value.y)
            })
        }
    };

    plot.show(ui, |plot_ui| match spec.kind {
        ChartKind::Line => {
            for segment in spec.line_segments() {
                let line = Line::new(PlotPoints::from(segment))
                    .name(SERIES_NAME)
                    .color(SERIES_COLOR)
                    .width(2.0);
                plot_ui.line(line);
            }
            if spec.show_markers {
                let markers: PlotPoints = spec.present_points().collect();
                plot_ui.points(Points::new(markers).color(SERIES_COLOR).radius(3.5));
            }
        }
        ChartKind::Scatter => {
            let points: PlotPoints = spec.present_points().collect();
            plot_ui.points(
                Points::new(points)
                    .name(SERIES_NAME)
                    .color(SERIES_COLOR)
                    .radius(4.0),
            );
        }
        ChartKind::Bar => {
            let bars: Vec<Bar> = spec
                .present_points()
                .map(|[x, y]| Bar::new(x, y).width(spec.bar_width))
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name(SERIES_NAME).color(SERIES_COLOR));
        }
    });
}

/// Naive timestamps are stored as if they were UTC, so read them back the same way.
fn format_epoch(secs: f64, fmt: &str) -> String {
    DateTime::from_timestamp(secs.round() as i64, 0)
        .map(|dt| dt.naive_utc().format(fmt).to_string())
        .unwrap_or_default()
}

/// Label for an ordinal x position, only at whole positions.
fn ordinal_label(labels: &[String], x: f64) -> Option<String> {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return None;
    }
    labels.get(i as usize).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_labels_only_on_whole_positions() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(ordinal_label(&labels, 1.0).as_deref(), Some("b"));
        assert_eq!(ordinal_label(&labels, 0.5), None);
        assert_eq!(ordinal_label(&labels, -1.0), None);
        assert_eq!(ordinal_label(&labels, 2.0), None);
    }

    #[test]
    fn epoch_formatting_round_trips_naive_time() {
        let ts = crate::data::timestamp::parse_timestamp("2026-02-07 12:34:56").unwrap();
        let secs = ts.and_utc().timestamp() as f64;
        assert_eq!(format_epoch(secs, "%Y-%m-%d %H:%M:%S"), "2026-02-07 12:34:56");
    }
}
