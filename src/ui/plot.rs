use eframe::egui::{self, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ChartColors;
use crate::data::chart::{ChartKind, ChartSeries};
use crate::state::{AppState, ChartView, DashboardView};

// ---------------------------------------------------------------------------
// Axis / chart-kind selectors
// ---------------------------------------------------------------------------

fn column_selector(ui: &mut Ui, id: &str, label: &str, columns: &[String], current: Option<&str>) -> Option<String> {
    let mut picked = None;
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.unwrap_or("-"))
            .show_ui(ui, |ui: &mut Ui| {
                for col in columns {
                    if ui
                        .selectable_label(current == Some(col.as_str()), col)
                        .clicked()
                    {
                        picked = Some(col.clone());
                    }
                }
            });
    });
    picked
}

/// Render the x / y / chart-kind selectors. The shown selection is the one
/// actually plotted, which may be a fallback for a stale choice.
pub fn chart_controls(ui: &mut Ui, state: &mut AppState, view: &DashboardView) {
    let request = view.chart.as_ref().map(|c| &c.request);
    let current_x = request
        .map(|r| r.x.as_str())
        .or(state.x_column());
    let current_y = request
        .and_then(|r| r.y.as_deref())
        .or(state.y_column());

    let mut new_x = None;
    let mut new_y = None;
    let mut new_kind = None;

    ui.columns(3, |cols| {
        new_x = column_selector(&mut cols[0], "x_axis", "Select X-axis", &view.numeric_columns, current_x);
        new_y = column_selector(&mut cols[1], "y_axis", "Select Y-axis", &view.numeric_columns, current_y);

        cols[2].label("Select Plot Type");
        egui::ComboBox::from_id_salt("chart_kind")
            .selected_text(state.chart_kind().label())
            .show_ui(&mut cols[2], |ui: &mut Ui| {
                for kind in ChartKind::ALL {
                    if ui
                        .selectable_label(state.chart_kind() == kind, kind.label())
                        .clicked()
                    {
                        new_kind = Some(kind);
                    }
                }
            });
    });

    if let Some(x) = new_x {
        state.set_x_column(x);
    }
    if let Some(y) = new_y {
        state.set_y_column(y);
    }
    if let Some(kind) = new_kind {
        state.set_chart_kind(kind);
    }
}

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart for the current request. An empty series still draws
/// empty axes.
pub fn chart(ui: &mut Ui, chart: &ChartView, colors: &ChartColors, height: f32) {
    let request = &chart.request;
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(request.title());
    });

    Plot::new("energy_chart")
        .legend(Legend::default())
        .height(height)
        .x_axis_label(request.x.as_str())
        .y_axis_label(request.y_label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| match &chart.series {
            ChartSeries::Line(points) => {
                let name = request.y_label().to_string();
                let line: PlotPoints = points.iter().copied().collect();
                let markers: PlotPoints = points.iter().copied().collect();
                plot_ui.line(Line::new(line).name(&name).color(colors.primary).width(1.5));
                plot_ui.points(Points::new(markers).name(&name).color(colors.primary).radius(3.0));
            }
            ChartSeries::Scatter(points) => {
                let pts: PlotPoints = points.iter().copied().collect();
                plot_ui.points(
                    Points::new(pts)
                        .name(request.y_label())
                        .color(colors.primary)
                        .radius(3.0),
                );
            }
            ChartSeries::Histogram(histogram) => {
                let bars: Vec<Bar> = histogram
                    .bins
                    .iter()
                    .map(|bin| Bar::new(bin.center(), bin.count as f64).width(bin.width()))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name("Count").color(colors.bars));

                if !histogram.kde.is_empty() {
                    let curve: PlotPoints = histogram.kde.iter().copied().collect();
                    plot_ui.line(Line::new(curve).name("KDE").color(colors.density).width(2.0));
                }
            }
        });
}
