use eframe::egui::{self, ScrollArea, Ui};

use crate::color::ChartColors;
use crate::config::DashboardConfig;
use crate::state::{AppState, ViewCache};
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EnergyDashboardApp {
    pub state: AppState,
    pub config: DashboardConfig,
    colors: ChartColors,
    view: ViewCache,
}

impl EnergyDashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::default(),
            config,
            colors: ChartColors::default(),
            view: ViewCache::default(),
        }
    }
}

impl Default for EnergyDashboardApp {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl eframe::App for EnergyDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Recomputed only when a selection or the dataset changed.
        let view = self.view.refresh(&self.state, &self.config);
        let revision = self.state.revision();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, view);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(self.config.side_panel_width)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, view);
            });

        // ---- Central panel: tables + chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(view) = view else {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("⚠ Please upload a CSV file to begin analysis.  (File → Open…)");
                });
                return;
            };

            let config = &self.config;
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("Energy Efficiency Dashboard for Smart Buildings");
                    panels::warnings(ui, view);

                    ui.add_space(8.0);
                    ui.heading("Data Preview");
                    tables::data_table(ui, "preview", &view.preview, config.table_row_height, None);

                    ui.add_space(8.0);
                    ui.heading("Data Summary");
                    if !view.summary.is_empty() {
                        tables::numeric_summary_table(ui, &view.summary, config.table_row_height);
                    } else if !view.categorical_summary.is_empty() {
                        tables::categorical_summary_table(
                            ui,
                            &view.categorical_summary,
                            config.table_row_height,
                        );
                    }

                    ui.add_space(8.0);
                    ui.heading("Filtered Data");
                    tables::data_table(
                        ui,
                        "filtered",
                        &view.filtered,
                        config.table_row_height,
                        Some(config.filtered_table_height),
                    );

                    ui.add_space(8.0);
                    ui.heading("Energy Consumption Trends");
                    plot::chart_controls(ui, &mut self.state, view);
                    ui.add_space(4.0);
                    match &view.chart {
                        Some(chart) => plot::chart(ui, chart, &self.colors, config.chart_height),
                        None => {
                            ui.label("Not enough numeric columns to draw this chart.");
                        }
                    }
                });
        });

        if self.state.revision() != revision {
            ctx.request_repaint();
        }
    }
}
