use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, DashboardView};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: one selector per categorical column.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, view: Option<&DashboardView>) {
    ui.heading("Data Filters");
    ui.separator();

    let Some(view) = view else {
        ui.label("No dataset loaded.");
        return;
    };

    if view.filter_controls.is_empty() {
        ui.label("No categorical columns to filter by.");
        return;
    }

    let mut changes = Vec::new();
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for control in &view.filter_controls {
                ui.strong(format!("Filter by {}", control.column));
                egui::ComboBox::from_id_salt(("filter", &control.column))
                    .selected_text(control.selected.to_string())
                    .width(ui.available_width() - 8.0)
                    .show_ui(ui, |ui: &mut Ui| {
                        for choice in &control.choices {
                            if ui
                                .selectable_label(control.selected == *choice, choice.to_string())
                                .clicked()
                            {
                                changes.push((control.column.clone(), choice.clone()));
                            }
                        }
                    });
                ui.add_space(6.0);
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });

    for (column, choice) in changes {
        state.set_filter(&column, choice);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, view: Option<&DashboardView>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = view {
            ui.label(format!(
                "{}: {} rows loaded, {} after filters",
                view.name,
                view.total_rows,
                view.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Render non-fatal warnings from the current view.
pub fn warnings(ui: &mut Ui, view: &DashboardView) {
    for warning in &view.warnings {
        ui.label(RichText::new(format!("⚠ {warning}")).color(Color32::from_rgb(230, 160, 30)));
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open energy consumption data")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load_path(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
