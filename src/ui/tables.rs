use eframe::egui::{RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Dataset;
use crate::data::stats::{CategoricalSummary, NumericSummary, SUMMARY_LABELS};

// ---------------------------------------------------------------------------
// Dataset table
// ---------------------------------------------------------------------------

/// Render `dataset` as a striped table with a leading row-number column.
/// `max_height` of `None` lays out every row without a scroll area.
pub fn data_table(ui: &mut Ui, id: &str, dataset: &Dataset, row_height: f32, max_height: Option<f32>) {
    if dataset.column_count() == 0 {
        ui.label("No columns.");
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        let mut table = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(TableColumn::auto().at_least(32.0))
            .columns(TableColumn::auto().at_least(72.0), dataset.column_count());
        table = match max_height {
            Some(h) => table.max_scroll_height(h),
            None => table.vscroll(false),
        };

        table
            .header(row_height + 4.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for column in dataset.columns() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(&column.name);
                    });
                }
            })
            .body(|body| {
                body.rows(row_height, dataset.len(), |mut row| {
                    let index = row.index();
                    row.col(|ui: &mut Ui| {
                        ui.label(RichText::new(index.to_string()).weak());
                    });
                    for column in dataset.columns() {
                        row.col(|ui: &mut Ui| {
                            ui.label(column.cell(index).to_string());
                        });
                    }
                });
            });
    });

    if dataset.is_empty() {
        ui.label(RichText::new("(no rows)").italics());
    }
}

// ---------------------------------------------------------------------------
// Summary tables
// ---------------------------------------------------------------------------

fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.6}"),
        None => "NaN".to_string(),
    }
}

/// Statistics as rows, one column per numeric dataset column.
pub fn numeric_summary_table(ui: &mut Ui, summary: &[NumericSummary], row_height: f32) {
    ui.push_id("numeric_summary", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(TableColumn::auto().at_least(48.0))
            .columns(TableColumn::auto().at_least(96.0), summary.len())
            .header(row_height + 4.0, |mut header| {
                header.col(|_ui: &mut Ui| {});
                for s in summary {
                    header.col(|ui: &mut Ui| {
                        ui.strong(&s.column);
                    });
                }
            })
            .body(|mut body| {
                for (i, label) in SUMMARY_LABELS.iter().enumerate() {
                    body.row(row_height, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.strong(*label);
                        });
                        for s in summary {
                            row.col(|ui: &mut Ui| {
                                ui.label(format_stat(s.values()[i]));
                            });
                        }
                    });
                }
            });
    });
}

/// count / unique / top / freq rows, one column per categorical column.
pub fn categorical_summary_table(ui: &mut Ui, summary: &[CategoricalSummary], row_height: f32) {
    let rows: [(&str, fn(&CategoricalSummary) -> String); 4] = [
        ("count", |s| s.count.to_string()),
        ("unique", |s| s.unique.to_string()),
        ("top", |s| s.top.clone().unwrap_or_else(|| "NaN".to_string())),
        ("freq", |s| s.freq.to_string()),
    ];

    ui.push_id("categorical_summary", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(TableColumn::auto().at_least(48.0))
            .columns(TableColumn::auto().at_least(96.0), summary.len())
            .header(row_height + 4.0, |mut header| {
                header.col(|_ui: &mut Ui| {});
                for s in summary {
                    header.col(|ui: &mut Ui| {
                        ui.strong(&s.column);
                    });
                }
            })
            .body(|mut body| {
                for (label, cell) in rows {
                    body.row(row_height, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.strong(label);
                        });
                        for s in summary {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell(s));
                            });
                        }
                    });
                }
            });
    });
}
