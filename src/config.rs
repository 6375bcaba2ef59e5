use crate::data::SeriesOptions;

// ---------------------------------------------------------------------------
// Dashboard configuration (compiled-in defaults)
// ---------------------------------------------------------------------------

/// Layout and presentation settings, passed explicitly to the state and UI.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub window_title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub side_panel_width: f32,

    /// Rows shown in the "Data Preview" table.
    pub preview_rows: usize,
    /// Height of each table row in points.
    pub table_row_height: f32,
    /// Scroll height of the filtered data table.
    pub filtered_table_height: f32,
    pub chart_height: f32,

    pub max_histogram_bins: usize,
    pub kde_points: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_title: "Energy Efficiency Dashboard".to_string(),
            window_size: [1280.0, 860.0],
            min_window_size: [720.0, 480.0],
            side_panel_width: 240.0,
            preview_rows: 5,
            table_row_height: 20.0,
            filtered_table_height: 320.0,
            chart_height: 420.0,
            max_histogram_bins: 100,
            kde_points: 200,
        }
    }
}

impl DashboardConfig {
    pub fn series_options(&self) -> SeriesOptions {
        SeriesOptions {
            max_bins: self.max_histogram_bins,
            kde_points: self.kde_points,
        }
    }
}
