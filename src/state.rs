use std::path::Path;

use anyhow::{Context, Result};

use crate::config::DashboardConfig;
use crate::data::chart::{
    chart_series, resolve_chart_request, ChartKind, ChartRequest, ChartResolution, ChartSeries,
};
use crate::data::classify::{classify_columns, ColumnClassification};
use crate::data::error::DataResult;
use crate::data::filter::{apply_filters, filter_choices, FilterChoice, FilterSelection};
use crate::data::loader::{load, load_file};
use crate::data::model::Dataset;
use crate::data::stats::{summarize, summarize_categorical, CategoricalSummary, NumericSummary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A successfully loaded file together with its column classification,
/// computed once at load time.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub name: String,
    pub dataset: Dataset,
    pub classification: ColumnClassification,
}

/// The user's selections, independent of rendering. Everything shown on
/// screen is derived from this by [`AppState::view`].
///
/// Selections change only through the methods below, each of which bumps
/// [`AppState::revision`].
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Loaded dataset (None until the user opens a file).
    loaded: Option<LoadedDataset>,

    /// One equality constraint per filtered categorical column.
    filters: FilterSelection,

    x_column: Option<String>,
    y_column: Option<String>,
    chart_kind: ChartKind,

    revision: u64,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset: classify its columns, drop filters that
    /// no longer apply and keep the axes that are still numeric. Other axes
    /// default to the first two numeric columns.
    pub fn set_dataset(&mut self, name: impl Into<String>, dataset: Dataset) {
        let name = name.into();
        let classification = classify_columns(&dataset);
        log::info!(
            "Loaded '{name}': {} rows, numeric columns {:?}, categorical columns {:?}",
            dataset.len(),
            classification.numeric,
            classification.categorical
        );

        self.filters.retain_valid(&dataset);
        let still_numeric =
            |column: Option<String>| column.filter(|c| classification.is_numeric(c));
        let x = still_numeric(self.x_column.take())
            .or_else(|| classification.numeric.first().cloned());
        let y = still_numeric(self.y_column.take()).or_else(|| {
            classification
                .numeric
                .iter()
                .find(|c| x.as_ref() != Some(*c))
                .cloned()
        });
        self.x_column = x;
        self.y_column = y;

        self.loaded = Some(LoadedDataset {
            name,
            dataset,
            classification,
        });
        self.status_message = None;
        self.touch();
    }

    /// Back to "awaiting input": the dataset and every selection are dropped.
    pub fn clear(&mut self) {
        self.loaded = None;
        self.filters.clear();
        self.x_column = None;
        self.y_column = None;
        self.touch();
    }

    /// Parse `raw` and make it the current dataset. On failure the previous
    /// dataset is discarded as well.
    pub fn load_bytes(&mut self, name: &str, raw: &[u8]) -> DataResult<()> {
        match load(raw) {
            Ok(dataset) => {
                self.set_dataset(name, dataset);
                Ok(())
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Read a CSV file from disk, see [`AppState::load_bytes`].
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match load_file(path).with_context(|| format!("loading {}", path.display())) {
            Ok(dataset) => {
                self.set_dataset(name, dataset);
                Ok(())
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    pub fn set_filter(&mut self, column: &str, choice: FilterChoice) {
        log::debug!("filter {column} = {choice}");
        self.filters.set(column, choice);
        self.touch();
    }

    pub fn reset_filters(&mut self) {
        self.filters.clear();
        self.touch();
    }

    pub fn set_x_column(&mut self, column: String) {
        self.x_column = Some(column);
        self.touch();
    }

    pub fn set_y_column(&mut self, column: String) {
        self.y_column = Some(column);
        self.touch();
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.chart_kind = kind;
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Incremented by every change that can alter [`AppState::view`].
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn loaded(&self) -> Option<&LoadedDataset> {
        self.loaded.as_ref()
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn x_column(&self) -> Option<&str> {
        self.x_column.as_deref()
    }

    pub fn y_column(&self) -> Option<&str> {
        self.y_column.as_deref()
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.chart_kind
    }

    /// Recompute everything shown on screen from the dataset and the current
    /// selections. See [`ViewCache`] for the once-per-change wrapper.
    pub fn view(&self, config: &DashboardConfig) -> Option<DashboardView> {
        let loaded = self.loaded.as_ref()?;
        let dataset = &loaded.dataset;
        let mut warnings = Vec::new();

        let filtered = apply_filters(dataset, &self.filters);
        if filtered.is_empty() {
            warnings.push(if self.filters.is_empty() {
                "The dataset has no rows.".to_string()
            } else {
                "No rows match the selected filters.".to_string()
            });
        }

        let resolution = resolve_chart_request(
            &loaded.classification,
            self.x_column.as_deref(),
            self.y_column.as_deref(),
            self.chart_kind,
        );
        let chart = match resolution {
            ChartResolution::Ready { request, warning } => {
                warnings.extend(warning);
                let series = chart_series(&request, &filtered, &config.series_options());
                if series.is_empty() && !filtered.is_empty() {
                    warnings.push(format!(
                        "No plottable values for {} in the filtered data.",
                        request.title()
                    ));
                }
                Some(ChartView { request, series })
            }
            ChartResolution::Withheld { reason } => {
                warnings.push(reason);
                None
            }
        };

        let filter_controls = loaded
            .classification
            .categorical
            .iter()
            .map(|column| FilterControl {
                column: column.clone(),
                choices: filter_choices(dataset, column),
                selected: self.filters.choice(column),
            })
            .collect();

        Some(DashboardView {
            name: loaded.name.clone(),
            total_rows: dataset.len(),
            preview: dataset.head(config.preview_rows),
            summary: summarize(dataset),
            categorical_summary: summarize_categorical(dataset),
            filter_controls,
            filtered,
            numeric_columns: loaded.classification.numeric.clone(),
            chart,
            warnings,
        })
    }
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// One categorical selector: "All" plus each distinct value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControl {
    pub column: String,
    pub choices: Vec<FilterChoice>,
    pub selected: FilterChoice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub request: ChartRequest,
    pub series: ChartSeries,
}

/// Everything the UI renders for one interaction.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub name: String,
    pub total_rows: usize,
    pub preview: Dataset,
    pub summary: Vec<NumericSummary>,
    pub categorical_summary: Vec<CategoricalSummary>,
    pub filter_controls: Vec<FilterControl>,
    pub filtered: Dataset,
    pub numeric_columns: Vec<String>,
    /// `None` when the chart is withheld.
    pub chart: Option<ChartView>,
    pub warnings: Vec<String>,
}

/// The last [`DashboardView`], rebuilt only when the state's revision moves.
#[derive(Debug, Default)]
pub struct ViewCache {
    revision: Option<u64>,
    view: Option<DashboardView>,
}

impl ViewCache {
    /// Whether the cached view was built from `state` as it is now.
    pub fn is_current(&self, state: &AppState) -> bool {
        self.revision == Some(state.revision())
    }

    /// Return the view for `state`, recomputing it if `state` changed since
    /// the previous call. Warnings are logged once per recomputation.
    pub fn refresh(&mut self, state: &AppState, config: &DashboardConfig) -> Option<&DashboardView> {
        if !self.is_current(state) {
            self.view = state.view(config);
            self.revision = Some(state.revision());
            for warning in self.view.iter().flat_map(|v| &v.warnings) {
                log::warn!("{warning}");
            }
        }
        self.view.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::DashboardError;

    const ENERGY: &[u8] =
        b"building_type,kwh,hour\nOffice,120,1\nOffice,140,2\nResidential,30,1\n";

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.load_bytes("energy.csv", ENERGY).unwrap();
        state
    }

    #[test]
    fn no_view_before_a_file_is_loaded() {
        assert!(AppState::default().view(&DashboardConfig::default()).is_none());
    }

    #[test]
    fn load_defaults_axes_to_first_numeric_columns() {
        let state = loaded();
        assert_eq!(state.x_column(), Some("kwh"));
        assert_eq!(state.y_column(), Some("hour"));

        let view = state.view(&DashboardConfig::default()).unwrap();
        assert_eq!(view.name, "energy.csv");
        assert_eq!(view.total_rows, 3);
        assert_eq!(view.filtered.len(), 3);
        assert_eq!(view.summary.len(), 2);
        assert!(view.warnings.is_empty());
        let chart = view.chart.unwrap();
        assert_eq!(chart.request.title(), "Line Chart of hour vs kwh");
    }

    #[test]
    fn filter_controls_list_all_plus_distinct_values() {
        let view = loaded().view(&DashboardConfig::default()).unwrap();
        assert_eq!(view.filter_controls.len(), 1);
        let control = &view.filter_controls[0];
        assert_eq!(control.column, "building_type");
        assert_eq!(control.selected, FilterChoice::All);
        assert_eq!(
            control.choices,
            vec![
                FilterChoice::All,
                FilterChoice::Value("Office".into()),
                FilterChoice::Value("Residential".into()),
            ]
        );
    }

    #[test]
    fn filters_change_the_filtered_table_only() {
        let mut state = loaded();
        state.set_filter("building_type", FilterChoice::Value("Residential".into()));
        let view = state.view(&DashboardConfig::default()).unwrap();
        assert_eq!(view.filtered.len(), 1);
        assert_eq!(view.preview.len(), 3);
        assert_eq!(view.summary[0].count, 3);

        state.set_filter("building_type", FilterChoice::All);
        assert_eq!(state.view(&DashboardConfig::default()).unwrap().filtered.len(), 3);
    }

    #[test]
    fn empty_filter_result_is_a_warning_not_an_error() {
        let mut state = loaded();
        state.set_filter("building_type", FilterChoice::Value("Warehouse".into()));
        let view = state.view(&DashboardConfig::default()).unwrap();
        assert!(view.filtered.is_empty());
        assert!(view.chart.is_some());
        assert!(view.warnings.iter().any(|w| w.contains("No rows match")));
    }

    #[test]
    fn stale_axis_falls_back_with_warning() {
        let mut state = loaded();
        state.set_x_column("building_type".into());
        let view = state.view(&DashboardConfig::default()).unwrap();
        assert_eq!(view.chart.unwrap().request.x, "kwh");
        assert!(view.warnings.iter().any(|w| w.contains("building_type")));
    }

    #[test]
    fn chart_is_withheld_with_one_numeric_column() {
        let mut state = AppState::default();
        state.load_bytes("one.csv", b"site,kwh\na,1\nb,2\n").unwrap();
        assert_eq!(state.y_column(), None);
        let view = state.view(&DashboardConfig::default()).unwrap();
        assert!(view.chart.is_none());

        state.set_chart_kind(ChartKind::Histogram);
        let view = state.view(&DashboardConfig::default()).unwrap();
        assert!(matches!(
            view.chart.map(|c| c.series),
            Some(ChartSeries::Histogram(_))
        ));
    }

    #[test]
    fn failed_load_discards_previous_dataset() {
        let mut state = loaded();
        state.set_filter("building_type", FilterChoice::Value("Office".into()));
        let err = state.load_bytes("bad.csv", b"a,b\n1\n").unwrap_err();
        assert!(matches!(err, DashboardError::Parse { .. }));
        assert!(state.loaded().is_none());
        assert!(state.filters().is_empty());
        assert_eq!(state.x_column(), None);
    }

    #[test]
    fn reload_prunes_filters_that_no_longer_apply() {
        let mut state = loaded();
        state.set_filter("building_type", FilterChoice::Value("Office".into()));
        state
            .load_bytes("other.csv", b"building_type,kwh\nLab,5\n")
            .unwrap();
        assert!(state.filters().is_empty());

        state.set_filter("building_type", FilterChoice::Value("Lab".into()));
        state
            .load_bytes("again.csv", b"building_type,kwh,temp\nLab,5,20\n")
            .unwrap();
        assert_eq!(state.filters().choice("building_type"), FilterChoice::Value("Lab".into()));
        assert_eq!(state.x_column(), Some("kwh"));
        assert_eq!(state.y_column(), Some("temp"));
    }

    #[test]
    fn reload_keeps_axes_that_are_still_numeric() {
        let mut state = loaded();
        state.set_x_column("hour".into());
        state.set_y_column("kwh".into());
        state
            .load_bytes("week2.csv", b"temp,kwh,hour\n20,5,1\n")
            .unwrap();
        assert_eq!(state.x_column(), Some("hour"));
        assert_eq!(state.y_column(), Some("kwh"));

        state
            .load_bytes("week3.csv", b"temp,hour,building_type\n20,1,Lab\n")
            .unwrap();
        assert_eq!(state.x_column(), Some("hour"));
        assert_eq!(state.y_column(), Some("temp"));
    }

    #[test]
    fn rows_without_plottable_values_give_empty_chart_and_warning() {
        let mut state = AppState::default();
        state
            .load_bytes("gaps.csv", b"site,kwh,hour\na,,1\nb,5,2\n")
            .unwrap();
        state.set_filter("site", FilterChoice::Value("a".into()));
        let view = state.view(&DashboardConfig::default()).unwrap();
        assert_eq!(view.filtered.len(), 1);

        let chart = view.chart.expect("chart region is still shown");
        assert!(chart.series.is_empty());
        assert_eq!(
            view.warnings,
            vec!["No plottable values for Line Chart of hour vs kwh in the filtered data."]
        );
    }

    #[test]
    fn view_cache_rebuilds_after_every_change() {
        let config = DashboardConfig::default();
        let mut state = loaded();
        let mut cache = ViewCache::default();
        assert!(!cache.is_current(&state));
        assert_eq!(cache.refresh(&state, &config).unwrap().filtered.len(), 3);
        assert!(cache.is_current(&state));
        cache.refresh(&state, &config);
        assert!(cache.is_current(&state));

        state.set_filter("building_type", FilterChoice::Value("Residential".into()));
        assert!(!cache.is_current(&state));
        assert_eq!(cache.refresh(&state, &config).unwrap().filtered.len(), 1);

        state.set_x_column("hour".into());
        assert!(!cache.is_current(&state));
        let view = cache.refresh(&state, &config).unwrap();
        assert_eq!(view.chart.as_ref().unwrap().request.x, "hour");

        state.set_y_column("kwh".into());
        assert!(!cache.is_current(&state));
        let view = cache.refresh(&state, &config).unwrap();
        assert_eq!(view.chart.as_ref().unwrap().request.y.as_deref(), Some("kwh"));

        state.set_chart_kind(ChartKind::Histogram);
        assert!(!cache.is_current(&state));
        let view = cache.refresh(&state, &config).unwrap();
        assert!(matches!(
            view.chart.as_ref().map(|c| &c.series),
            Some(ChartSeries::Histogram(_))
        ));

        state.reset_filters();
        assert!(!cache.is_current(&state));
        assert_eq!(cache.refresh(&state, &config).unwrap().filtered.len(), 3);

        state
            .load_bytes("other.csv", b"building_type,kwh\nLab,5\n")
            .unwrap();
        assert!(!cache.is_current(&state));
        let view = cache.refresh(&state, &config).unwrap();
        assert_eq!(view.name, "other.csv");
        assert_eq!(view.total_rows, 1);

        assert!(state.load_bytes("bad.csv", b"").is_err());
        assert!(!cache.is_current(&state));
        assert!(cache.refresh(&state, &config).is_none());
    }

    #[test]
    fn load_path_reports_missing_file() {
        let mut state = loaded();
        let err = state
            .load_path(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("here.csv"));
        assert!(state.loaded().is_none());
    }
}
