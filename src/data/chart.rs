use std::fmt;

use super::classify::ColumnClassification;
use super::error::{DashboardError, DataResult};
use super::model::{ColumnKind, Dataset};
use super::stats::{quantile_sorted, sample_std};

// ---------------------------------------------------------------------------
// ChartKind / ChartRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Scatter,
    Histogram,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Scatter, ChartKind::Histogram];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Histogram => "Histogram",
        }
    }

    /// Whether the chart plots a y column at all.
    pub fn uses_y(&self) -> bool {
        !matches!(self, ChartKind::Histogram)
    }

    /// Numeric columns the chart needs.
    pub fn required_columns(&self) -> usize {
        if self.uses_y() {
            2
        } else {
            1
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated (x, y, kind) triple. `y` is `None` for histograms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub x: String,
    pub y: Option<String>,
    pub kind: ChartKind,
}

impl ChartRequest {
    pub fn title(&self) -> String {
        match &self.y {
            Some(y) => format!("{} of {y} vs {}", self.kind, self.x),
            None => format!("{} of {}", self.kind, self.x),
        }
    }

    pub fn y_label(&self) -> &str {
        self.y.as_deref().unwrap_or("Count")
    }
}

fn require_numeric(classification: &ColumnClassification, column: &str) -> DataResult<()> {
    match classification.kind_of(column) {
        Some(ColumnKind::Numeric) => Ok(()),
        Some(ColumnKind::Categorical) => Err(DashboardError::invalid_selection(
            column,
            "column is categorical, not numeric",
        )),
        None => Err(DashboardError::invalid_selection(
            column,
            "column is not in the dataset",
        )),
    }
}

/// Validate an axis selection against the numeric columns.
///
/// `y` is ignored for histograms and required otherwise.
pub fn build_chart_request(
    classification: &ColumnClassification,
    x: &str,
    y: Option<&str>,
    kind: ChartKind,
) -> DataResult<ChartRequest> {
    require_numeric(classification, x)?;

    let y = if kind.uses_y() {
        let y = y.ok_or(DashboardError::MissingAxis { axis: "y-axis" })?;
        require_numeric(classification, y)?;
        Some(y.to_string())
    } else {
        None
    };

    Ok(ChartRequest {
        x: x.to_string(),
        y,
        kind,
    })
}

// ---------------------------------------------------------------------------
// Fallback resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ChartResolution {
    /// A chart can be drawn. `warning` is set when the user's selection was
    /// replaced by the default one.
    Ready {
        request: ChartRequest,
        warning: Option<String>,
    },
    /// Not enough numeric columns for this kind of chart.
    Withheld { reason: String },
}

impl ChartResolution {
    pub fn request(&self) -> Option<&ChartRequest> {
        match self {
            ChartResolution::Ready { request, .. } => Some(request),
            ChartResolution::Withheld { .. } => None,
        }
    }
}

/// Like [`build_chart_request`], but an invalid selection falls back to the
/// first (two) numeric columns instead of failing.
pub fn resolve_chart_request(
    classification: &ColumnClassification,
    x: Option<&str>,
    y: Option<&str>,
    kind: ChartKind,
) -> ChartResolution {
    let attempt = match x {
        Some(x) => build_chart_request(classification, x, y, kind),
        None => Err(DashboardError::MissingAxis { axis: "x-axis" }),
    };
    let err = match attempt {
        Ok(request) => {
            return ChartResolution::Ready {
                request,
                warning: None,
            }
        }
        Err(err) => err,
    };

    let numeric = &classification.numeric;
    if numeric.len() < kind.required_columns() {
        return ChartResolution::Withheld {
            reason: format!(
                "{kind} needs {} numeric column(s), the dataset has {}",
                kind.required_columns(),
                numeric.len()
            ),
        };
    }

    let request = ChartRequest {
        x: numeric[0].clone(),
        y: kind.uses_y().then(|| numeric[1].clone()),
        kind,
    };
    let warning = Some(format!("{err}; showing {} instead", request.title()));
    ChartResolution::Ready { request, warning }
}

// ---------------------------------------------------------------------------
// ChartSeries – plot-ready data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesOptions {
    /// Upper bound on histogram bins.
    pub max_bins: usize,
    /// Samples along the KDE curve.
    pub kde_points: usize,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        SeriesOptions {
            max_bins: 100,
            kde_points: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    /// Density estimate scaled to bin counts; empty when it can't be fitted.
    pub kde: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSeries {
    /// Mean y per distinct x, sorted by x.
    Line(Vec<[f64; 2]>),
    Scatter(Vec<[f64; 2]>),
    Histogram(Histogram),
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartSeries::Line(points) | ChartSeries::Scatter(points) => points.is_empty(),
            ChartSeries::Histogram(h) => h.bins.is_empty(),
        }
    }
}

fn finite_column<'a>(dataset: &'a Dataset, column: &str) -> impl Iterator<Item = Option<f64>> + 'a {
    dataset
        .column(column)
        .and_then(|c| c.numeric_values())
        .unwrap_or(&[])
        .iter()
        .map(|v| v.filter(|v| v.is_finite()))
}

fn xy_pairs(dataset: &Dataset, x: &str, y: &str) -> Vec<[f64; 2]> {
    finite_column(dataset, x)
        .zip(finite_column(dataset, y))
        .filter_map(|(x, y)| Some([x?, y?]))
        .collect()
}

/// Build the plot data for `request` from the (filtered) dataset. Rows with
/// a missing or infinite value in a plotted column are skipped.
pub fn chart_series(request: &ChartRequest, dataset: &Dataset, options: &SeriesOptions) -> ChartSeries {
    match (request.kind, request.y.as_deref()) {
        (ChartKind::Scatter, Some(y)) => ChartSeries::Scatter(xy_pairs(dataset, &request.x, y)),
        (ChartKind::Line, Some(y)) => {
            ChartSeries::Line(mean_by_x(xy_pairs(dataset, &request.x, y)))
        }
        (ChartKind::Histogram, _) => {
            let values: Vec<f64> = finite_column(dataset, &request.x).flatten().collect();
            ChartSeries::Histogram(histogram(&values, options))
        }
        (_, None) => ChartSeries::Line(Vec::new()),
    }
}

/// Sort by x and replace repeated x values with one point at the mean y.
fn mean_by_x(mut points: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    points.sort_by(|a, b| a[0].total_cmp(&b[0]));

    let mut out: Vec<[f64; 2]> = Vec::new();
    let mut run = 0usize;
    for [x, y] in points {
        match out.last_mut() {
            Some(last) if last[0] == x => {
                run += 1;
                last[1] += (y - last[1]) / run as f64;
            }
            _ => {
                run = 1;
                out.push([x, y]);
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Histogram + KDE
// ---------------------------------------------------------------------------

/// Bin `values` using the smaller of the Sturges and Freedman–Diaconis bin
/// widths (Sturges alone when the IQR is zero), at most `max_bins` bins.
pub fn histogram(values: &[f64], options: &SeriesOptions) -> Histogram {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Histogram::default();
    };
    let n = sorted.len();

    if min == max {
        return Histogram {
            bins: vec![HistogramBin {
                start: min - 0.5,
                end: max + 0.5,
                count: n,
            }],
            kde: Vec::new(),
        };
    }

    let range = max - min;
    let sturges = range / ((n as f64).log2() + 1.0);
    let iqr = match (quantile_sorted(&sorted, 0.75), quantile_sorted(&sorted, 0.25)) {
        (Some(q3), Some(q1)) => q3 - q1,
        _ => 0.0,
    };
    let fd = 2.0 * iqr / (n as f64).cbrt();
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

    let bin_count = ((range / width).ceil() as usize).clamp(1, options.max_bins.max(1));
    let bin_width = range / bin_count as f64;

    let mut counts = vec![0usize; bin_count];
    for v in &sorted {
        let index = (((v - min) / bin_width) as usize).min(bin_count - 1);
        counts[index] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * bin_width,
            end: if i + 1 == bin_count {
                max
            } else {
                min + (i + 1) as f64 * bin_width
            },
            count,
        })
        .collect();

    Histogram {
        bins,
        kde: kde_curve(&sorted, min, max, bin_width, options.kde_points),
    }
}

/// Gaussian KDE with Scott's bandwidth, sampled over `[min, max]` and scaled
/// by `n * bin_width` so it lines up with the bin counts.
fn kde_curve(values: &[f64], min: f64, max: f64, bin_width: f64, points: usize) -> Vec<[f64; 2]> {
    let n = values.len() as f64;
    let Some(std) = sample_std(values).filter(|s| *s > 0.0) else {
        return Vec::new();
    };
    let bandwidth = std * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n * bin_width;

    let points = points.max(2);
    let step = (max - min) / (points - 1) as f64;
    (0..points)
        .map(|i| {
            let x = min + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classify::classify_columns;
    use crate::data::loader::load;

    fn energy() -> Dataset {
        load(b"building_type,kwh,hour\nOffice,120,1\nOffice,140,2\nResidential,30,1\n").unwrap()
    }

    #[test]
    fn numeric_axes_build_a_request() {
        let c = classify_columns(&energy());
        let r = build_chart_request(&c, "kwh", Some("hour"), ChartKind::Line).unwrap();
        assert_eq!(r.x, "kwh");
        assert_eq!(r.y.as_deref(), Some("hour"));
        assert_eq!(r.title(), "Line Chart of hour vs kwh");
    }

    #[test]
    fn categorical_or_unknown_axis_is_rejected() {
        let c = classify_columns(&energy());
        let err = build_chart_request(&c, "building_type", Some("hour"), ChartKind::Line).unwrap_err();
        assert!(
            matches!(err, DashboardError::InvalidSelection { ref column, .. } if column == "building_type")
        );
        let err = build_chart_request(&c, "kwh", Some("nope"), ChartKind::Scatter).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidSelection { .. }));
        assert!(build_chart_request(&c, "kwh", None, ChartKind::Scatter).is_err());
    }

    #[test]
    fn unselected_axis_is_named_in_the_error() {
        let c = classify_columns(&energy());
        let err = build_chart_request(&c, "kwh", None, ChartKind::Line).unwrap_err();
        assert!(matches!(err, DashboardError::MissingAxis { axis: "y-axis" }));
        assert_eq!(err.to_string(), "No y-axis column selected");

        match resolve_chart_request(&c, None, Some("hour"), ChartKind::Line) {
            ChartResolution::Ready { request, warning } => {
                assert_eq!(request.x, "kwh");
                let warning = warning.unwrap();
                assert!(warning.starts_with("No x-axis column selected; showing"));
                assert!(!warning.contains("''"));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn histogram_ignores_y() {
        let c = classify_columns(&energy());
        let r = build_chart_request(&c, "kwh", Some("building_type"), ChartKind::Histogram).unwrap();
        assert_eq!(r.y, None);
        assert_eq!(r.title(), "Histogram of kwh");
        assert_eq!(r.y_label(), "Count");
    }

    #[test]
    fn stale_selection_falls_back_to_first_numeric_columns() {
        let c = classify_columns(&energy());
        let res = resolve_chart_request(&c, Some("old_col"), Some("hour"), ChartKind::Scatter);
        match res {
            ChartResolution::Ready { request, warning } => {
                assert_eq!(request.x, "kwh");
                assert_eq!(request.y.as_deref(), Some("hour"));
                assert!(warning.unwrap().contains("old_col"));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn chart_is_withheld_without_enough_numeric_columns() {
        let ds = load(b"site,kwh\na,1\nb,2\n").unwrap();
        let c = classify_columns(&ds);
        assert!(matches!(
            resolve_chart_request(&c, Some("kwh"), Some("kwh2"), ChartKind::Line),
            ChartResolution::Withheld { .. }
        ));
        let hist = resolve_chart_request(&c, Some("kwh"), None, ChartKind::Histogram);
        assert_eq!(hist.request().map(|r| r.x.as_str()), Some("kwh"));
    }

    #[test]
    fn line_series_is_sorted_mean_per_x() {
        let ds = load(b"hour,kwh\n2,5\n1,10\n1,20\n3,\n").unwrap();
        let request = ChartRequest {
            x: "hour".into(),
            y: Some("kwh".into()),
            kind: ChartKind::Line,
        };
        assert_eq!(
            chart_series(&request, &ds, &SeriesOptions::default()),
            ChartSeries::Line(vec![[1.0, 15.0], [2.0, 5.0]])
        );
    }

    #[test]
    fn scatter_series_keeps_row_order_and_skips_missing() {
        let ds = load(b"hour,kwh\n2,5\n,7\n1,10\n").unwrap();
        let request = ChartRequest {
            x: "hour".into(),
            y: Some("kwh".into()),
            kind: ChartKind::Scatter,
        };
        assert_eq!(
            chart_series(&request, &ds, &SeriesOptions::default()),
            ChartSeries::Scatter(vec![[2.0, 5.0], [1.0, 10.0]])
        );
    }

    #[test]
    fn all_missing_axis_gives_empty_series() {
        let ds = load(b"hour,kwh\n,\n,\n").unwrap();
        let request = ChartRequest {
            x: "hour".into(),
            y: Some("kwh".into()),
            kind: ChartKind::Line,
        };
        assert!(chart_series(&request, &ds, &SeriesOptions::default()).is_empty());
    }

    #[test]
    fn histogram_uses_auto_bin_width() {
        let values = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 5.0];
        let h = histogram(&values, &SeriesOptions::default());
        let counts: Vec<usize> = h.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 3, 2, 1]);
        assert_eq!(h.bins.first().unwrap().start, 1.0);
        assert_eq!(h.bins.last().unwrap().end, 5.0);
        assert_eq!(h.kde.len(), 200);
        assert!(h.kde.iter().all(|[_, y]| *y > 0.0));
    }

    #[test]
    fn histogram_respects_bin_cap() {
        let values: Vec<f64> = (0..1000).map(f64::from).collect();
        let options = SeriesOptions {
            max_bins: 4,
            kde_points: 10,
        };
        let h = histogram(&values, &options);
        assert_eq!(h.bins.len(), 4);
        assert_eq!(h.bins.iter().map(|b| b.count).sum::<usize>(), 1000);
        assert_eq!(h.kde.len(), 10);
    }

    #[test]
    fn constant_values_make_one_bin_without_kde() {
        let h = histogram(&[3.0, 3.0, 3.0], &SeriesOptions::default());
        assert_eq!(
            h.bins,
            vec![HistogramBin {
                start: 2.5,
                end: 3.5,
                count: 3
            }]
        );
        assert!(h.kde.is_empty());
        assert!(histogram(&[], &SeriesOptions::default()).bins.is_empty());
    }
}
