use std::collections::HashMap;

use super::model::Dataset;

/// Row labels of the numeric summary table, in display order.
pub const SUMMARY_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

// ---------------------------------------------------------------------------
// Numeric summary
// ---------------------------------------------------------------------------

/// Descriptive statistics of one numeric column, ignoring missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); `None` below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    pub fn from_values(column: &str, values: &[Option<f64>]) -> Self {
        let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
        sorted.sort_by(f64::total_cmp);

        NumericSummary {
            column: column.to_string(),
            count: sorted.len(),
            mean: mean(&sorted),
            std: sample_std(&sorted),
            min: sorted.first().copied(),
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }

    /// Values in [`SUMMARY_LABELS`] order.
    pub fn values(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }
}

/// Summaries of every numeric column, in dataset order.
pub fn summarize(dataset: &Dataset) -> Vec<NumericSummary> {
    dataset
        .columns()
        .iter()
        .filter_map(|c| {
            c.numeric_values()
                .map(|values| NumericSummary::from_values(&c.name, values))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical summary
// ---------------------------------------------------------------------------

/// count / unique / top / freq of one categorical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    /// Most frequent value; the earliest one wins a tie.
    pub top: Option<String>,
    pub freq: usize,
}

/// Summaries of every categorical column, in dataset order.
pub fn summarize_categorical(dataset: &Dataset) -> Vec<CategoricalSummary> {
    dataset
        .columns()
        .iter()
        .filter_map(|c| {
            let cells = c.text_values()?;
            let mut order: Vec<&str> = Vec::new();
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for value in cells.iter().flatten() {
                let n = counts.entry(value.as_str()).or_insert(0);
                if *n == 0 {
                    order.push(value.as_str());
                }
                *n += 1;
            }

            let mut top: Option<(&str, usize)> = None;
            for &value in &order {
                let n = counts[value];
                if top.map_or(true, |(_, best)| n > best) {
                    top = Some((value, n));
                }
            }

            Some(CategoricalSummary {
                column: c.name.clone(),
                count: cells.iter().flatten().count(),
                unique: order.len(),
                top: top.map(|(v, _)| v.to_string()),
                freq: top.map_or(0, |(_, n)| n),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers shared with chart preparation
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile of ascending `sorted` with linear interpolation between the
/// two closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let h = last as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let (a, b) = (sorted[lo], sorted[hi]);
    if lo == hi || a == b {
        return Some(a);
    }
    Some(a + (h - lo as f64) * (b - a))
}
