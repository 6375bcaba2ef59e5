use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Filter selection: at most one chosen value per categorical column
// ---------------------------------------------------------------------------

/// What the user picked in one column's selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterChoice {
    /// No constraint on this column.
    All,
    Value(String),
}

impl fmt::Display for FilterChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterChoice::All => write!(f, "All"),
            FilterChoice::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Equality constraints keyed by categorical column name.
/// A column absent from the map is unfiltered ("All").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    constraints: BTreeMap<String, String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSelection::set`].
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.set(column, FilterChoice::Value(value.to_string()));
        self
    }

    /// Apply one selector change. Choosing `All` removes the constraint.
    pub fn set(&mut self, column: &str, choice: FilterChoice) {
        match choice {
            FilterChoice::All => {
                self.constraints.remove(column);
            }
            FilterChoice::Value(value) => {
                self.constraints.insert(column.to_string(), value);
            }
        }
    }

    pub fn choice(&self, column: &str) -> FilterChoice {
        self.constraints
            .get(column)
            .map(|v| FilterChoice::Value(v.clone()))
            .unwrap_or(FilterChoice::All)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.constraints
            .iter()
            .map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn clear(&mut self) {
        self.constraints.clear();
    }

    /// Drop constraints that no longer make sense for `dataset`: the column
    /// is gone or numeric, or the value does not occur in it.
    pub fn retain_valid(&mut self, dataset: &Dataset) {
        self.constraints.retain(|column, value| {
            dataset
                .column(column)
                .and_then(|c| c.text_values())
                .is_some_and(|cells| cells.iter().flatten().any(|v| *v == *value))
        });
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Unique present values of a categorical column, in first-occurrence order.
/// Empty for a numeric or unknown column.
pub fn distinct_values(dataset: &Dataset, column: &str) -> Vec<String> {
    let Some(cells) = dataset.column(column).and_then(|c| c.text_values()) else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for value in cells.iter().flatten() {
        if seen.insert(value.as_str()) {
            values.push(value.clone());
        }
    }
    values
}

/// Selector options for a column: `All` followed by each distinct value.
pub fn filter_choices(dataset: &Dataset, column: &str) -> Vec<FilterChoice> {
    std::iter::once(FilterChoice::All)
        .chain(
            distinct_values(dataset, column)
                .into_iter()
                .map(FilterChoice::Value),
        )
        .collect()
}

/// Return indices of rows that satisfy every constraint.
///
/// A row passes a constraint when its cell in that column is present and
/// equal to the chosen value. A constraint on a column that is absent or
/// numeric matches no row.
pub fn filtered_indices(dataset: &Dataset, filters: &FilterSelection) -> Vec<usize> {
    let mut constraints = Vec::with_capacity(filters.len());
    for (column, value) in filters.iter() {
        match dataset.column(column).and_then(|c| c.text_values()) {
            Some(cells) => constraints.push((cells, value)),
            None => return Vec::new(),
        }
    }

    (0..dataset.len())
        .filter(|&row| {
            constraints
                .iter()
                .all(|(cells, value)| cells[row].as_deref() == Some(*value))
        })
        .collect()
}

/// The rows of `dataset` matching all of `filters`, as a new dataset.
/// The source is never modified; an empty selection returns a copy of it.
pub fn apply_filters(dataset: &Dataset, filters: &FilterSelection) -> Dataset {
    if filters.is_empty() {
        return dataset.clone();
    }
    dataset.take_rows(&filtered_indices(dataset, filters))
}
