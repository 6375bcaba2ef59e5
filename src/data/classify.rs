use super::model::{Column, ColumnData, ColumnKind, Dataset};

// ---------------------------------------------------------------------------
// Type inference – run once per column right after parsing
// ---------------------------------------------------------------------------

/// Parse a cell as a number. Surrounding whitespace is allowed; NaN is not a
/// number here because NaN spellings are missing-value markers.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Turn the raw text cells of one column into a typed [`Column`].
///
/// The column is numeric iff every present cell parses as a number; missing
/// cells are ignored for the decision and stay missing in the result.
pub fn infer_column(name: String, cells: Vec<Option<String>>) -> Column {
    let numbers: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(raw) => parse_number(raw).map(Some),
        })
        .collect();
    let Some(values) = numbers else {
        return Column::categorical(name, cells);
    };

    let integral = cells
        .iter()
        .flatten()
        .all(|raw| raw.trim().parse::<i64>().is_ok());
    Column {
        name,
        data: ColumnData::Numeric { values, integral },
    }
}

// ---------------------------------------------------------------------------
// ColumnClassification – numeric / categorical partition of a dataset
// ---------------------------------------------------------------------------

/// Column names split by kind, each list in dataset order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnClassification {
    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        if self.numeric.iter().any(|c| c == column) {
            Some(ColumnKind::Numeric)
        } else if self.categorical.iter().any(|c| c == column) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.kind_of(column) == Some(ColumnKind::Numeric)
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.kind_of(column) == Some(ColumnKind::Categorical)
    }

    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition the columns of `dataset` by their inferred kind.
pub fn classify_columns(dataset: &Dataset) -> ColumnClassification {
    let mut classification = ColumnClassification::default();
    for column in dataset.columns() {
        match column.kind() {
            ColumnKind::Numeric => classification.numeric.push(column.name.clone()),
            ColumnKind::Categorical => classification.categorical.push(column.name.clone()),
        }
    }
    classification
}
