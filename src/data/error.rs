//! Error types for the data layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading a dataset or resolving user selections.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The input is not well-formed delimited text (empty, ragged rows,
    /// unreadable encoding).
    #[error("CSV parse error: {message}")]
    Parse { message: String },

    /// A selected axis column is missing or not numeric.
    #[error("Invalid selection '{column}': {reason}")]
    InvalidSelection { column: String, reason: String },

    /// An axis the chart needs has no column selected.
    #[error("No {axis} column selected")]
    MissingAxis { axis: &'static str },

    /// Reading the chosen file failed.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for data operations.
pub type DataResult<T> = Result<T, DashboardError>;

impl DashboardError {
    pub fn parse(message: impl Into<String>) -> Self {
        DashboardError::Parse {
            message: message.into(),
        }
    }

    pub fn invalid_selection(column: &str, reason: impl Into<String>) -> Self {
        DashboardError::InvalidSelection {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        let message = match err.kind() {
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => {
                let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
                format!("line {line}: expected {expected_len} fields, found {len}")
            }
            csv::ErrorKind::Utf8 { pos, err } => {
                let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
                format!("line {line}: field {} is not valid UTF-8", err.field() + 1)
            }
            _ => err.to_string(),
        };
        DashboardError::Parse { message }
    }
}
