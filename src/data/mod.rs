//! Data layer: typed dataset, loading, classification, filtering, summary
//! statistics and chart preparation.
//!
//! Architecture:
//! ```text
//!        .csv bytes
//!            │
//!            ▼
//!      ┌──────────┐
//!      │  loader  │  parse + infer column types once → Dataset
//!      └──────────┘
//!            │
//!            ▼
//!      ┌──────────┐      ┌──────────┐
//!      │ Dataset  │ ───► │ classify │  numeric / categorical partition
//!      └──────────┘      └──────────┘
//!            │                 │
//!            ▼                 │
//!      ┌──────────┐            │
//!      │  filter  │  FilterSelection → filtered Dataset
//!      └──────────┘            │
//!            │                 ▼
//!            │           ┌──────────┐
//!            └─────────► │  chart   │  ChartRequest → ChartSeries
//!                        └──────────┘
//! ```
//!
//! Every operation is a pure function of its arguments.

pub mod chart;
pub mod classify;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;

pub use chart::{
    build_chart_request, chart_series, resolve_chart_request, ChartKind, ChartRequest,
    ChartResolution, ChartSeries, SeriesOptions,
};
pub use classify::{classify_columns, ColumnClassification};
pub use error::{DashboardError, DataResult};
pub use filter::{apply_filters, distinct_values, FilterChoice, FilterSelection};
pub use loader::{load, load_file};
pub use model::{CellValue, Column, ColumnData, ColumnKind, Dataset};
pub use stats::{summarize, summarize_categorical, CategoricalSummary, NumericSummary};
