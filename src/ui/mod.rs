//! egui rendering of the dashboard: filter panel, tables and chart.

pub mod panels;
pub mod plot;
pub mod tables;
