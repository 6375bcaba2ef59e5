//! Energy consumption dashboard: open a CSV file, filter it by categorical
//! columns and chart its numeric columns.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
