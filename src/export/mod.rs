//! Export Module
//!
//! Circuit cost exports:
//! - Comma-delimited text
//! - JSON

pub mod csv;
pub mod exporter;

pub use csv::to_delimited;
pub use exporter::{priced_row, CostExporter, ExportFormat};
