//! Telemetry Module
//!
//! Data supplied by the telemetry source:
//! - Circuit KPI snapshots and breach history
//! - Circuit filters
//! - On-demand active test results

pub mod circuit;
pub mod filter;

pub use active_test::{ActiveTestResult, TestMeasurements, TestStatus};
pub use circuit::{count_for_metric, BreachEvent, CircuitRow, CircuitStatus};
pub use filter::CircuitFilter;
