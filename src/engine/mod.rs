//! Penalty Evaluation Engine
//!
//! Pure functions over vendor configuration and circuit telemetry:
//! - Per-metric penalty costs
//! - Severity bands
//! - Compliance percentages and roll-ups
//!
//! Nothing here holds state or looks vendors up; callers pass resolved
//! configurations.

pub mod compliance;
pub mod config;
pub mod cost;
pub mod status;
pub mod summary;

pub use compliance::{calculate_compliance_percent, is_circuit_compliant};
pub use config::EngineConfig;
pub use cost::{compute_costs_for_circuit, evaluate_metric, CostBreakdown, CostEvent, MetricOutcome};
pub use status::{circuit_statuses, get_metric_status, MetricStatus, DEFAULT_NEAR_THRESHOLD_MARGIN};
pub use summary::{rank_by_cost, summarize_fleet, summarize_vendor, CircuitCost, FleetSummary, VendorKpis};
