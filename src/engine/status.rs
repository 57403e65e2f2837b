//! Visual severity bands for KPI values.
//!
//! Independent of cost: a value at its threshold is amber here but is not
//! charged a penalty.

use crate::core::{Metric, PerMetric};
use crate::telemetry::CircuitRow;
use crate::vendor::VendorConfig;
use serde::{Deserialize, Serialize};

/// Default width of the amber band above a threshold, as a fraction.
pub const DEFAULT_NEAR_THRESHOLD_MARGIN: f64 = 0.1;

/// Severity of a KPI value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    /// Below threshold
    #[default]
    Green,
    /// At threshold or within the margin above it
    Amber,
    /// At or beyond the margin
    Red,
}

/// Classify a value against its threshold.
pub fn get_metric_status(value: f64, threshold: f64, near_threshold_margin: f64) -> MetricStatus {
    if value < threshold {
        return MetricStatus::Green;
    }
    if value < threshold * (1.0 + near_threshold_margin) {
        return MetricStatus::Amber;
    }
    MetricStatus::Red
}

/// Classify every KPI of a circuit.
pub fn circuit_statuses(
    circuit: &CircuitRow,
    vendor: &VendorConfig,
    near_threshold_margin: f64,
) -> PerMetric<MetricStatus> {
    let mut statuses = PerMetric::<MetricStatus>::default();
    for metric in Metric::ALL {
        *statuses.get_mut(metric) = get_metric_status(
            circuit.value(metric),
            vendor.threshold(metric),
            near_threshold_margin,
        );
    }
    statuses
}
