//! Circuit snapshots and breach history.
//!
//! Supplied by the telemetry source; the engine only reads them.

use crate::core::{now, Metric, Timestamp};
use crate::vendor::VendorConfig;
use serde::{Deserialize, Serialize};

/// Display state of a circuit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitStatus {
    #[default]
    Active,
    Degraded,
    Down,
}

/// Current KPI snapshot of one monitored circuit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitRow {
    pub circuit_id: String,
    pub vendor_id: String,
    #[serde(default)]
    pub sites: Vec<String>,
    #[serde(default)]
    pub bandwidth_mbps: u32,
    #[serde(default)]
    pub status: CircuitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "latency_ms")]
    pub latency_ms: f64,
    #[serde(rename = "jitter_ms")]
    pub jitter_ms: f64,
    #[serde(rename = "frameLoss_pct")]
    pub frame_loss_pct: f64,
    /// Metrics in breach as tallied by the source; informational
    #[serde(default)]
    pub breach_count: u32,
    /// Last cost reported by the source; recompute rather than trust
    #[serde(rename = "costUSD", default)]
    pub cost_usd: f64,
    #[serde(with = "crate::core::iso_millis")]
    pub last_updated: Timestamp,
}

impl CircuitRow {
    /// Create a snapshot taken now.
    pub fn new(
        circuit_id: &str,
        vendor_id: &str,
        latency_ms: f64,
        jitter_ms: f64,
        frame_loss_pct: f64,
    ) -> Self {
        Self {
            circuit_id: circuit_id.to_string(),
            vendor_id: vendor_id.to_string(),
            sites: Vec::new(),
            bandwidth_mbps: 1000,
            status: CircuitStatus::Active,
            region: None,
            latency_ms,
            jitter_ms,
            frame_loss_pct,
            breach_count: 0,
            cost_usd: 0.0,
            last_updated: now(),
        }
    }

    /// Set the endpoint sites.
    pub fn with_sites(mut self, sites: &[&str]) -> Self {
        self.sites = sites.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set region.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Set status.
    pub fn with_status(mut self, status: CircuitStatus) -> Self {
        self.status = status;
        self
    }

    /// Set bandwidth.
    pub fn with_bandwidth(mut self, mbps: u32) -> Self {
        self.bandwidth_mbps = mbps;
        self
    }

    /// Set snapshot time.
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.last_updated = timestamp;
        self
    }

    /// Measured value of a metric.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Latency => self.latency_ms,
            Metric::Jitter => self.jitter_ms,
            Metric::FrameLoss => self.frame_loss_pct,
        }
    }

    /// Metrics strictly above the vendor's thresholds.
    pub fn breached_metrics(&self, vendor: &VendorConfig) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| self.value(*m) > vendor.threshold(*m))
            .collect()
    }

    /// Live breach tally against the vendor's thresholds.
    pub fn breaches(&self, vendor: &VendorConfig) -> u32 {
        self.breached_metrics(vendor).len() as u32
    }
}

/// One historical SLA breach.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreachEvent {
    pub id: String,
    pub circuit_id: String,
    pub vendor_id: String,
    pub metric: Metric,
    pub threshold: f64,
    pub measured_value: f64,
    /// Cost computed when the breach was recorded
    #[serde(rename = "costUSD")]
    pub cost_usd: f64,
    #[serde(with = "crate::core::iso_millis")]
    pub timestamp: Timestamp,
}

impl BreachEvent {
    /// Create a breach event recorded now with a fresh id.
    pub fn new(circuit_id: &str, vendor_id: &str, metric: Metric, threshold: f64, measured_value: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            circuit_id: circuit_id.to_string(),
            vendor_id: vendor_id.to_string(),
            metric,
            threshold,
            measured_value,
            cost_usd: 0.0,
            timestamp: now(),
        }
    }

    /// Set the recorded cost.
    pub fn with_cost(mut self, cost_usd: f64) -> Self {
        self.cost_usd = cost_usd;
        self
    }

    /// Set event time.
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Number of events recorded for a metric.
pub fn count_for_metric(events: &[BreachEvent], metric: Metric) -> usize {
    events.iter().filter(|e| e.metric == metric).count()
}
