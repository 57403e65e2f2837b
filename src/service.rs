//! SLA service.
//!
//! Resolves vendors from a registry and hands them to the engine. This is
//! where "vendor not found" surfaces; the engine never sees an id.

use crate::core::{PerMetric, Result};
use crate::engine::{
    calculate_compliance_percent, circuit_statuses, compute_costs_for_circuit, get_metric_status,
    rank_by_cost, summarize_fleet, summarize_vendor, CircuitCost, CostBreakdown, EngineConfig,
    FleetSummary, MetricStatus, VendorKpis,
};
use crate::export::{priced_row, CostExporter, ExportFormat};
use crate::telemetry::{BreachEvent, CircuitRow};
use crate::vendor::VendorRegistry;
use std::sync::Arc;

/// Registry-backed front end to the penalty engine.
pub struct SlaService {
    registry: Arc<VendorRegistry>,
    config: EngineConfig,
}

impl SlaService {
    /// Create a service over a registry.
    pub fn new(registry: Arc<VendorRegistry>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// The backing registry.
    pub fn registry(&self) -> &VendorRegistry {
        &self.registry
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cost a circuit against its own vendor.
    pub fn evaluate(&self, circuit: &CircuitRow, events: &[BreachEvent]) -> Result<CostBreakdown> {
        let vendor = self.registry.require(&circuit.vendor_id)?;
        Ok(compute_costs_for_circuit(circuit, &vendor, events))
    }

    /// Severity band of a value using the configured margin.
    pub fn status(&self, value: f64, threshold: f64) -> MetricStatus {
        get_metric_status(value, threshold, self.config.near_threshold_margin)
    }

    /// Severity bands of every KPI of a circuit.
    pub fn statuses(&self, circuit: &CircuitRow) -> Result<PerMetric<MetricStatus>> {
        let vendor = self.registry.require(&circuit.vendor_id)?;
        Ok(circuit_statuses(circuit, &vendor, self.config.near_threshold_margin))
    }

    /// Compliance of a vendor's circuits.
    pub fn compliance(&self, vendor_id: &str, circuits: &[CircuitRow]) -> Result<u8> {
        let vendor = self.registry.require(vendor_id)?;
        Ok(calculate_compliance_percent(circuits, &vendor))
    }

    /// Roll-up for one vendor.
    pub fn vendor_summary(
        &self,
        vendor_id: &str,
        circuits: &[CircuitRow],
        events: &[BreachEvent],
    ) -> Result<VendorKpis> {
        let vendor = self.registry.require(vendor_id)?;
        Ok(summarize_vendor(&vendor, circuits, events))
    }

    /// Roll-up across the active vendors.
    pub fn fleet_summary(&self, circuits: &[CircuitRow], events: &[BreachEvent]) -> FleetSummary {
        summarize_fleet(&self.registry.get_all(), circuits, events)
    }

    /// Costliest circuits of the active vendors.
    pub fn top_costly<'a>(
        &self,
        circuits: &'a [CircuitRow],
        events: &[BreachEvent],
        limit: usize,
    ) -> Vec<CircuitCost<'a>> {
        rank_by_cost(circuits, &self.registry.get_all(), events, limit)
    }

    /// Export circuits with fresh costs.
    ///
    /// Circuits whose vendor is unknown are exported as supplied.
    pub fn export(
        &self,
        circuits: &[CircuitRow],
        events: &[BreachEvent],
        format: ExportFormat,
    ) -> Result<Vec<u8>> {
        let rows: Vec<CircuitRow> = circuits
            .iter()
            .map(|circuit| {
                let history: Vec<BreachEvent> = events
                    .iter()
                    .filter(|e| e.circuit_id == circuit.circuit_id)
                    .cloned()
                    .collect();
                match self.registry.get(&circuit.vendor_id) {
                    Some(vendor) => {
                        priced_row(circuit, &compute_costs_for_circuit(circuit, &vendor, &history))
                    }
                    None => {
                        tracing::debug!(
                            circuit_id = %circuit.circuit_id,
                            vendor_id = %circuit.vendor_id,
                            "Exporting circuit without evaluation"
                        );
                        circuit.clone()
                    }
                }
            })
            .collect();

        CostExporter::export(&rows, format)
    }
}
