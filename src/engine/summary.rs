//! Vendor and fleet roll-ups.
//!
//! Breach tallies and costs are recomputed from live snapshots; the
//! `breachCount` and `costUSD` values stored on circuits are not used.

use crate::core::{Metric, PerMetric};
use crate::engine::compliance::{is_circuit_compliant, percent};
use crate::engine::cost::{compute_costs_for_circuit, CostBreakdown};
use crate::telemetry::{BreachEvent, CircuitRow};
use crate::vendor::VendorConfig;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;

/// Compliance and cost figures for one vendor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorKpis {
    pub vendor_id: String,
    pub circuit_count: usize,
    pub compliant_circuits: usize,
    pub compliance_percent: u8,
    pub total_breaches: u32,
    #[serde(rename = "totalCostUSD")]
    pub total_cost_usd: f64,
    pub breaches_by_metric: PerMetric<u32>,
    pub cost_by_metric: PerMetric<f64>,
}

/// Figures across every vendor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub compliance_percent: u8,
    pub circuit_count: usize,
    pub total_breaches: u32,
    #[serde(rename = "totalCostUSD")]
    pub total_cost_usd: f64,
    /// Circuits whose vendor was not supplied; excluded from every figure
    pub unresolved_circuits: usize,
    pub vendors: Vec<VendorKpis>,
}

/// A circuit with its freshly computed cost.
#[derive(Clone, Debug)]
pub struct CircuitCost<'a> {
    pub circuit: &'a CircuitRow,
    pub breakdown: CostBreakdown,
}

/// Group breach history by circuit.
fn events_by_circuit(events: &[BreachEvent]) -> HashMap<&str, Vec<BreachEvent>> {
    let mut grouped: HashMap<&str, Vec<BreachEvent>> = HashMap::new();
    for event in events {
        grouped
            .entry(event.circuit_id.as_str())
            .or_default()
            .push(event.clone());
    }
    grouped
}

fn costs_with_history(
    circuit: &CircuitRow,
    vendor: &VendorConfig,
    history: &HashMap<&str, Vec<BreachEvent>>,
) -> CostBreakdown {
    let events = history
        .get(circuit.circuit_id.as_str())
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    compute_costs_for_circuit(circuit, vendor, events)
}

fn summarize_grouped(
    vendor: &VendorConfig,
    circuits: &[CircuitRow],
    history: &HashMap<&str, Vec<BreachEvent>>,
) -> VendorKpis {
    let mut kpis = VendorKpis {
        vendor_id: vendor.vendor_id.clone(),
        circuit_count: 0,
        compliant_circuits: 0,
        compliance_percent: 100,
        total_breaches: 0,
        total_cost_usd: 0.0,
        breaches_by_metric: PerMetric::default(),
        cost_by_metric: PerMetric::default(),
    };

    for circuit in circuits.iter().filter(|c| c.vendor_id == vendor.vendor_id) {
        kpis.circuit_count += 1;
        if is_circuit_compliant(circuit, vendor) {
            kpis.compliant_circuits += 1;
        }

        for metric in circuit.breached_metrics(vendor) {
            *kpis.breaches_by_metric.get_mut(metric) += 1;
            kpis.total_breaches += 1;
        }

        let breakdown = costs_with_history(circuit, vendor, history);
        for metric in Metric::ALL {
            *kpis.cost_by_metric.get_mut(metric) += breakdown.by_metric.get(metric);
        }
        kpis.total_cost_usd += breakdown.total;
    }

    kpis.compliance_percent = percent(kpis.compliant_circuits, kpis.circuit_count);
    kpis
}

/// Summarize the circuits of one vendor.
///
/// Circuits of other vendors are ignored. Each circuit is costed with the
/// breach events recorded for it.
pub fn summarize_vendor(
    vendor: &VendorConfig,
    circuits: &[CircuitRow],
    events: &[BreachEvent],
) -> VendorKpis {
    summarize_grouped(vendor, circuits, &events_by_circuit(events))
}

/// Summarize a fleet, vendor by vendor in the order given.
pub fn summarize_fleet<V: Borrow<VendorConfig>>(
    vendors: &[V],
    circuits: &[CircuitRow],
    events: &[BreachEvent],
) -> FleetSummary {
    let history = events_by_circuit(events);
    let vendor_kpis: Vec<VendorKpis> = vendors
        .iter()
        .map(|v| summarize_grouped(v.borrow(), circuits, &history))
        .collect();

    let known: Vec<&str> = vendors.iter().map(|v| v.borrow().vendor_id.as_str()).collect();
    let unresolved_circuits = circuits
        .iter()
        .filter(|c| !known.contains(&c.vendor_id.as_str()))
        .count();

    if unresolved_circuits > 0 {
        tracing::warn!(unresolved_circuits, "Circuits reference unknown vendors");
    }

    let circuit_count = vendor_kpis.iter().map(|k| k.circuit_count).sum();
    let compliant: usize = vendor_kpis.iter().map(|k| k.compliant_circuits).sum();

    FleetSummary {
        compliance_percent: percent(compliant, circuit_count),
        circuit_count,
        total_breaches: vendor_kpis.iter().map(|k| k.total_breaches).sum(),
        total_cost_usd: vendor_kpis.iter().map(|k| k.total_cost_usd).sum(),
        unresolved_circuits,
        vendors: vendor_kpis,
    }
}

/// Costliest circuits first.
///
/// Zero-cost circuits are kept and fill the tail; ties keep input order.
/// Circuits with an unknown vendor cannot be priced and are skipped.
pub fn rank_by_cost<'a, V: Borrow<VendorConfig>>(
    circuits: &'a [CircuitRow],
    vendors: &[V],
    events: &[BreachEvent],
    limit: usize,
) -> Vec<CircuitCost<'a>> {
    let history = events_by_circuit(events);
    let lookup: HashMap<&str, &VendorConfig> = vendors
        .iter()
        .map(|v| (v.borrow().vendor_id.as_str(), v.borrow()))
        .collect();

    let mut ranked: Vec<CircuitCost<'a>> = circuits
        .iter()
        .filter_map(|circuit| {
            let vendor = lookup.get(circuit.vendor_id.as_str())?;
            let breakdown = costs_with_history(circuit, vendor, &history);
            Some(CircuitCost { circuit, breakdown })
        })
        .collect();

    ranked.sort_by(|a, b| b.breakdown.total.total_cmp(&a.breakdown.total));
    ranked.truncate(limit);
    ranked
}
