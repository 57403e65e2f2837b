//! Per-circuit penalty cost evaluation.

use crate::core::{Metric, PerMetric, Timestamp};
use crate::telemetry::{count_for_metric, BreachEvent, CircuitRow};
use crate::vendor::{UncostedReason, VendorConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How one metric was evaluated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MetricOutcome {
    /// Value at or below threshold
    Compliant,
    /// Breach priced by the metric's rule
    Costed { amount: f64 },
    /// Breach with no attributable cost
    Uncosted { reason: UncostedReason },
}

impl MetricOutcome {
    /// Monetary effect of the outcome.
    pub fn cost(&self) -> f64 {
        match self {
            MetricOutcome::Costed { amount } => *amount,
            MetricOutcome::Compliant | MetricOutcome::Uncosted { .. } => 0.0,
        }
    }

    /// Whether the metric exceeded its threshold.
    pub fn is_breach(&self) -> bool {
        !matches!(self, MetricOutcome::Compliant)
    }
}

/// A costed breach in a breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostEvent {
    /// Snapshot time of the evaluated circuit
    #[serde(with = "crate::core::iso_millis")]
    pub timestamp: Timestamp,
    pub metric: Metric,
    pub value: f64,
    pub cost: f64,
}

/// Cost of one circuit evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    /// Sum of `by_metric`
    pub total: f64,
    pub by_metric: PerMetric<f64>,
    /// One entry per metric with a cost above zero, in metric order
    pub events: Vec<CostEvent>,
    pub outcomes: BTreeMap<Metric, MetricOutcome>,
}

impl CostBreakdown {
    /// Outcome for a metric.
    pub fn outcome(&self, metric: Metric) -> Option<&MetricOutcome> {
        self.outcomes.get(&metric)
    }

    /// Whether no metric exceeded its threshold.
    pub fn is_compliant(&self) -> bool {
        self.outcomes.values().all(|o| !o.is_breach())
    }

    /// Metrics that breached without an attributable cost.
    pub fn uncosted(&self) -> Vec<(Metric, &UncostedReason)> {
        self.outcomes
            .iter()
            .filter_map(|(metric, outcome)| match outcome {
                MetricOutcome::Uncosted { reason } => Some((*metric, reason)),
                _ => None,
            })
            .collect()
    }
}

/// Evaluate one metric of a circuit.
///
/// Only the live snapshot decides whether the metric is in breach; history
/// only feeds the breach-count formula.
pub fn evaluate_metric(
    circuit: &CircuitRow,
    vendor: &VendorConfig,
    events: &[BreachEvent],
    metric: Metric,
) -> MetricOutcome {
    let value = circuit.value(metric);
    let threshold = vendor.threshold(metric);

    let breached = value > threshold;
    if !breached {
        return MetricOutcome::Compliant;
    }

    let Some(rule) = vendor.rule(metric) else {
        return MetricOutcome::Uncosted {
            reason: UncostedReason::NoRule,
        };
    };

    let breach_count = count_for_metric(events, metric);
    match rule
        .compile()
        .and_then(|policy| policy.evaluate(value, threshold, breach_count))
    {
        Ok(amount) => MetricOutcome::Costed { amount },
        Err(reason) => MetricOutcome::Uncosted { reason },
    }
}

/// Compute the penalty costs of a circuit against its vendor's SLA.
pub fn compute_costs_for_circuit(
    circuit: &CircuitRow,
    vendor: &VendorConfig,
    events: &[BreachEvent],
) -> CostBreakdown {
    let mut by_metric = PerMetric::<f64>::default();
    let mut cost_events = Vec::new();
    let mut outcomes = BTreeMap::new();

    for metric in Metric::ALL {
        let outcome = evaluate_metric(circuit, vendor, events, metric);

        if let MetricOutcome::Uncosted { reason } = &outcome {
            tracing::debug!(
                circuit_id = %circuit.circuit_id,
                vendor_id = %vendor.vendor_id,
                metric = %metric,
                reason = reason.code(),
                "Breach carries no cost"
            );
        }

        let cost = outcome.cost();
        *by_metric.get_mut(metric) = cost;

        if cost > 0.0 {
            cost_events.push(CostEvent {
                timestamp: circuit.last_updated,
                metric,
                value: circuit.value(metric),
                cost,
            });
        }

        outcomes.insert(metric, outcome);
    }

    CostBreakdown {
        total: by_metric.sum(),
        by_metric,
        events: cost_events,
        outcomes,
    }
}
