//! Cost export.
//!
//! Serializes circuits with freshly computed costs for downstream tools.

use crate::core::Result;
use crate::engine::CostBreakdown;
use crate::export::csv::to_delimited;
use crate::telemetry::CircuitRow;
use serde::{Deserialize, Serialize};

/// Export format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-delimited text
    Csv,
    /// JSON array
    Json,
}

/// A circuit whose breach tally and cost come from an evaluation rather
/// than from the telemetry source.
pub fn priced_row(circuit: &CircuitRow, breakdown: &CostBreakdown) -> CircuitRow {
    let mut row = circuit.clone();
    row.breach_count = breakdown.outcomes.values().filter(|o| o.is_breach()).count() as u32;
    row.cost_usd = breakdown.total;
    row
}

/// Cost exporter.
pub struct CostExporter;

impl CostExporter {
    /// Export rows in the given format.
    pub fn export<T: Serialize>(rows: &[T], format: ExportFormat) -> Result<Vec<u8>> {
        match format {
            ExportFormat::Csv => Ok(to_delimited(rows)?.into_bytes()),
            ExportFormat::Json => Ok(serde_json::to_vec_pretty(rows)?),
        }
    }

    /// File name for an export.
    pub fn file_name(stem: &str, format: ExportFormat) -> String {
        match format {
            ExportFormat::Csv => format!("{}.csv", stem),
            ExportFormat::Json => format!("{}.json", stem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_costs_for_circuit;
    use crate::vendor::default_vendors;

    fn circuit() -> CircuitRow {
        let mut circuit = CircuitRow::new("ATT-CKT-0001", "att", 120.0, 3.0, 0.2)
            .with_sites(&["New York", "Boston"])
            .with_region("US-East")
            .at("2024-03-01T12:00:00Z".parse().unwrap());
        circuit.cost_usd = 999.0;
        circuit
    }

    #[test]
    fn test_priced_row_replaces_stored_cost() {
        let att = default_vendors().remove(0);
        let circuit = circuit();
        let breakdown = compute_costs_for_circuit(&circuit, &att, &[]);

        let row = priced_row(&circuit, &breakdown);
        assert_eq!(row.cost_usd, 10.0);
        assert_eq!(row.breach_count, 1);
        assert_eq!(row.circuit_id, circuit.circuit_id);
    }

    #[test]
    fn test_csv_export() {
        let att = default_vendors().remove(0);
        let circuit = circuit();
        let row = priced_row(&circuit, &compute_costs_for_circuit(&circuit, &att, &[]));

        let bytes = CostExporter::export(&[row], ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "circuitId,vendorId,sites,bandwidthMbps,status,region,latency_ms,jitter_ms,\
             frameLoss_pct,breachCount,costUSD,lastUpdated\n\
             ATT-CKT-0001,att,\"New York,Boston\",1000,active,US-East,120,3,0.2,1,10,\
             2024-03-01T12:00:00.000Z"
        );
    }

    #[test]
    fn test_csv_keeps_wire_values() {
        let json = r#"[{
            "circuitId": "C-1",
            "vendorId": "att",
            "sites": ["X"],
            "bandwidthMbps": 1000,
            "status": "active",
            "latency_ms": 80,
            "jitter_ms": 3,
            "frameLoss_pct": 0.2,
            "breachCount": 0,
            "costUSD": 0,
            "lastUpdated": "2024-03-01T12:00:00.000Z"
        }]"#;
        let mut rows: Vec<CircuitRow> = serde_json::from_str(json).unwrap();
        rows[0].latency_ms = f64::NAN;

        let bytes = CostExporter::export(&rows, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        // no region on the first row, so no region column
        assert_eq!(
            text,
            "circuitId,vendorId,sites,bandwidthMbps,status,latency_ms,jitter_ms,\
             frameLoss_pct,breachCount,costUSD,lastUpdated\n\
             C-1,att,X,1000,active,NaN,3,0.2,0,0,2024-03-01T12:00:00.000Z"
        );
    }

    #[test]
    fn test_json_export() {
        let bytes = CostExporter::export(&[circuit()], ExportFormat::Json).unwrap();
        let parsed: Vec<CircuitRow> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, vec![circuit()]);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            CostExporter::file_name("top-costly-circuits", ExportFormat::Csv),
            "top-costly-circuits.csv"
        );
    }
}
