//! Circuit query filters.

use crate::telemetry::circuit::{CircuitRow, CircuitStatus};
use serde::{Deserialize, Serialize};

/// Filter for selecting circuits.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitFilter {
    /// Filter by vendor
    pub vendor_id: Option<String>,
    /// Filter by region
    pub region: Option<String>,
    /// Filter by status
    pub status: Option<CircuitStatus>,
    /// Filter by exact bandwidth
    pub bandwidth_mbps: Option<u32>,
    /// Case-insensitive match on circuit id or any site
    pub search_term: Option<String>,
}

impl CircuitFilter {
    /// Create a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by vendor.
    pub fn by_vendor(mut self, vendor_id: &str) -> Self {
        self.vendor_id = Some(vendor_id.to_string());
        self
    }

    /// Filter by region.
    pub fn by_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Filter by status.
    pub fn by_status(mut self, status: CircuitStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by bandwidth.
    pub fn by_bandwidth(mut self, mbps: u32) -> Self {
        self.bandwidth_mbps = Some(mbps);
        self
    }

    /// Filter by search term.
    pub fn search(mut self, term: &str) -> Self {
        self.search_term = Some(term.to_string());
        self
    }

    /// Check if a circuit matches this filter.
    pub fn matches(&self, circuit: &CircuitRow) -> bool {
        if let Some(vendor_id) = &self.vendor_id {
            if &circuit.vendor_id != vendor_id {
                return false;
            }
        }

        if let Some(region) = &self.region {
            if circuit.region.as_ref() != Some(region) {
                return false;
            }
        }

        if let Some(status) = self.status {
            if circuit.status != status {
                return false;
            }
        }

        if let Some(mbps) = self.bandwidth_mbps {
            if circuit.bandwidth_mbps != mbps {
                return false;
            }
        }

        if let Some(term) = &self.search_term {
            let term = term.to_lowercase();
            let hit = circuit.circuit_id.to_lowercase().contains(&term)
                || circuit.sites.iter().any(|s| s.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        true
    }

    /// Matching circuits, in input order.
    pub fn apply<'a>(&self, circuits: &'a [CircuitRow]) -> Vec<&'a CircuitRow> {
        circuits.iter().filter(|c| self.matches(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> Vec<CircuitRow> {
        vec![
            CircuitRow::new("ATT-CKT-0001", "att", 80.0, 3.0, 0.2)
                .with_region("US-East")
                .with_sites(&["New York", "Boston"]),
            CircuitRow::new("ATT-CKT-0002", "att", 150.0, 8.0, 1.2)
                .with_region("EU-Central")
                .with_status(CircuitStatus::Degraded)
                .with_bandwidth(100)
                .with_sites(&["Frankfurt", "Amsterdam"]),
            CircuitRow::new("VERIZON-CKT-0001", "verizon", 70.0, 2.0, 0.1)
                .with_region("US-East")
                .with_sites(&["Chicago", "Dallas"]),
        ]
    }

    fn ids<'a>(rows: &[&'a CircuitRow]) -> Vec<&'a str> {
        rows.iter().map(|c| c.circuit_id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let circuits = fleet();
        assert_eq!(CircuitFilter::new().apply(&circuits).len(), 3);
    }

    #[test]
    fn test_vendor_and_region() {
        let circuits = fleet();
        let filter = CircuitFilter::new().by_vendor("att").by_region("US-East");
        assert_eq!(ids(&filter.apply(&circuits)), vec!["ATT-CKT-0001"]);
    }

    #[test]
    fn test_status_and_bandwidth() {
        let circuits = fleet();
        let filter = CircuitFilter::new()
            .by_status(CircuitStatus::Degraded)
            .by_bandwidth(100);
        assert_eq!(ids(&filter.apply(&circuits)), vec!["ATT-CKT-0002"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let circuits = fleet();
        assert_eq!(
            ids(&CircuitFilter::new().search("frank").apply(&circuits)),
            vec!["ATT-CKT-0002"]
        );
        assert_eq!(
            ids(&CircuitFilter::new().search("verizon-ckt").apply(&circuits)),
            vec!["VERIZON-CKT-0001"]
        );
    }

    #[test]
    fn test_region_filter_skips_unknown_region() {
        let circuits = vec![CircuitRow::new("X", "att", 1.0, 1.0, 0.0)];
        assert!(CircuitFilter::new().by_region("US-East").apply(&circuits).is_empty());
    }
}
