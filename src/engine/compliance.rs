//! Aggregate compliance.

use crate::core::Metric;
use crate::telemetry::CircuitRow;
use crate::vendor::VendorConfig;

/// Whether every KPI of the circuit is at or below the vendor's threshold.
///
/// Independent of penalty rules: a breach with no rule is still non-compliant.
pub fn is_circuit_compliant(circuit: &CircuitRow, vendor: &VendorConfig) -> bool {
    Metric::ALL
        .into_iter()
        .all(|metric| circuit.value(metric) <= vendor.threshold(metric))
}

/// Rounded share of compliant circuits, 0..=100. An empty list is 100.
///
/// Rounds half away from zero, so 12.5% reports as 13.
pub fn calculate_compliance_percent(circuits: &[CircuitRow], vendor: &VendorConfig) -> u8 {
    compliance_percent_of(circuits.iter(), vendor)
}

pub(crate) fn compliance_percent_of<'a>(
    circuits: impl IntoIterator<Item = &'a CircuitRow>,
    vendor: &VendorConfig,
) -> u8 {
    let (compliant, total) = circuits.into_iter().fold((0usize, 0usize), |(ok, n), c| {
        (ok + usize::from(is_circuit_compliant(c, vendor)), n + 1)
    });
    percent(compliant, total)
}

/// Rounded percentage of `part` in `total`; 100 when `total` is zero.
pub(crate) fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (part as f64 / total as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendor::KpiThresholds;

    fn vendor() -> VendorConfig {
        VendorConfig::new("test", "Test", KpiThresholds::new(100.0, 5.0, 0.5))
    }

    fn circuit(latency: f64, jitter: f64, frame_loss: f64) -> CircuitRow {
        CircuitRow::new("TEST-001", "test", latency, jitter, frame_loss)
    }

    #[test]
    fn test_all_compliant() {
        let circuits = vec![circuit(80.0, 3.0, 0.2), circuit(90.0, 4.0, 0.3)];
        assert_eq!(calculate_compliance_percent(&circuits, &vendor()), 100);
    }

    #[test]
    fn test_all_non_compliant() {
        let circuits = vec![circuit(120.0, 7.0, 0.8), circuit(150.0, 8.0, 1.2)];
        assert_eq!(calculate_compliance_percent(&circuits, &vendor()), 0);
    }

    #[test]
    fn test_single_breach_is_non_compliant() {
        let circuits = vec![circuit(80.0, 3.0, 0.51), circuit(80.0, 5.01, 0.2)];
        assert_eq!(calculate_compliance_percent(&circuits, &vendor()), 0);
    }

    #[test]
    fn test_mixed() {
        let circuits = vec![circuit(80.0, 3.0, 0.2), circuit(120.0, 7.0, 0.8)];
        assert_eq!(calculate_compliance_percent(&circuits, &vendor()), 50);
    }

    #[test]
    fn test_empty_is_vacuously_compliant() {
        assert_eq!(calculate_compliance_percent(&[], &vendor()), 100);
    }

    #[test]
    fn test_threshold_inclusive() {
        let circuits = vec![circuit(100.0, 5.0, 0.5)];
        assert_eq!(calculate_compliance_percent(&circuits, &vendor()), 100);
    }

    #[test]
    fn test_rounding() {
        let ok = circuit(80.0, 3.0, 0.2);
        let bad = circuit(120.0, 3.0, 0.2);

        let thirds = vec![ok.clone(), bad.clone(), bad.clone()];
        assert_eq!(calculate_compliance_percent(&thirds, &vendor()), 33);

        let two_thirds = vec![ok.clone(), ok.clone(), bad.clone()];
        assert_eq!(calculate_compliance_percent(&two_thirds, &vendor()), 67);

        let mut eighths = vec![ok];
        eighths.extend(std::iter::repeat(bad).take(7));
        assert_eq!(calculate_compliance_percent(&eighths, &vendor()), 13);
    }

    #[test]
    fn test_uncosted_breach_counts_against_compliance() {
        // vendor() has no penalty rules at all
        let circuits = vec![circuit(101.0, 3.0, 0.2)];
        assert_eq!(calculate_compliance_percent(&circuits, &vendor()), 0);
    }

    #[test]
    fn test_nan_is_non_compliant() {
        let circuits = vec![circuit(f64::NAN, 3.0, 0.2)];
        assert_eq!(calculate_compliance_percent(&circuits, &vendor()), 0);
    }
}
