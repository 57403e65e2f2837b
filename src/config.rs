//! Settings document.
//!
//! One JSON document configures the engine, logging and the vendor
//! catalogue.

use crate::core::Result;
use crate::engine::EngineConfig;
use crate::monitoring::LoggerConfig;
use crate::vendor::{default_vendors, RuleMode, VendorConfig, VendorRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Engine tunables
    pub engine: EngineConfig,
    /// Logging
    pub logging: LoggerConfig,
    /// Treatment of uncompilable penalty rules at load
    pub rule_mode: RuleMode,
    /// Vendor catalogue; the built-in catalogue when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendors: Option<Vec<VendorConfig>>,
}

impl Settings {
    /// Parse settings from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.engine.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Vendors to register.
    pub fn vendor_catalogue(&self) -> Vec<VendorConfig> {
        self.vendors.clone().unwrap_or_else(default_vendors)
    }

    /// Build a registry from the catalogue, honouring the rule mode.
    pub fn build_registry(&self) -> Result<VendorRegistry> {
        let registry = VendorRegistry::new();
        for vendor in self.vendor_catalogue() {
            registry.register_checked(vendor, self.rule_mode)?;
        }
        tracing::info!(vendors = registry.len(), "Vendor registry loaded");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::monitoring::LogLevel;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());

        let registry = settings.build_registry().unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.exists("verizon"));
    }

    #[test]
    fn test_full_document() {
        let json = r#"{
            "engine": { "nearThresholdMargin": 0.2 },
            "logging": { "level": "warn" },
            "ruleMode": "strict",
            "vendors": [{
                "vendorId": "acme",
                "name": "Acme",
                "currency": "USD",
                "kpiThresholds": { "latency_ms": 80, "jitter_ms": 3, "frameLoss_pct": 0.2 },
                "penaltyRules": {
                    "latency": { "type": "declarative", "unitCost": 1, "calc": "over_threshold_ms * unitCost" }
                }
            }]
        }"#;

        let settings = Settings::from_json_str(json).unwrap();
        assert_eq!(settings.engine.near_threshold_margin, 0.2);
        assert_eq!(settings.logging.level, LogLevel::Warn);
        assert_eq!(settings.rule_mode, RuleMode::Strict);

        let registry = settings.build_registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("att").is_none());
    }

    #[test]
    fn test_strict_rejects_bad_rule() {
        let json = r#"{
            "ruleMode": "strict",
            "vendors": [{
                "vendorId": "acme",
                "name": "Acme",
                "currency": "USD",
                "kpiThresholds": { "latency_ms": 80, "jitter_ms": 3, "frameLoss_pct": 0.2 },
                "penaltyRules": { "jitter": { "unitCost": 1, "calc": "minutes_down * unitCost" } }
            }]
        }"#;

        let settings = Settings::from_json_str(json).unwrap();
        assert!(matches!(
            settings.build_registry(),
            Err(Error::InvalidPenaltyRule { .. })
        ));
    }

    #[test]
    fn test_invalid_margin_rejected() {
        let result = Settings::from_json_str(r#"{ "engine": { "nearThresholdMargin": -1 } }"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Settings::from_file("/nonexistent/circuit-sla.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
