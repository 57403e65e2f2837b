//! Engine configuration.

use crate::core::{Error, Result};
use crate::engine::status::DEFAULT_NEAR_THRESHOLD_MARGIN;
use serde::{Deserialize, Serialize};

fn default_margin() -> f64 {
    DEFAULT_NEAR_THRESHOLD_MARGIN
}

/// Tunables for evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Width of the amber band above each threshold, as a fraction
    #[serde(default = "default_margin")]
    pub near_threshold_margin: f64,
}

impl EngineConfig {
    /// Set the amber band width.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.near_threshold_margin = margin;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.near_threshold_margin.is_finite() || self.near_threshold_margin < 0.0 {
            return Err(Error::Config(format!(
                "nearThresholdMargin must be a non-negative number, got {}",
                self.near_threshold_margin
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            near_threshold_margin: DEFAULT_NEAR_THRESHOLD_MARGIN,
        }
    }
}
