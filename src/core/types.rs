//! Common types shared by the vendor, telemetry and engine modules.

use serde::{Deserialize, Serialize};

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// RFC 3339 in UTC with millisecond precision (`2024-03-01T12:00:00.000Z`).
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Serde adapter writing timestamps through [`format_timestamp`].
///
/// Telemetry sources emit millisecond `Z` timestamps; exports must give
/// them back in the same shape.
pub mod iso_millis {
    use super::{format_timestamp, Timestamp};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(timestamp: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(timestamp))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        Timestamp::deserialize(deserializer)
    }

    /// Optional timestamps.
    pub mod option {
        use crate::core::types::{format_timestamp, Timestamp};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            timestamp: &Option<Timestamp>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match timestamp {
                Some(timestamp) => serializer.serialize_some(&format_timestamp(timestamp)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Timestamp>, D::Error> {
            Option::<Timestamp>::deserialize(deserializer)
        }
    }
}

/// A circuit KPI covered by vendor SLAs.
///
/// Serialized with the names used for penalty rules and breach events
/// (`latency`, `jitter`, `frameLoss`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// Round-trip latency, milliseconds
    Latency,
    /// Jitter, milliseconds
    Jitter,
    /// Frame loss, percent
    FrameLoss,
}

impl Metric {
    /// All metrics in evaluation order.
    pub const ALL: [Metric; 3] = [Metric::Latency, Metric::Jitter, Metric::FrameLoss];

    /// Rule/event name of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Latency => "latency",
            Metric::Jitter => "jitter",
            Metric::FrameLoss => "frameLoss",
        }
    }

    /// Field name of the metric in snapshots and threshold tables.
    pub fn field_name(&self) -> &'static str {
        match self {
            Metric::Latency => "latency_ms",
            Metric::Jitter => "jitter_ms",
            Metric::FrameLoss => "frameLoss_pct",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value per metric.
///
/// Used for cost and breach tallies where all three metrics are always present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerMetric<T> {
    pub latency: T,
    pub jitter: T,
    #[serde(rename = "frameLoss")]
    pub frame_loss: T,
}

impl<T: Copy> PerMetric<T> {
    /// Get the value for a metric.
    pub fn get(&self, metric: Metric) -> T {
        match metric {
            Metric::Latency => self.latency,
            Metric::Jitter => self.jitter,
            Metric::FrameLoss => self.frame_loss,
        }
    }

    /// Get a mutable reference to the value for a metric.
    pub fn get_mut(&mut self, metric: Metric) -> &mut T {
        match metric {
            Metric::Latency => &mut self.latency,
            Metric::Jitter => &mut self.jitter,
            Metric::FrameLoss => &mut self.frame_loss,
        }
    }
}

impl PerMetric<f64> {
    /// Sum of the three values, in metric order.
    pub fn sum(&self) -> f64 {
        self.latency + self.jitter + self.frame_loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_serde_names() {
        let json = serde_json::to_string(&Metric::FrameLoss).unwrap();
        assert_eq!(json, "\"frameLoss\"");

        let parsed: Metric = serde_json::from_str("\"latency\"").unwrap();
        assert_eq!(parsed, Metric::Latency);
    }

    #[test]
    fn test_metric_field_names() {
        assert_eq!(Metric::Latency.field_name(), "latency_ms");
        assert_eq!(Metric::FrameLoss.field_name(), "frameLoss_pct");
        assert_eq!(Metric::Jitter.to_string(), "jitter");
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "iso_millis")]
        at: Timestamp,
        #[serde(default, with = "iso_millis::option")]
        done: Option<Timestamp>,
    }

    #[test]
    fn test_timestamps_keep_millisecond_shape() {
        let json = r#"{"at":"2024-03-01T12:00:00.000Z","done":"2024-03-01T12:00:05.250Z"}"#;
        let parsed: Stamped = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), json);

        let bare: Stamped = serde_json::from_str(r#"{"at":"2024-03-01T12:00:00Z","done":null}"#).unwrap();
        assert_eq!(
            serde_json::to_string(&bare).unwrap(),
            r#"{"at":"2024-03-01T12:00:00.000Z","done":null}"#
        );
    }

    #[test]
    fn test_sub_millisecond_precision_dropped() {
        let precise: Timestamp = "2024-03-01T12:00:00.123456789Z".parse().unwrap();
        assert_eq!(format_timestamp(&precise), "2024-03-01T12:00:00.123Z");
        assert!(format_timestamp(&now()).ends_with('Z'));
        assert_eq!(format_timestamp(&now()).len(), 24);
    }

    #[test]
    fn test_per_metric_access() {
        let mut costs = PerMetric::<f64>::default();
        *costs.get_mut(Metric::Jitter) += 60.0;
        *costs.get_mut(Metric::Latency) += 10.0;

        assert_eq!(costs.get(Metric::Jitter), 60.0);
        assert_eq!(costs.sum(), 70.0);
    }
}
