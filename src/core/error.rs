//! Error types for circuit SLA evaluation.
//!
//! The penalty engine itself never fails; these errors come from the edges
//! around it (configuration loading, vendor lookup, export and logging setup).

use thiserror::Error;

/// Result type alias for circuit SLA operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur around SLA evaluation.
#[derive(Error, Debug)]
pub enum Error {
    // Vendor errors
    #[error("Vendor not found: {0}")]
    VendorNotFound(String),

    #[error("Invalid penalty rule for vendor {vendor_id} metric {metric}: {reason}")]
    InvalidPenaltyRule {
        vendor_id: String,
        metric: String,
        reason: String,
    },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging initialisation failed: {0}")]
    LoggingInit(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            Error::DeserializationError(err.to_string())
        } else {
            Error::SerializationError(err.to_string())
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::SerializationError(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rule_message() {
        let err = Error::InvalidPenaltyRule {
            vendor_id: "att".to_string(),
            metric: "jitter".to_string(),
            reason: "unrecognized formula".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("att"));
        assert!(msg.contains("jitter"));
    }

    #[test]
    fn test_from_json_syntax_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{ not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::DeserializationError(_)));
    }
}
