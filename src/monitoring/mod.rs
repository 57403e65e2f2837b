//! Monitoring Module
//!
//! Logging configuration and subscriber setup.

pub mod logging;

pub use logging::{init_logging, LogFormat, LogLevel, LoggerConfig};
