//! # circuit-sla - SLA penalty evaluation for network circuits
//!
//! Converts circuit KPI breaches into vendor penalty costs:
//! - **Vendor**: SLA thresholds, penalty rules and the vendor registry
//! - **Telemetry**: circuit snapshots and breach history
//! - **Engine**: per-metric costs, severity bands and compliance
//! - **Export**: delimited-text and JSON cost exports
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use circuit_sla::engine::compute_costs_for_circuit;
//! use circuit_sla::telemetry::CircuitRow;
//! use circuit_sla::vendor::VendorRegistry;
//!
//! let registry = VendorRegistry::with_defaults();
//! let vendor = registry.get("att").unwrap();
//!
//! let circuit = CircuitRow::new("ATT-CKT-0001", "att", 120.0, 3.0, 0.8);
//! let costs = compute_costs_for_circuit(&circuit, &vendor, &[]);
//! println!("Penalty: ${:.2}", costs.total);
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod export;
pub mod monitoring;
pub mod service;
pub mod telemetry;
pub mod vendor;

pub use crate::config::Settings;
pub use crate::core::error::{Error, Result};
pub use crate::service::SlaService;
