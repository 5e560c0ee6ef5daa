//! Health monitoring for coordinated providers
//!
//! # Module Structure
//!
//! - `types` - Classification thresholds and check outcomes
//! - `monitor` - Health monitor loop and configuration
//! - `checker` - Status classification, liveness probes, per-provider checks
//! - `tests` - Test suite for health monitoring

pub mod checker;
pub mod monitor;
pub mod types;

pub use checker::classify;
pub use monitor::{HealthMonitor, HealthMonitorConfig};
pub use types::{HealthCheckOutcome, HealthThresholds};
