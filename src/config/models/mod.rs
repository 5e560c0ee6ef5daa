//! Configuration data models
//!
//! One struct per YAML section; every field has a serde default so partial
//! files are valid.

#![allow(missing_docs)]

pub mod circuit_breaker;
pub mod coordinator;
pub mod health;
pub mod metrics;

pub use circuit_breaker::*;
pub use coordinator::*;
pub use health::*;
pub use metrics::*;

/// Default per-attempt timeout in milliseconds
pub fn default_timeout_ms() -> u64 {
    5000
}

/// Default retry budget
pub fn default_max_retries() -> u32 {
    2
}

pub fn default_shutdown_grace_secs() -> u64 {
    5
}

/// Default consecutive failures before a circuit opens
pub fn default_failure_threshold() -> u32 {
    5
}

pub fn default_recovery_timeout_secs() -> u64 {
    60
}

pub fn default_check_interval_secs() -> u64 {
    30
}

pub fn default_probe_timeout_ms() -> u64 {
    2000
}

pub fn default_degraded_load_percent() -> f64 {
    70.0
}

pub fn default_overloaded_load_percent() -> f64 {
    90.0
}

pub fn default_min_success_rate() -> f64 {
    95.0
}

pub fn default_aggregation_interval_secs() -> u64 {
    60
}

pub fn default_true() -> bool {
    true
}
