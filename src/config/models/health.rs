//! Health monitor configuration

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSettings {
    /// Interval between health passes, in seconds
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    /// Liveness probe timeout, in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_degraded_load_percent")]
    pub degraded_load_percent: f64,
    #[serde(default = "default_overloaded_load_percent")]
    pub overloaded_load_percent: f64,
    #[serde(default = "default_min_success_rate")]
    pub min_success_rate: f64,
    #[serde(default = "default_true")]
    pub probes_enabled: bool,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            degraded_load_percent: default_degraded_load_percent(),
            overloaded_load_percent: default_overloaded_load_percent(),
            min_success_rate: default_min_success_rate(),
            probes_enabled: true,
        }
    }
}
