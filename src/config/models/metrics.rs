//! Metrics aggregation configuration

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Period of the summary aggregation loop, in seconds
    #[serde(default = "default_aggregation_interval_secs")]
    pub aggregation_interval_secs: u64,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            aggregation_interval_secs: default_aggregation_interval_secs(),
        }
    }
}
