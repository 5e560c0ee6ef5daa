//! Coordinator configuration

use super::*;
use crate::core::coordinator::strategy::SelectionStrategy;
use serde::{Deserialize, Serialize};

/// Request-path defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorSettings {
    /// Strategy used when the caller gives no hint
    #[serde(default)]
    pub default_strategy: SelectionStrategy,
    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    /// Retry budget for requests without their own
    #[serde(default = "default_max_retries")]
    pub default_max_retries: u32,
    /// How long shutdown waits for background loops, in seconds
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            default_strategy: SelectionStrategy::default(),
            default_timeout_ms: default_timeout_ms(),
            default_max_retries: default_max_retries(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}
