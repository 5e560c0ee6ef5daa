//! Coordinator runtime configuration
//!
//! ## Defaults
//!
//! - `default_strategy`: LeastLoaded
//! - `default_timeout`: 5000ms
//! - `default_max_retries`: 2
//! - `circuit_breaker`: 5 consecutive failures, 60s recovery
//! - `health`: 30s interval, load thresholds 70% / 90%, success rate 95%
//! - `aggregation_interval`: 60s
//! - `shutdown_grace`: 5s

use super::circuit_breaker::CircuitBreakerConfig;
use super::strategy::SelectionStrategy;
use crate::core::health::HealthMonitorConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Strategy used when the caller gives no hint
    pub default_strategy: SelectionStrategy,

    /// Per-attempt deadline for requests without their own timeout
    pub default_timeout: Duration,

    /// Retry budget for requests without their own
    pub default_max_retries: u32,

    /// Breaker settings applied to every provider
    pub circuit_breaker: CircuitBreakerConfig,

    /// Health monitor loop settings
    pub health: HealthMonitorConfig,

    /// Period of the metrics aggregation loop
    pub aggregation_interval: Duration,

    /// How long shutdown waits for background loops to exit
    pub shutdown_grace: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            default_strategy: SelectionStrategy::LeastLoaded,
            default_timeout: Duration::from_millis(5000),
            default_max_retries: 2,
            circuit_breaker: CircuitBreakerConfig::default(),
            health: HealthMonitorConfig::default(),
            aggregation_interval: Duration::from_secs(60),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}
