//! Health monitor implementation
//!
//! Periodically re-evaluates every registered provider, independent of
//! request traffic. Each provider is checked in isolation: one failing or
//! hanging probe never affects the others or the loop itself.

use super::checker::check_provider;
use super::types::{HealthCheckOutcome, HealthThresholds};
use crate::core::coordinator::registry::ProviderRegistry;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Health monitor configuration
#[derive(Debug, Clone)]
pub struct HealthMonitorConfig {
    /// Interval between health passes
    pub check_interval: Duration,
    /// Timeout for an individual liveness probe
    pub probe_timeout: Duration,
    /// Classification limits
    pub thresholds: HealthThresholds,
    /// Whether to call `Provider::health_check` on each pass
    pub probes_enabled: bool,
}

impl Default for HealthMonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(30),
            probe_timeout: Duration::from_millis(2000),
            thresholds: HealthThresholds::default(),
            probes_enabled: true,
        }
    }
}

/// Health monitor over a provider registry
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    registry: Arc<ProviderRegistry>,
    config: HealthMonitorConfig,
}

impl HealthMonitor {
    pub fn new(registry: Arc<ProviderRegistry>, config: HealthMonitorConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &HealthMonitorConfig {
        &self.config
    }

    /// Run one health pass over every registered provider
    ///
    /// Checks run concurrently; outcomes come back in registration order.
    pub async fn check_all(&self) -> Vec<HealthCheckOutcome> {
        let entries = self.registry.entries();
        let checks = entries
            .into_iter()
            .map(|entry| check_provider(entry, &self.config));
        let outcomes = join_all(checks).await;

        let changed = outcomes.iter().filter(|outcome| outcome.changed()).count();
        debug!(checked = outcomes.len(), changed, "health pass complete");
        outcomes
    }

    /// Run health passes on `check_interval` until `token` is cancelled
    pub async fn run(self, token: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.check_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_secs = self.config.check_interval.as_secs(),
            probes = self.config.probes_enabled,
            "health monitor started"
        );

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    // A pass in progress is abandoned on cancellation
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = self.check_all() => {}
                    }
                }
            }
        }

        info!("health monitor stopped");
    }
}
