//! Health checking methods
//!
//! Classification of a provider from its counters, the liveness probe, and
//! the per-provider check that combines both.

use super::monitor::HealthMonitorConfig;
use super::types::{HealthCheckOutcome, HealthThresholds};
use crate::core::coordinator::circuit_breaker::CircuitState;
use crate::core::coordinator::metrics::{HealthStatus, ProviderMetrics};
use crate::core::coordinator::registry::ProviderEntry;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Recompute a provider's status from load and success rate
///
/// Overloaded wins over Degraded; either Degraded trigger is enough.
pub fn classify(metrics: &ProviderMetrics, thresholds: &HealthThresholds) -> HealthStatus {
    let load = metrics.load_percentage();
    if load > thresholds.overloaded_load_percent {
        HealthStatus::Overloaded
    } else if load > thresholds.degraded_load_percent
        || metrics.success_rate() < thresholds.min_success_rate
    {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

/// Run the provider's liveness probe under `timeout`
///
/// Errors, timeouts and panics all come back as a failure reason.
pub(crate) async fn probe(entry: &ProviderEntry, timeout: Duration) -> Result<(), String> {
    let check = AssertUnwindSafe(entry.provider.health_check()).catch_unwind();
    match tokio::time::timeout(timeout, check).await {
        Ok(Ok(Ok(()))) => Ok(()),
        Ok(Ok(Err(e))) => Err(e.to_string()),
        Ok(Err(_)) => Err("health check panicked".to_string()),
        Err(_) => Err(format!("health check timed out after {}ms", timeout.as_millis())),
    }
}

/// Check one provider and apply the resulting status
///
/// An entry marked CircuitOpen is left alone until its breaker closes.
pub(crate) async fn check_provider(
    entry: Arc<ProviderEntry>,
    config: &HealthMonitorConfig,
) -> HealthCheckOutcome {
    let id = entry.descriptor.id.clone();

    if circuit_held_open(&entry, entry.status()) {
        debug!(provider = %id, "circuit open, skipping health check");
        return HealthCheckOutcome::skipped(id, HealthStatus::CircuitOpen);
    }

    let probe_error = if config.probes_enabled {
        probe(&entry, config.probe_timeout).await.err()
    } else {
        None
    };

    // Decide and store under one lock; the coordinator may have opened the
    // circuit while the probe was running.
    let (previous, status) = {
        let mut metrics = entry.metrics.lock();
        let previous = metrics.status;
        if circuit_held_open(&entry, previous) {
            return HealthCheckOutcome::skipped(id, previous);
        }
        let status = if probe_error.is_some() {
            HealthStatus::Unavailable
        } else {
            classify(&metrics, &config.thresholds)
        };
        metrics.status = status;
        (previous, status)
    };

    if previous != status {
        match (&probe_error, status) {
            (Some(reason), _) => {
                warn!(provider = %id, from = ?previous, error = %reason, "liveness probe failed, provider unavailable")
            }
            (None, HealthStatus::Healthy) => {
                info!(provider = %id, from = ?previous, "provider healthy")
            }
            (None, _) => {
                warn!(provider = %id, from = ?previous, to = ?status, "provider health changed")
            }
        }
    }

    HealthCheckOutcome::updated(id, previous, status, probe_error)
}

fn circuit_held_open(entry: &ProviderEntry, status: HealthStatus) -> bool {
    status == HealthStatus::CircuitOpen && entry.breaker.state() != CircuitState::Closed
}
