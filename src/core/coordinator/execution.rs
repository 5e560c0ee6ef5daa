//! Single-attempt execution helpers
//!
//! One attempt = acquire an in-flight slot, run the provider future under the
//! request deadline, release the slot and record the outcome in the
//! provider's metrics and breaker.

use super::error::CoordinationError;
use super::metrics::HealthStatus;
use super::provider::ProviderError;
use super::registry::ProviderEntry;
use chrono::Utc;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Outcome of one provider invocation
#[derive(Debug)]
pub(crate) enum AttemptOutcome {
    Success(Value),
    Failed(ProviderError),
    TimedOut(tokio::time::error::Elapsed),
}

impl AttemptOutcome {
    pub(crate) fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success(_))
    }

    /// Map a failure to the matching coordination error, attributed to `provider`
    pub(crate) fn into_result(
        self,
        provider: &str,
        timeout: Duration,
        attempts: u32,
    ) -> Result<Value, CoordinationError> {
        match self {
            AttemptOutcome::Success(value) => Ok(value),
            AttemptOutcome::Failed(source) => Err(CoordinationError::ProviderFailed {
                provider: provider.to_string(),
                attempts,
                source,
            }),
            AttemptOutcome::TimedOut(source) => Err(CoordinationError::Timeout {
                provider: provider.to_string(),
                timeout,
                attempts,
                source,
            }),
        }
    }
}

/// Scoped in-flight slot
///
/// Increments the provider's in-flight count on creation. `finish` releases
/// the slot and records the outcome under one lock. A guard dropped without
/// finishing (the caller's future was cancelled mid-attempt) still releases
/// the slot and hands back any half-open trial permit.
pub(crate) struct InFlightGuard {
    entry: Arc<ProviderEntry>,
    finished: bool,
}

impl InFlightGuard {
    pub(crate) fn acquire(entry: Arc<ProviderEntry>) -> Self {
        entry.metrics.lock().acquire_slot();
        Self {
            entry,
            finished: false,
        }
    }

    fn finish(mut self, success: bool, response_time_ms: f64) {
        {
            let mut metrics = self.entry.metrics.lock();
            metrics.release_slot();
            if success {
                metrics.record_success(response_time_ms);
            } else {
                metrics.record_failure(Utc::now());
            }
        }
        self.finished = true;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.entry.metrics.lock().release_slot();
            self.entry.breaker.release_trial();
        }
    }
}

/// Run one attempt against `entry` and record its outcome
pub(crate) async fn run_attempt(
    entry: &Arc<ProviderEntry>,
    capability: &str,
    payload: Value,
    timeout: Duration,
) -> AttemptOutcome {
    let guard = InFlightGuard::acquire(entry.clone());
    let start = Instant::now();

    let call = AssertUnwindSafe(entry.provider.execute(capability, payload)).catch_unwind();
    let outcome = match tokio::time::timeout(timeout, call).await {
        Ok(Ok(Ok(value))) => AttemptOutcome::Success(value),
        Ok(Ok(Err(err))) => AttemptOutcome::Failed(err),
        Ok(Err(panic)) => AttemptOutcome::Failed(ProviderError::Panicked(panic_message(&*panic))),
        // The provider future is dropped here, which cancels it.
        Err(elapsed) => AttemptOutcome::TimedOut(elapsed),
    };

    let response_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    guard.finish(outcome.is_success(), response_time_ms);
    record_breaker_outcome(entry, outcome.is_success());

    outcome
}

/// Apply an outcome to the breaker and mirror breaker transitions into status
pub(crate) fn record_breaker_outcome(entry: &ProviderEntry, success: bool) {
    if success {
        entry.breaker.record_success();
        if entry.status() == HealthStatus::CircuitOpen
            && entry.breaker.state() == super::circuit_breaker::CircuitState::Closed
        {
            entry.set_status(HealthStatus::Healthy);
            info!(provider = %entry.id(), "provider recovered from open circuit");
        }
    } else if entry.breaker.record_failure() {
        entry.set_status(HealthStatus::CircuitOpen);
        warn!(
            provider = %entry.id(),
            failures = entry.breaker.consecutive_failures(),
            "provider circuit opened"
        );
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
