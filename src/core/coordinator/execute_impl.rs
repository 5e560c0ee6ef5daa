//! Request coordination entry point
//!
//! `coordinate` runs a bounded attempt loop: select, gate on the breaker,
//! execute under the deadline, record, and on a transient failure retry with
//! Failover excluding the provider that just failed.

use super::error::CoordinationError;
use super::execution::run_attempt;
use super::registry::ProviderEntry;
use super::request::{CoordinationRequest, CoordinationResult, Priority};
use super::service::CoordinationService;
use super::strategy::SelectionStrategy;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};

/// Successful attempt loop output
struct Completed {
    value: Value,
    provider_id: String,
    attempts: u32,
}

impl CoordinationService {
    /// Coordinate a request to a provider that supports its capability
    ///
    /// `strategy` overrides the configured default for the first attempt;
    /// retries always use Failover. Worst-case latency is
    /// `timeout * (max_retries + 1)`.
    pub async fn coordinate(
        &self,
        mut request: CoordinationRequest,
        strategy: Option<SelectionStrategy>,
    ) -> Result<CoordinationResult, CoordinationError> {
        let strategy = strategy.unwrap_or(self.config.default_strategy);
        let timeout = request
            .timeout
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(self.config.default_timeout);
        let max_retries = request
            .max_retries
            .unwrap_or(self.config.default_max_retries);

        let span = info_span!(
            "coordinate",
            request_id = %request.id,
            capability = %request.capability,
            priority = ?request.priority,
        );

        let start = Instant::now();
        request.started_at = Some(Utc::now());

        let outcome = self
            .run_attempts(&mut request, strategy, timeout, max_retries)
            .instrument(span)
            .await;

        let completed_at = Utc::now();
        request.completed_at = Some(completed_at);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.stats.lock().record(outcome.is_ok(), elapsed_ms);

        match outcome {
            Ok(completed) => {
                info!(
                    request_id = %request.id,
                    provider = %completed.provider_id,
                    attempts = completed.attempts,
                    elapsed_ms,
                    "request coordinated"
                );
                Ok(CoordinationResult {
                    request_id: request.id,
                    result: completed.value,
                    provider_id: completed.provider_id,
                    processing_time_ms: elapsed_ms,
                    strategy,
                    attempts: completed.attempts,
                    priority: request.priority,
                    started_at: request.started_at.unwrap_or(completed_at),
                    completed_at,
                })
            }
            Err(err) => {
                warn!(
                    request_id = %request.id,
                    kind = err.kind(),
                    provider = err.provider().unwrap_or("-"),
                    error = %err,
                    "request coordination failed"
                );
                Err(err)
            }
        }
    }

    /// Inbound convenience form: capability, payload, priority, timeout and retry budget
    ///
    /// A `timeout_ms` of 0 selects the configured default.
    pub async fn coordinate_capability(
        &self,
        capability: impl Into<String>,
        payload: Value,
        priority: Priority,
        timeout_ms: u64,
        max_retries: u32,
    ) -> Result<CoordinationResult, CoordinationError> {
        let request = CoordinationRequest::new(capability, payload)
            .with_priority(priority)
            .with_timeout_ms(timeout_ms)
            .with_max_retries(max_retries);
        self.coordinate(request, None).await
    }

    async fn run_attempts(
        &self,
        request: &mut CoordinationRequest,
        strategy: SelectionStrategy,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Completed, CoordinationError> {
        let capability = request.capability.clone();
        let mut attempts: u32 = 0;
        let mut last_failed: Option<String> = None;
        let mut last_error: Option<CoordinationError> = None;

        loop {
            let attempt_strategy = if attempts == 0 {
                strategy
            } else {
                SelectionStrategy::Failover
            };

            let Some(selected) =
                self.select_provider(&capability, attempt_strategy, last_failed.as_deref())
            else {
                return Err(match last_error {
                    // Retry budget left but nobody else to try
                    Some(err) => err.with_attempts(attempts),
                    None => CoordinationError::NoProviderAvailable { capability },
                });
            };

            let entry = self.admit(selected, &capability)?;
            let provider_id = entry.descriptor.id.clone();

            attempts += 1;
            debug!(provider = %provider_id, attempt = attempts, "dispatching attempt");

            let outcome = run_attempt(&entry, &capability, request.payload.clone(), timeout).await;
            let err = match outcome.into_result(&provider_id, timeout, attempts) {
                Ok(value) => {
                    return Ok(Completed {
                        value,
                        provider_id,
                        attempts,
                    });
                }
                Err(err) => err,
            };

            if request.retry_count >= max_retries {
                return Err(err);
            }

            warn!(
                provider = %provider_id,
                attempt = attempts,
                error = %err,
                "attempt failed, failing over"
            );
            request.retry_count += 1;
            last_failed = Some(provider_id);
            last_error = Some(err);
        }
    }

    /// Breaker gate for the selected provider
    ///
    /// When the gate refuses, exactly one Failover alternate is tried.
    pub(crate) fn admit(
        &self,
        selected: Arc<ProviderEntry>,
        capability: &str,
    ) -> Result<Arc<ProviderEntry>, CoordinationError> {
        if selected.breaker.allow() {
            return Ok(selected);
        }

        let blocked = selected.descriptor.id.clone();
        debug!(provider = %blocked, "breaker refused selected provider, trying alternate");

        match self.select_provider(capability, SelectionStrategy::Failover, Some(&blocked)) {
            Some(alternate) if alternate.breaker.allow() => Ok(alternate),
            _ => Err(CoordinationError::CircuitOpen {
                provider: blocked,
                capability: capability.to_string(),
            }),
        }
    }
}
