//! Per-provider health and performance record
//!
//! `ProviderMetrics` is a plain data holder. The registry wraps one per
//! provider in a `parking_lot::Mutex`, so every mutation below happens under
//! that provider's lock and is linearizable relative to other updates of the
//! same provider. Nothing here awaits.
//!
//! ## Averaging rule
//!
//! Mean response time is a cumulative average over successful requests:
//! `mean += (sample - mean) / successful`. It is deterministic for a given
//! sequence of samples and equals the arithmetic mean of all successful
//! response times. The service-wide coordination mean uses the same rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health status of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Ready to serve
    #[default]
    Healthy,
    /// Serving, but under load pressure or with a low success rate
    Degraded,
    /// Above the overload threshold, excluded from selection
    Overloaded,
    /// Liveness probe failed, excluded from selection
    Unavailable,
    /// Circuit breaker is open
    CircuitOpen,
}

impl HealthStatus {
    /// Whether the status alone admits traffic
    pub fn allows_requests(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }
}

/// Health/performance record for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Cumulative mean over successful requests, in milliseconds
    pub mean_response_time_ms: f64,
    pub in_flight: u32,
    pub capacity: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub status: HealthStatus,
}

impl ProviderMetrics {
    pub fn new(capacity: u32) -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            mean_response_time_ms: 0.0,
            in_flight: 0,
            capacity,
            last_failure_at: None,
            status: HealthStatus::Healthy,
        }
    }

    /// `successful / total * 100`, or 100 for a provider that has not served yet
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 100.0;
        }
        self.successful_requests as f64 / self.total_requests as f64 * 100.0
    }

    /// `in_flight / capacity * 100`; zero capacity reports 0%
    pub fn load_percentage(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.in_flight as f64 / self.capacity as f64 * 100.0
    }

    pub(crate) fn acquire_slot(&mut self) {
        self.in_flight = self.in_flight.saturating_add(1);
    }

    pub(crate) fn release_slot(&mut self) {
        debug_assert!(self.in_flight > 0, "in-flight release without acquire");
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub(crate) fn record_success(&mut self, response_time_ms: f64) {
        self.total_requests += 1;
        self.successful_requests += 1;
        self.mean_response_time_ms = cumulative_mean(
            self.mean_response_time_ms,
            response_time_ms,
            self.successful_requests,
        );
    }

    pub(crate) fn record_failure(&mut self, at: DateTime<Utc>) {
        self.total_requests += 1;
        self.failed_requests += 1;
        self.last_failure_at = Some(at);
    }
}

/// Fold `sample` into a running mean that already covers `count - 1` samples
pub(crate) fn cumulative_mean(mean: f64, sample: f64, count: u64) -> f64 {
    if count <= 1 {
        return sample;
    }
    mean + (sample - mean) / count as f64
}
