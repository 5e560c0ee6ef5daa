//! Service-wide aggregates and status reports

use super::circuit_breaker::CircuitState;
use super::metrics::{cumulative_mean, HealthStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Running service-wide counters
///
/// Updated once per `coordinate` call, whatever its outcome. The mean uses
/// the same cumulative rule as provider response times, over all
/// coordinated requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinationStats {
    pub total_coordinated: u64,
    pub successful: u64,
    pub failed: u64,
    pub mean_coordination_time_ms: f64,
}

impl CoordinationStats {
    pub(crate) fn record(&mut self, success: bool, elapsed_ms: f64) {
        self.total_coordinated += 1;
        if success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.mean_coordination_time_ms = cumulative_mean(
            self.mean_coordination_time_ms,
            elapsed_ms,
            self.total_coordinated,
        );
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_coordinated == 0 {
            return 100.0;
        }
        self.successful as f64 / self.total_coordinated as f64 * 100.0
    }
}

/// Per-provider status report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatusReport {
    pub status: HealthStatus,
    pub success_rate: f64,
    pub load_percentage: f64,
    pub mean_response_time_ms: f64,
    pub in_flight: u32,
    pub circuit_state: CircuitState,
}

/// Service-wide summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinationSummary {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub success_rate: f64,
    pub mean_coordination_time_ms: f64,
    pub open_circuit_count: usize,
    pub provider_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl CoordinationSummary {
    pub(crate) fn from_stats(
        stats: &CoordinationStats,
        open_circuit_count: usize,
        provider_count: usize,
    ) -> Self {
        Self {
            total_requests: stats.total_coordinated,
            successful_requests: stats.successful,
            failed_requests: stats.failed,
            success_rate: stats.success_rate(),
            mean_coordination_time_ms: stats.mean_coordination_time_ms,
            open_circuit_count,
            provider_count,
            generated_at: Utc::now(),
        }
    }

    /// Summary of a service that has not coordinated anything yet
    pub fn empty() -> Self {
        Self::from_stats(&CoordinationStats::default(), 0, 0)
    }
}
