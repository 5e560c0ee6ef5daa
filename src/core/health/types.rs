//! Health thresholds and check outcomes

use crate::core::coordinator::metrics::HealthStatus;
use crate::core::coordinator::provider::ProviderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Load and success-rate limits used to classify a provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthThresholds {
    /// Load above this is Degraded
    pub degraded_load_percent: f64,
    /// Load above this is Overloaded
    pub overloaded_load_percent: f64,
    /// Success rate below this is Degraded
    pub min_success_rate: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            degraded_load_percent: 70.0,
            overloaded_load_percent: 90.0,
            min_success_rate: 95.0,
        }
    }
}

/// What one health check did to one provider
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckOutcome {
    pub provider_id: ProviderId,
    pub previous: HealthStatus,
    pub status: HealthStatus,
    /// Set when the liveness probe failed, timed out or panicked
    pub probe_error: Option<String>,
    /// The provider's open circuit was left alone
    pub skipped: bool,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckOutcome {
    pub(crate) fn skipped(provider_id: ProviderId, status: HealthStatus) -> Self {
        Self {
            provider_id,
            previous: status,
            status,
            probe_error: None,
            skipped: true,
            checked_at: Utc::now(),
        }
    }

    pub(crate) fn updated(
        provider_id: ProviderId,
        previous: HealthStatus,
        status: HealthStatus,
        probe_error: Option<String>,
    ) -> Self {
        Self {
            provider_id,
            previous,
            status,
            probe_error,
            skipped: false,
            checked_at: Utc::now(),
        }
    }

    pub fn changed(&self) -> bool {
        self.previous != self.status
    }
}
