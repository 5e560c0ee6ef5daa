//! Coordination error types
//!
//! Callers always receive a result or one of the four errors below. Transient
//! failures (`ProviderFailed`, `Timeout`) are retried internally; the other
//! two are structural and surface immediately.

use super::provider::{ProviderError, ProviderId};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CoordinationError {
    /// No registered provider declares the capability, or none is eligible
    #[error("no provider available for capability '{capability}'")]
    NoProviderAvailable { capability: String },

    /// The chosen provider's circuit is open and no failover candidate exists
    #[error("circuit open for provider '{provider}' (capability '{capability}')")]
    CircuitOpen {
        provider: ProviderId,
        capability: String,
    },

    /// The last provider attempted returned an application-level error
    #[error("provider '{provider}' failed after {attempts} attempt(s): {source}")]
    ProviderFailed {
        provider: ProviderId,
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    /// The last provider attempted did not finish within the request deadline
    #[error("provider '{provider}' timed out after {timeout:?} ({attempts} attempt(s))")]
    Timeout {
        provider: ProviderId,
        timeout: Duration,
        attempts: u32,
        #[source]
        source: tokio::time::error::Elapsed,
    },
}

impl CoordinationError {
    /// Last provider attempted, when one was reached
    pub fn provider(&self) -> Option<&str> {
        match self {
            CoordinationError::NoProviderAvailable { .. } => None,
            CoordinationError::CircuitOpen { provider, .. }
            | CoordinationError::ProviderFailed { provider, .. }
            | CoordinationError::Timeout { provider, .. } => Some(provider),
        }
    }

    /// Whether the coordinator retries this kind of failure
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CoordinationError::ProviderFailed { .. } | CoordinationError::Timeout { .. }
        )
    }

    /// Short machine-readable kind, used in logs and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            CoordinationError::NoProviderAvailable { .. } => "no_provider_available",
            CoordinationError::CircuitOpen { .. } => "circuit_open",
            CoordinationError::ProviderFailed { .. } => "provider_failed",
            CoordinationError::Timeout { .. } => "timeout",
        }
    }

    pub(crate) fn with_attempts(mut self, total: u32) -> Self {
        match &mut self {
            CoordinationError::ProviderFailed { attempts, .. }
            | CoordinationError::Timeout { attempts, .. } => *attempts = total,
            _ => {}
        }
        self
    }
}
