//! Selection strategy definitions
//!
//! Strategies are pure: they choose among a snapshot of already-eligible
//! candidates and never touch provider state. The only shared state is the
//! round-robin cursor, owned by the service and passed in.

use super::provider::ProviderId;
use super::registry::ProviderEntry;
use super::strategy_impl;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::AtomicUsize;

/// Provider selection strategy
///
/// - **RoundRobin**: cycles through eligible providers in registration order
/// - **LeastLoaded**: lowest load percentage, lowest id on tie (default)
/// - **FastestResponse**: lowest mean response time; providers that have not
///   served a request yet count as 0ms so new providers are tried first
/// - **CapabilityBased**: least loaded among providers whose primary
///   capability is the requested one, else least loaded overall
/// - **Failover**: least loaded, excluding the provider that was just tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    RoundRobin,
    #[default]
    LeastLoaded,
    FastestResponse,
    CapabilityBased,
    Failover,
}

impl SelectionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::RoundRobin => "round_robin",
            SelectionStrategy::LeastLoaded => "least_loaded",
            SelectionStrategy::FastestResponse => "fastest_response",
            SelectionStrategy::CapabilityBased => "capability_based",
            SelectionStrategy::Failover => "failover",
        }
    }

    /// Choose a provider among `candidates` (eligible, registration order)
    ///
    /// `exclude` is honoured by `Failover` only.
    pub fn select(
        &self,
        capability: &str,
        candidates: &[Candidate],
        exclude: Option<&str>,
        round_robin_cursor: &AtomicUsize,
    ) -> Option<ProviderId> {
        if candidates.is_empty() {
            return None;
        }

        match self {
            SelectionStrategy::RoundRobin => {
                strategy_impl::round_robin(candidates, round_robin_cursor)
            }
            SelectionStrategy::LeastLoaded => strategy_impl::least_loaded(candidates.iter()),
            SelectionStrategy::FastestResponse => strategy_impl::fastest_response(candidates),
            SelectionStrategy::CapabilityBased => {
                strategy_impl::capability_based(capability, candidates)
            }
            SelectionStrategy::Failover => strategy_impl::failover(candidates, exclude),
        }
    }
}

impl std::fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "round_robin" => Ok(SelectionStrategy::RoundRobin),
            "least_loaded" => Ok(SelectionStrategy::LeastLoaded),
            "fastest_response" => Ok(SelectionStrategy::FastestResponse),
            "capability_based" => Ok(SelectionStrategy::CapabilityBased),
            "failover" => Ok(SelectionStrategy::Failover),
            other => Err(format!("unknown selection strategy: {}", other)),
        }
    }
}

/// Snapshot of the provider fields strategies look at
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: ProviderId,
    pub primary_capability: Option<String>,
    pub load_percentage: f64,
    pub mean_response_time_ms: f64,
    pub total_requests: u64,
}

impl Candidate {
    /// Snapshot an entry under its metrics lock
    pub fn from_entry(entry: &ProviderEntry) -> Self {
        let metrics = entry.metrics.lock();
        Self {
            id: entry.descriptor.id.clone(),
            primary_capability: entry.descriptor.primary_capability().map(str::to_string),
            load_percentage: metrics.load_percentage(),
            mean_response_time_ms: metrics.mean_response_time_ms,
            total_requests: metrics.total_requests,
        }
    }

    /// Response time used for ranking; untested providers rank as 0ms
    pub fn effective_response_time_ms(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.mean_response_time_ms
        }
    }
}
