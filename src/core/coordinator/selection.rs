//! Provider selection
//!
//! The single place where a `SelectionStrategy` is turned into a provider:
//! resolve eligible providers, snapshot them, dispatch to the strategy.

use super::registry::ProviderEntry;
use super::service::CoordinationService;
use super::strategy::{Candidate, SelectionStrategy};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tracing::debug;

impl CoordinationService {
    /// Eligible providers for `capability`, in registration order
    pub fn eligible_providers(&self, capability: &str) -> Vec<Arc<ProviderEntry>> {
        self.registry.eligible(capability)
    }

    /// Pick a provider for `capability`
    ///
    /// # Flow
    ///
    /// 1. Filter: declares capability + status admits traffic + breaker would allow
    /// 2. Snapshot load/latency of each candidate
    /// 3. Dispatch on `strategy` (`exclude` is used by Failover)
    ///
    /// Returns `None` when nothing is eligible; the caller treats that as
    /// terminal for the attempt.
    pub fn select_provider(
        &self,
        capability: &str,
        strategy: SelectionStrategy,
        exclude: Option<&str>,
    ) -> Option<Arc<ProviderEntry>> {
        let eligible = self.eligible_providers(capability);
        if eligible.is_empty() {
            debug!(capability, "no eligible provider");
            return None;
        }

        let candidates: Vec<Candidate> = eligible
            .iter()
            .map(|entry| Candidate::from_entry(entry))
            .collect();

        let selected = {
            let cursor = self
                .round_robin_cursors
                .entry(capability.to_string())
                .or_insert_with(|| AtomicUsize::new(0));
            strategy.select(capability, &candidates, exclude, &cursor)
        }?;

        debug!(
            capability,
            strategy = %strategy,
            provider = %selected,
            candidates = candidates.len(),
            "provider selected"
        );

        eligible
            .into_iter()
            .find(|entry| entry.descriptor.id == selected)
    }
}
