//! Provider registry
//!
//! Each registered provider owns its descriptor, executor, metrics record and
//! circuit breaker. Locks are scoped to a single provider; there is no lock
//! spanning the whole pool. Callers clone the `Arc<ProviderEntry>` out of the
//! map before awaiting anything.

use super::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use super::metrics::{HealthStatus, ProviderMetrics};
use super::provider::{Provider, ProviderDescriptor, ProviderId};
use crate::utils::error::{Result, ServiceError};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::info;

/// A registered provider
pub struct ProviderEntry {
    pub descriptor: ProviderDescriptor,
    pub(crate) provider: Arc<dyn Provider>,
    pub(crate) metrics: Mutex<ProviderMetrics>,
    pub breaker: CircuitBreaker,
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("descriptor", &self.descriptor)
            .field("metrics", &*self.metrics.lock())
            .field("breaker", &self.breaker.snapshot())
            .finish()
    }
}

impl ProviderEntry {
    pub fn new(
        descriptor: ProviderDescriptor,
        provider: Arc<dyn Provider>,
        breaker_config: CircuitBreakerConfig,
    ) -> Self {
        let breaker = CircuitBreaker::new(descriptor.id.clone(), breaker_config);
        let metrics = Mutex::new(ProviderMetrics::new(descriptor.capacity));
        Self {
            descriptor,
            provider,
            metrics,
            breaker,
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    /// Copy of the current metrics record
    pub fn metrics(&self) -> ProviderMetrics {
        self.metrics.lock().clone()
    }

    pub fn status(&self) -> HealthStatus {
        self.metrics.lock().status
    }

    pub(crate) fn set_status(&self, status: HealthStatus) -> HealthStatus {
        let mut metrics = self.metrics.lock();
        std::mem::replace(&mut metrics.status, status)
    }

    /// Eligibility for `capability`: declared, admitted by status, and the
    /// breaker would let a request through.
    ///
    /// A `CircuitOpen` status defers to the breaker so a provider whose
    /// recovery timeout has elapsed can receive its half-open trial.
    pub fn is_eligible(&self, capability: &str) -> bool {
        if !self.descriptor.supports(capability) {
            return false;
        }

        let status_ok = match self.status() {
            HealthStatus::CircuitOpen => true,
            status => status.allows_requests(),
        };

        status_ok && self.breaker.would_allow()
    }
}

/// Registry of providers, keyed by id and remembering registration order
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    entries: DashMap<ProviderId, Arc<ProviderEntry>>,
    order: RwLock<Vec<ProviderId>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider; ids must be unique and capability sets non-empty
    pub fn register(&self, entry: ProviderEntry) -> Result<Arc<ProviderEntry>> {
        if entry.descriptor.id.is_empty() {
            return Err(ServiceError::Validation("provider id cannot be empty".to_string()));
        }
        if entry.descriptor.capabilities.is_empty() {
            return Err(ServiceError::Validation(format!(
                "provider '{}' declares no capabilities",
                entry.descriptor.id
            )));
        }

        let id = entry.descriptor.id.clone();
        let entry = Arc::new(entry);

        // Hold the order lock across the insert so order and map agree.
        let mut order = self.order.write();
        match self.entries.entry(id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(ServiceError::DuplicateProvider(id));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(entry.clone());
            }
        }
        order.push(id.clone());

        info!(
            provider = %id,
            capabilities = ?entry.descriptor.capabilities,
            capacity = entry.descriptor.capacity,
            "provider registered"
        );
        Ok(entry)
    }

    /// Remove a provider; in-flight requests keep their `Arc` until they finish
    pub fn remove(&self, id: &str) -> Option<Arc<ProviderEntry>> {
        let mut order = self.order.write();
        let removed = self.entries.remove(id).map(|(_, entry)| entry);
        if removed.is_some() {
            order.retain(|existing| existing != id);
            info!(provider = %id, "provider removed");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<Arc<ProviderEntry>> {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Provider ids in registration order
    pub fn ids(&self) -> Vec<ProviderId> {
        self.order.read().clone()
    }

    /// All entries in registration order
    pub fn entries(&self) -> Vec<Arc<ProviderEntry>> {
        let order = self.order.read();
        order.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Entries declaring `capability`, in registration order
    pub fn declaring(&self, capability: &str) -> Vec<Arc<ProviderEntry>> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.descriptor.supports(capability))
            .collect()
    }

    /// Eligible entries for `capability`, in registration order
    pub fn eligible(&self, capability: &str) -> Vec<Arc<ProviderEntry>> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.is_eligible(capability))
            .collect()
    }
}
