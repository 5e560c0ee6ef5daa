//! Coordinator tests module
//!
//! Shared stub providers and service builders for the coordinator test suite.


use crate::core::coordinator::circuit_breaker::CircuitBreakerConfig;
use crate::core::coordinator::config::CoordinatorConfig;
use crate::core::coordinator::provider::{Provider, ProviderDescriptor, ProviderError};
use crate::core::coordinator::service::CoordinationService;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted provider behaviour
#[derive(Debug, Clone)]
pub(super) enum Behavior {
    /// Echo the payload back together with the provider id
    Succeed,
    Fail,
    /// Succeed after sleeping
    Delay(Duration),
    /// Never finish within any reasonable deadline
    Hang,
}

pub(super) struct StubProvider {
    id: String,
    behavior: Mutex<Behavior>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub(super) fn new(id: &str, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock() = behavior;
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn execute(&self, capability: &str, payload: Value) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior.lock().clone();
        match behavior {
            Behavior::Succeed => {}
            Behavior::Fail => return Err(ProviderError::execution(format!("{} failed", self.id))),
            Behavior::Delay(delay) => tokio::time::sleep(delay).await,
            Behavior::Hang => tokio::time::sleep(Duration::from_secs(3600)).await,
        }
        Ok(json!({ "provider": self.id, "capability": capability, "payload": payload }))
    }
}

pub(super) fn config_with_breaker(failure_threshold: u32, recovery_secs: u64) -> CoordinatorConfig {
    CoordinatorConfig {
        circuit_breaker: CircuitBreakerConfig {
            failure_threshold,
            recovery_timeout: Duration::from_secs(recovery_secs),
        },
        ..CoordinatorConfig::default()
    }
}

/// Register `provider` under `id` for the given capabilities with capacity 10
pub(super) fn register(
    service: &CoordinationService,
    id: &str,
    capabilities: &[&str],
    provider: Arc<StubProvider>,
) {
    service
        .register_provider(
            ProviderDescriptor::new(id, capabilities.iter().copied(), 10),
            provider,
        )
        .unwrap();
}

/// Service with one stub provider per id, all serving `capability`
pub(super) fn service_with(
    config: CoordinatorConfig,
    capability: &str,
    providers: &[(&str, Behavior)],
) -> (CoordinationService, Vec<Arc<StubProvider>>) {
    let service = CoordinationService::new(config);
    let stubs = providers
        .iter()
        .map(|(id, behavior)| {
            let stub = StubProvider::new(id, behavior.clone());
            register(&service, id, &[capability], stub.clone());
            stub
        })
        .collect();
    (service, stubs)
}
