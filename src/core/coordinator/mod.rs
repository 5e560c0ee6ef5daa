//! Request coordination across heterogeneous providers
//!
//! Routes capability-tagged requests to registered providers with
//! health-aware selection, per-provider circuit breaking and bounded
//! retry with failover.
//!
//! ## Module Structure
//!
//! - `provider` - Provider trait and descriptors
//! - `metrics` - Per-provider counters and health status
//! - `circuit_breaker` - Per-provider Closed/Open/HalfOpen gate
//! - `registry` - Provider entries, registration order, eligibility
//! - `strategy` / `strategy_impl` - Selection strategies
//! - `service` - `CoordinationService` struct, provider management, reporting
//! - `selection` - Strategy dispatch over the eligible set
//! - `execution` - Single attempt: in-flight slot, deadline, outcome recording
//! - `execute_impl` - `coordinate` with retry and failover
//! - `background` - Cancellable health and aggregation loops
//! - `summary` - Service-wide aggregates and status reports

pub mod background;
pub mod circuit_breaker;
pub mod config;
pub mod error;
pub mod execute_impl;
pub mod execution;
pub mod metrics;
pub mod provider;
pub mod registry;
pub mod request;
pub mod selection;
pub mod service;
pub mod strategy;
pub mod strategy_impl;
pub mod summary;

#[cfg(test)]
mod tests;

pub use background::BackgroundTasks;
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerSnapshot, CircuitState};
pub use config::CoordinatorConfig;
pub use error::CoordinationError;
pub use metrics::{HealthStatus, ProviderMetrics};
pub use provider::{Provider, ProviderDescriptor, ProviderError, ProviderId};
pub use registry::{ProviderEntry, ProviderRegistry};
pub use request::{CoordinationRequest, CoordinationResult, Priority};
pub use service::CoordinationService;
pub use strategy::{Candidate, SelectionStrategy};
pub use summary::{CoordinationStats, CoordinationSummary, ProviderStatusReport};
