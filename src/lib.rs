//! # request-coordinator
//!
//! Routes capability-tagged work requests to one of several heterogeneous
//! backend providers with bounded latency and graceful degradation under
//! partial provider failure.
//!
//! ## Features
//!
//! - **Health-aware selection**: round-robin, least-loaded, fastest-response,
//!   capability-based and failover strategies over the eligible providers
//! - **Circuit breaking**: per-provider Closed / Open / Half-Open breakers
//! - **Retry with failover**: transient failures are retried on a different
//!   provider, bounded by `timeout * (max_retries + 1)`
//! - **Background monitoring**: periodic health classification and
//!   liveness probes, plus a metrics aggregation loop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use request_coordinator::{
//!     CoordinationRequest, CoordinationService, Provider, ProviderDescriptor, ProviderError,
//! };
//! use serde_json::{Value, json};
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! #[async_trait::async_trait]
//! impl Provider for Echo {
//!     async fn execute(&self, _capability: &str, payload: Value) -> Result<Value, ProviderError> {
//!         Ok(payload)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = Arc::new(CoordinationService::default());
//!     service.register_provider(ProviderDescriptor::new("echo", ["summarize"], 8), Arc::new(Echo))?;
//!
//!     let tasks = service.start_background_tasks();
//!     let result = service
//!         .coordinate(CoordinationRequest::new("summarize", json!({ "text": "..." })), None)
//!         .await?;
//!     println!("{} answered in {:.1}ms", result.provider_id, result.processing_time_ms);
//!
//!     tasks.shutdown().await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{Result, ServiceError};
pub use utils::logging::{LogFormat, LoggingConfig, init_logging};

pub use core::coordinator::{
    BackgroundTasks, CircuitBreaker, CircuitBreakerConfig, CircuitState, CoordinationError,
    CoordinationRequest, CoordinationResult, CoordinationService, CoordinationSummary,
    CoordinatorConfig, HealthStatus, Priority, Provider, ProviderDescriptor, ProviderError,
    ProviderId, ProviderMetrics, ProviderStatusReport, SelectionStrategy,
};
pub use core::health::{HealthCheckOutcome, HealthMonitor, HealthMonitorConfig, HealthThresholds};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Crate description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
