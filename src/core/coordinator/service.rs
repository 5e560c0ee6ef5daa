//! Coordination service core structure
//!
//! One `CoordinationService` owns the provider registry, the round-robin
//! cursors and the service-wide aggregates. Construct one per process and
//! pass it around as `Arc<CoordinationService>`; there is no global state.

use super::background::BackgroundTasks;
use super::config::CoordinatorConfig;
use super::circuit_breaker::CircuitState;
use super::provider::{Provider, ProviderDescriptor, ProviderId};
use super::registry::{ProviderEntry, ProviderRegistry};
use super::summary::{CoordinationStats, CoordinationSummary, ProviderStatusReport};
use crate::config::Config;
use crate::core::health::HealthMonitor;
use crate::utils::error::{Result, ServiceError};
use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug)]
pub struct CoordinationService {
    pub(crate) registry: Arc<ProviderRegistry>,

    pub(crate) config: CoordinatorConfig,

    /// Round-robin cursors, one per capability
    pub(crate) round_robin_cursors: DashMap<String, AtomicUsize>,

    pub(crate) stats: Mutex<CoordinationStats>,

    /// Last summary produced by the aggregation loop
    pub(crate) published: ArcSwap<CoordinationSummary>,
}

impl CoordinationService {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            registry: Arc::new(ProviderRegistry::new()),
            config,
            round_robin_cursors: DashMap::new(),
            stats: Mutex::new(CoordinationStats::default()),
            published: ArcSwap::from_pointee(CoordinationSummary::empty()),
        }
    }

    /// Build a service from loaded configuration
    ///
    /// Every configured provider descriptor is paired with the executor of the
    /// same id from `executors`.
    pub fn from_config(
        config: &Config,
        mut executors: HashMap<ProviderId, Arc<dyn Provider>>,
    ) -> Result<Self> {
        let service = Self::new(config.coordinator_config());

        for descriptor in config.provider_descriptors() {
            let provider = executors
                .remove(&descriptor.id)
                .ok_or_else(|| ServiceError::UnknownProvider(descriptor.id.clone()))?;
            service.register_provider(descriptor, provider)?;
        }

        if !executors.is_empty() {
            let mut unused: Vec<_> = executors.into_keys().collect();
            unused.sort();
            debug!(providers = ?unused, "executors without a configured descriptor were ignored");
        }

        Ok(service)
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    // ========== Provider Management ==========

    pub fn register_provider(
        &self,
        descriptor: ProviderDescriptor,
        provider: Arc<dyn Provider>,
    ) -> Result<()> {
        let entry = ProviderEntry::new(descriptor, provider, self.config.circuit_breaker);
        self.registry.register(entry).map(|_| ())
    }

    pub fn remove_provider(&self, id: &str) -> bool {
        self.registry.remove(id).is_some()
    }

    pub fn list_providers(&self) -> Vec<ProviderId> {
        self.registry.ids()
    }

    // ========== Reporting ==========

    /// Status, success rate, load and mean response time per provider
    pub fn provider_status(&self) -> BTreeMap<ProviderId, ProviderStatusReport> {
        self.registry
            .entries()
            .into_iter()
            .map(|entry| {
                let metrics = entry.metrics();
                let report = ProviderStatusReport {
                    status: metrics.status,
                    success_rate: metrics.success_rate(),
                    load_percentage: metrics.load_percentage(),
                    mean_response_time_ms: metrics.mean_response_time_ms,
                    in_flight: metrics.in_flight,
                    circuit_state: entry.breaker.state(),
                };
                (entry.descriptor.id.clone(), report)
            })
            .collect()
    }

    /// Live service-wide summary
    pub fn coordination_summary(&self) -> CoordinationSummary {
        let stats = self.stats.lock().clone();
        let entries = self.registry.entries();
        let open_circuits = entries
            .iter()
            .filter(|entry| entry.breaker.state() == CircuitState::Open)
            .count();
        CoordinationSummary::from_stats(&stats, open_circuits, entries.len())
    }

    /// Summary published by the most recent aggregation tick
    pub fn published_summary(&self) -> Arc<CoordinationSummary> {
        self.published.load_full()
    }

    /// Recompute and publish the summary; one aggregation tick
    pub fn publish_summary(&self) -> Arc<CoordinationSummary> {
        let summary = Arc::new(self.coordination_summary());
        self.published.store(summary.clone());
        summary
    }

    // ========== Background Tasks ==========

    /// Start the health monitor and metrics aggregation loops
    ///
    /// Both loops exit when the returned handle is shut down.
    pub fn start_background_tasks(self: &Arc<Self>) -> BackgroundTasks {
        let tasks = BackgroundTasks::new(self.config.shutdown_grace);

        let monitor = HealthMonitor::new(self.registry.clone(), self.config.health.clone());
        tasks.spawn_cancellable("health-monitor", |token| monitor.run(token));

        let service = Arc::clone(self);
        tasks.spawn_cancellable("metrics-aggregation", |token| {
            service.run_metrics_aggregation(token)
        });

        tasks
    }

    async fn run_metrics_aggregation(self: Arc<Self>, token: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.aggregation_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_secs = self.config.aggregation_interval.as_secs(),
            "metrics aggregation started"
        );

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    let summary = self.publish_summary();
                    info!(
                        total = summary.total_requests,
                        success_rate = summary.success_rate,
                        mean_ms = summary.mean_coordination_time_ms,
                        open_circuits = summary.open_circuit_count,
                        "coordination summary"
                    );
                }
            }
        }

        info!("metrics aggregation stopped");
    }
}

impl Default for CoordinationService {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}
