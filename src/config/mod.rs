//! Configuration management for the coordination service
//!
//! This module handles loading, validation and conversion of the service
//! configuration into runtime settings.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::coordinator::circuit_breaker::CircuitBreakerConfig;
use crate::core::coordinator::config::CoordinatorConfig;
use crate::core::coordinator::provider::ProviderDescriptor;
use crate::core::coordinator::strategy::SelectionStrategy;
use crate::core::health::{HealthMonitorConfig, HealthThresholds};
use crate::utils::error::{Result, ServiceError};
use crate::utils::logging::{LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "COORDINATOR_";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub coordinator: CoordinatorSettings,
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerSettings,
    #[serde(default)]
    pub health: HealthSettings,
    #[serde(default)]
    pub metrics: MetricsSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Static provider descriptors; executors are supplied in code
    #[serde(default)]
    pub providers: Vec<ProviderDescriptor>,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServiceError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ServiceError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Defaults with `COORDINATOR_*` environment overrides applied
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up by full variable name
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `COORDINATOR_DEFAULT_STRATEGY` | `coordinator.default_strategy` |
    /// | `COORDINATOR_DEFAULT_TIMEOUT_MS` | `coordinator.default_timeout_ms` |
    /// | `COORDINATOR_DEFAULT_MAX_RETRIES` | `coordinator.default_max_retries` |
    /// | `COORDINATOR_FAILURE_THRESHOLD` | `circuit_breaker.failure_threshold` |
    /// | `COORDINATOR_RECOVERY_TIMEOUT_SECS` | `circuit_breaker.recovery_timeout_secs` |
    /// | `COORDINATOR_HEALTH_CHECK_INTERVAL_SECS` | `health.check_interval_secs` |
    /// | `COORDINATOR_PROBE_TIMEOUT_MS` | `health.probe_timeout_ms` |
    /// | `COORDINATOR_PROBES_ENABLED` | `health.probes_enabled` |
    /// | `COORDINATOR_AGGREGATION_INTERVAL_SECS` | `metrics.aggregation_interval_secs` |
    /// | `COORDINATOR_LOG_LEVEL` | `logging.level` |
    /// | `COORDINATOR_LOG_FORMAT` | `logging.format` (`pretty` or `json`) |
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(value) = var("DEFAULT_STRATEGY") {
            self.coordinator.default_strategy =
                parse_override::<SelectionStrategy>("DEFAULT_STRATEGY", &value)?;
        }
        if let Some(value) = var("DEFAULT_TIMEOUT_MS") {
            self.coordinator.default_timeout_ms = parse_override("DEFAULT_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = var("DEFAULT_MAX_RETRIES") {
            self.coordinator.default_max_retries = parse_override("DEFAULT_MAX_RETRIES", &value)?;
        }
        if let Some(value) = var("FAILURE_THRESHOLD") {
            self.circuit_breaker.failure_threshold = parse_override("FAILURE_THRESHOLD", &value)?;
        }
        if let Some(value) = var("RECOVERY_TIMEOUT_SECS") {
            self.circuit_breaker.recovery_timeout_secs =
                parse_override("RECOVERY_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = var("HEALTH_CHECK_INTERVAL_SECS") {
            self.health.check_interval_secs =
                parse_override("HEALTH_CHECK_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = var("PROBE_TIMEOUT_MS") {
            self.health.probe_timeout_ms = parse_override("PROBE_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = var("PROBES_ENABLED") {
            self.health.probes_enabled = parse_override("PROBES_ENABLED", &value)?;
        }
        if let Some(value) = var("AGGREGATION_INTERVAL_SECS") {
            self.metrics.aggregation_interval_secs =
                parse_override("AGGREGATION_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = var("LOG_FORMAT") {
            self.logging.format = match value.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                other => {
                    return Err(ServiceError::Config(format!(
                        "Invalid {}LOG_FORMAT '{}': expected pretty or json",
                        ENV_PREFIX, other
                    )));
                }
            };
        }

        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.coordinator
            .validate()
            .map_err(|e| ServiceError::Config(format!("Coordinator config error: {}", e)))?;

        self.circuit_breaker
            .validate()
            .map_err(|e| ServiceError::Config(format!("Circuit breaker config error: {}", e)))?;

        self.health
            .validate()
            .map_err(|e| ServiceError::Config(format!("Health config error: {}", e)))?;

        self.metrics
            .validate()
            .map_err(|e| ServiceError::Config(format!("Metrics config error: {}", e)))?;

        self.providers
            .as_slice()
            .validate()
            .map_err(|e| ServiceError::Config(format!("Provider config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Runtime coordinator settings
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            default_strategy: self.coordinator.default_strategy,
            default_timeout: Duration::from_millis(self.coordinator.default_timeout_ms),
            default_max_retries: self.coordinator.default_max_retries,
            circuit_breaker: CircuitBreakerConfig {
                failure_threshold: self.circuit_breaker.failure_threshold,
                recovery_timeout: Duration::from_secs(self.circuit_breaker.recovery_timeout_secs),
            },
            health: self.health_monitor_config(),
            aggregation_interval: Duration::from_secs(self.metrics.aggregation_interval_secs),
            shutdown_grace: Duration::from_secs(self.coordinator.shutdown_grace_secs),
        }
    }

    pub fn health_monitor_config(&self) -> HealthMonitorConfig {
        HealthMonitorConfig {
            check_interval: Duration::from_secs(self.health.check_interval_secs),
            probe_timeout: Duration::from_millis(self.health.probe_timeout_ms),
            thresholds: HealthThresholds {
                degraded_load_percent: self.health.degraded_load_percent,
                overloaded_load_percent: self.health.overloaded_load_percent,
                min_success_rate: self.health.min_success_rate,
            },
            probes_enabled: self.health.probes_enabled,
        }
    }

    /// Configured descriptors with capability lists de-duplicated
    pub fn provider_descriptors(&self) -> Vec<ProviderDescriptor> {
        self.providers
            .iter()
            .map(|p| ProviderDescriptor::new(p.id.clone(), p.capabilities.iter().cloned(), p.capacity))
            .collect()
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ServiceError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_override<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        ServiceError::Config(format!("Invalid {}{} '{}': {}", ENV_PREFIX, name, value, e))
    })
}
