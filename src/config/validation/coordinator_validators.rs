//! Coordinator configuration validators

use super::Validate;
use crate::config::models::*;
use crate::core::coordinator::provider::ProviderDescriptor;
use std::collections::HashSet;
use tracing::debug;

impl Validate for CoordinatorSettings {
    fn validate(&self) -> Result<(), String> {
        if self.default_timeout_ms == 0 {
            return Err("Default timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for CircuitBreakerSettings {
    fn validate(&self) -> Result<(), String> {
        if self.failure_threshold == 0 {
            return Err("Circuit breaker failure threshold must be greater than 0".to_string());
        }

        if self.recovery_timeout_secs == 0 {
            return Err("Circuit breaker recovery timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for HealthSettings {
    fn validate(&self) -> Result<(), String> {
        if self.check_interval_secs == 0 {
            return Err("Health check interval must be greater than 0".to_string());
        }

        if self.probe_timeout_ms == 0 {
            return Err("Health probe timeout must be greater than 0".to_string());
        }

        for (name, value) in [
            ("degraded_load_percent", self.degraded_load_percent),
            ("overloaded_load_percent", self.overloaded_load_percent),
            ("min_success_rate", self.min_success_rate),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{} must be between 0 and 100, got {}", name, value));
            }
        }

        if self.degraded_load_percent >= self.overloaded_load_percent {
            return Err(format!(
                "degraded_load_percent ({}) must be below overloaded_load_percent ({})",
                self.degraded_load_percent, self.overloaded_load_percent
            ));
        }

        Ok(())
    }
}

impl Validate for MetricsSettings {
    fn validate(&self) -> Result<(), String> {
        if self.aggregation_interval_secs == 0 {
            return Err("Metrics aggregation interval must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for ProviderDescriptor {
    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Provider id cannot be empty".to_string());
        }

        if self.capabilities.is_empty() {
            return Err(format!("Provider '{}' declares no capabilities", self.id));
        }

        if self.capabilities.iter().any(|c| c.trim().is_empty()) {
            return Err(format!("Provider '{}' declares an empty capability", self.id));
        }

        Ok(())
    }
}

impl Validate for [ProviderDescriptor] {
    fn validate(&self) -> Result<(), String> {
        debug!(providers = self.len(), "Validating provider descriptors");

        let mut seen = HashSet::new();
        for descriptor in self {
            descriptor.validate()?;
            if !seen.insert(descriptor.id.as_str()) {
                return Err(format!("Duplicate provider id '{}'", descriptor.id));
            }
        }

        Ok(())
    }
}
