//! Provider abstraction
//!
//! A provider is any backend that can execute one or more capabilities. The
//! coordinator never looks inside a payload or a result: both travel as
//! `serde_json::Value` so in-process functions, RPC clients and subprocess
//! wrappers can all sit behind the same trait object.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider identifier (unique within a registry)
pub type ProviderId = String;

/// Errors a provider can return from `execute` or `health_check`
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Application-level failure reported by the provider
    #[error("execution failed: {0}")]
    Execution(String),

    /// The provider was asked for a capability it does not serve
    #[error("capability not supported: {0}")]
    Unsupported(String),

    /// The provider is not reachable (used mostly by liveness probes)
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider future panicked; the payload message is kept when it is a string
    #[error("provider panicked: {0}")]
    Panicked(String),

    /// Any other cause
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProviderError {
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Uniform outbound interface to a backend
///
/// The deadline is enforced by the coordinator, not by the provider: a
/// provider future may be dropped mid-flight when its request times out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Execute `capability` with an opaque payload
    async fn execute(&self, capability: &str, payload: Value) -> Result<Value, ProviderError>;

    /// Liveness probe used by the health monitor
    ///
    /// Providers without a cheap probe can rely on the default, which always
    /// reports the provider as live.
    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Static description of a provider
///
/// The first capability is the provider's *primary* capability; the
/// capability-based strategy prefers providers whose primary capability
/// matches the request exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Unique provider id
    pub id: ProviderId,
    /// Declared capabilities, primary first
    pub capabilities: Vec<String>,
    /// Concurrency capacity (0 means load is always reported as 0%)
    #[serde(default = "default_capacity")]
    pub capacity: u32,
}

fn default_capacity() -> u32 {
    10
}

impl ProviderDescriptor {
    /// Create a descriptor; duplicate capabilities are dropped, order is kept
    pub fn new<I, S>(id: impl Into<ProviderId>, capabilities: I, capacity: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for capability in capabilities {
            let capability = capability.into();
            if !deduped.contains(&capability) {
                deduped.push(capability);
            }
        }

        Self {
            id: id.into(),
            capabilities: deduped,
            capacity,
        }
    }

    /// Whether this provider declares `capability`
    pub fn supports(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// The primary (first declared) capability
    pub fn primary_capability(&self) -> Option<&str> {
        self.capabilities.first().map(String::as_str)
    }
}
