//! Coordination request and result types

use super::provider::ProviderId;
use super::strategy::SelectionStrategy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Request priority
///
/// Carried through to logs and results; the coordinator does not reorder
/// requests by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// A single unit of work
///
/// `timeout` and `max_retries` left as `None` take the service defaults.
#[derive(Debug, Clone)]
pub struct CoordinationRequest {
    pub id: String,
    pub capability: String,
    pub priority: Priority,
    pub payload: Value,
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    pub(crate) retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) completed_at: Option<DateTime<Utc>>,
}

impl CoordinationRequest {
    pub fn new(capability: impl Into<String>, payload: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            capability: capability.into(),
            priority: Priority::default(),
            payload,
            timeout: None,
            max_retries: None,
            retry_count: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_timeout_ms(self, timeout_ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(timeout_ms))
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Retries consumed so far
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

/// Output of a successful coordination
#[derive(Debug, Clone, Serialize)]
pub struct CoordinationResult {
    pub request_id: String,
    /// The provider's raw result
    pub result: Value,
    /// Provider that produced the result
    pub provider_id: ProviderId,
    /// Wall time from first selection to completion, including retries
    pub processing_time_ms: f64,
    /// Strategy used for the first attempt; retries always use failover
    pub strategy: SelectionStrategy,
    /// Provider invocations made, including the successful one
    pub attempts: u32,
    pub priority: Priority,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
