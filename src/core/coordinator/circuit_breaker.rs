//! Per-provider circuit breaker
//!
//! ```text
//! Closed --(consecutive failures >= threshold)--> Open
//! Open --(recovery timeout elapsed, checked lazily on allow())--> HalfOpen
//! HalfOpen --(success)--> Closed
//! HalfOpen --(failure)--> Open (timestamp reset)
//! ```
//!
//! Half-open hands out a single trial permit: the first `allow()` after the
//! recovery timeout returns true, later calls return false until the trial's
//! outcome is recorded.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Requests flow normally
    Closed,
    /// Requests are rejected
    Open,
    /// A single trial request is allowed
    HalfOpen,
}

/// Circuit breaker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// Time spent open before a trial request is allowed
    pub recovery_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
        }
    }
}

/// Point-in-time view of a breaker
#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerSnapshot {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub failure_threshold: u32,
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    consecutive_failures: u32,
    last_transition: Instant,
    trial_in_flight: bool,
}

/// Failure-gating state machine for one provider
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    /// Create a closed breaker
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                last_transition: Instant::now(),
                trial_in_flight: false,
            }),
        }
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Gate check for a request about to be sent
    ///
    /// Performs the lazy Open -> HalfOpen transition and consumes the
    /// half-open trial permit.
    pub fn allow(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                if inner.last_transition.elapsed() >= self.config.recovery_timeout {
                    info!(provider = %self.name, "circuit breaker half-open, allowing trial request");
                    inner.state = CircuitState::HalfOpen;
                    inner.last_transition = Instant::now();
                    inner.trial_in_flight = true;
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    false
                } else {
                    inner.trial_in_flight = true;
                    true
                }
            }
        }
    }

    /// Whether `allow()` would currently return true, without changing state
    ///
    /// Used while building the eligible set so that filtering does not burn
    /// the half-open trial permit.
    pub fn would_allow(&self) -> bool {
        let inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => inner.last_transition.elapsed() >= self.config.recovery_timeout,
            CircuitState::HalfOpen => !inner.trial_in_flight,
        }
    }

    /// Record a successful outcome
    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::HalfOpen => {
                info!(provider = %self.name, "circuit breaker closed after successful trial");
                inner.state = CircuitState::Closed;
                inner.last_transition = Instant::now();
                inner.trial_in_flight = false;
                inner.consecutive_failures = 0;
            }
            CircuitState::Closed => inner.consecutive_failures = 0,
            // A request admitted before the circuit opened finished late;
            // the open window stands.
            CircuitState::Open => {
                debug!(provider = %self.name, "success recorded while circuit open, ignoring");
            }
        }
    }

    /// Record a failed outcome
    ///
    /// Returns true when this failure opened the circuit.
    pub fn record_failure(&self) -> bool {
        let mut inner = self.inner.lock();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);

        match inner.state {
            CircuitState::Closed => {
                if inner.consecutive_failures >= self.config.failure_threshold {
                    warn!(
                        provider = %self.name,
                        failures = inner.consecutive_failures,
                        "circuit breaker opening"
                    );
                    inner.state = CircuitState::Open;
                    inner.last_transition = Instant::now();
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                warn!(provider = %self.name, "trial request failed, circuit breaker re-opening");
                inner.state = CircuitState::Open;
                inner.last_transition = Instant::now();
                inner.trial_in_flight = false;
                true
            }
            CircuitState::Open => false,
        }
    }

    /// Hand back an unused half-open permit
    ///
    /// Called when an admitted request is abandoned before it produced an
    /// outcome, so the next caller can take the trial instead.
    pub(crate) fn release_trial(&self) {
        let mut inner = self.inner.lock();
        if inner.state == CircuitState::HalfOpen && inner.trial_in_flight {
            debug!(provider = %self.name, "half-open trial abandoned, permit released");
            inner.trial_in_flight = false;
        }
    }

    /// Current state, without the lazy recovery check
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.inner.lock().consecutive_failures
    }

    pub fn snapshot(&self) -> CircuitBreakerSnapshot {
        let inner = self.inner.lock();
        CircuitBreakerSnapshot {
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            failure_threshold: self.config.failure_threshold,
        }
    }
}
