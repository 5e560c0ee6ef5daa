//! Provider test utilities
//!
//! Scripted in-process providers. Each one counts its calls and probes so
//! tests can assert exactly how often the coordinator reached it.

use parking_lot::Mutex;
use request_coordinator::{Provider, ProviderError};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What a scripted provider does when executed
#[derive(Debug, Clone)]
pub enum Script {
    /// Echo the payload back
    Succeed,
    /// Return an execution error
    Fail,
    /// Fail the first `n` calls, then succeed
    FailTimes(usize),
    /// Sleep, then succeed
    Slow(Duration),
}

#[derive(Debug)]
pub struct ScriptedProvider {
    pub id: String,
    script: Mutex<Script>,
    live: Mutex<bool>,
    calls: AtomicUsize,
    probes: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(id: &str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            script: Mutex::new(script),
            live: Mutex::new(true),
            calls: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn set_script(&self, script: Script) {
        *self.script.lock() = script;
    }

    /// Make the liveness probe fail (`false`) or pass (`true`)
    pub fn set_live(&self, live: bool) {
        *self.live.lock() = live;
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    async fn execute(&self, capability: &str, payload: Value) -> Result<Value, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().clone();
        match script {
            Script::Succeed => {}
            Script::Fail => return Err(ProviderError::execution(format!("{} failed", self.id))),
            Script::FailTimes(n) if call < n => {
                return Err(ProviderError::execution(format!("{} failed call {}", self.id, call)));
            }
            Script::FailTimes(_) => {}
            Script::Slow(delay) => tokio::time::sleep(delay).await,
        }
        Ok(json!({ "provider": self.id, "capability": capability, "payload": payload }))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if *self.live.lock() {
            Ok(())
        } else {
            Err(ProviderError::unavailable(format!("{} is down", self.id)))
        }
    }
}
