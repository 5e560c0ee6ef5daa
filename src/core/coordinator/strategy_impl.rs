//! Selection strategy implementations
//!
//! All functions expect candidates in registration order and return `None`
//! only when nothing is left to choose from.

use super::provider::ProviderId;
use super::strategy::Candidate;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};

/// Round-robin over the eligible set
///
/// The cursor advances once per selection; the index wraps over however many
/// candidates are eligible right now.
pub fn round_robin(candidates: &[Candidate], cursor: &AtomicUsize) -> Option<ProviderId> {
    if candidates.is_empty() {
        return None;
    }
    let index = cursor.fetch_add(1, Relaxed) % candidates.len();
    Some(candidates[index].id.clone())
}

/// Lowest load percentage, lowest id on tie
pub fn least_loaded<'a, I>(candidates: I) -> Option<ProviderId>
where
    I: IntoIterator<Item = &'a Candidate>,
{
    candidates
        .into_iter()
        .min_by(|a, b| by_metric_then_id(a.load_percentage, b.load_percentage, a, b))
        .map(|c| c.id.clone())
}

/// Lowest mean response time, lowest id on tie
///
/// Providers with no recorded requests rank as 0ms, which deliberately puts
/// new providers ahead of measured ones so they get discovered quickly.
pub fn fastest_response(candidates: &[Candidate]) -> Option<ProviderId> {
    candidates
        .iter()
        .min_by(|a, b| {
            by_metric_then_id(
                a.effective_response_time_ms(),
                b.effective_response_time_ms(),
                a,
                b,
            )
        })
        .map(|c| c.id.clone())
}

/// Least loaded among exact primary-capability matches, else among all
pub fn capability_based(capability: &str, candidates: &[Candidate]) -> Option<ProviderId> {
    let primary: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.primary_capability.as_deref() == Some(capability))
        .collect();

    if primary.is_empty() {
        least_loaded(candidates.iter())
    } else {
        least_loaded(primary)
    }
}

/// Least loaded, skipping the provider that was already tried
pub fn failover(candidates: &[Candidate], exclude: Option<&str>) -> Option<ProviderId> {
    least_loaded(
        candidates
            .iter()
            .filter(|c| Some(c.id.as_str()) != exclude),
    )
}

fn by_metric_then_id(a_metric: f64, b_metric: f64, a: &Candidate, b: &Candidate) -> Ordering {
    a_metric.total_cmp(&b_metric).then_with(|| a.id.cmp(&b.id))
}
