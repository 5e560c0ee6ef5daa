//! Coordination integration tests
//!
//! Retry, failover and circuit breaking driven through `coordinate`.

use crate::common::{Script, service_with, test_config};
use request_coordinator::{
    CircuitState, CoordinationError, CoordinationRequest, HealthStatus, Priority,
    SelectionStrategy,
};
use serde_json::json;
use std::time::Duration;

fn request(capability: &str) -> CoordinationRequest {
    CoordinationRequest::new(capability, json!({ "text": "hello" }))
}

#[tokio::test]
async fn test_failover_to_second_provider() {
    let (service, providers) = service_with(
        test_config(5, Duration::from_secs(60)),
        "analysis",
        &[("alpha", Script::Fail), ("beta", Script::Succeed)],
    );

    let result = service
        .coordinate(request("analysis").with_max_retries(2), None)
        .await
        .unwrap();

    assert_eq!(result.provider_id, "beta");
    assert_eq!(result.attempts, 2);
    assert_eq!(result.strategy, SelectionStrategy::LeastLoaded);
    assert_eq!(result.result["provider"], "beta");
    assert_eq!(providers[0].calls(), 1);
    assert_eq!(providers[1].calls(), 1);
}

#[tokio::test]
async fn test_retry_budget_bounds_invocations() {
    let (service, providers) = service_with(
        test_config(10, Duration::from_secs(60)),
        "analysis",
        &[
            ("a", Script::Fail),
            ("b", Script::Fail),
            ("c", Script::Fail),
            ("d", Script::Fail),
        ],
    );

    let err = service
        .coordinate(request("analysis").with_max_retries(2), None)
        .await
        .unwrap_err();

    let total: usize = providers.iter().map(|p| p.calls()).sum();
    assert_eq!(total, 3);
    match err {
        CoordinationError::ProviderFailed { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_transient_failure_recovers_on_same_provider() {
    let (service, providers) = service_with(
        test_config(5, Duration::from_secs(60)),
        "render",
        &[("solo", Script::FailTimes(1))],
    );

    // A lone provider cannot fail over to itself
    let err = service
        .coordinate(request("render").with_max_retries(3), None)
        .await
        .unwrap_err();
    assert_eq!(err.provider(), Some("solo"));
    assert_eq!(providers[0].calls(), 1);

    let result = service.coordinate(request("render"), None).await.unwrap();
    assert_eq!(result.attempts, 1);
    assert_eq!(providers[0].calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_circuit_trips_and_recovers() {
    let recovery = Duration::from_secs(30);
    let (service, providers) = service_with(
        test_config(2, recovery),
        "analysis",
        &[("flaky", Script::Fail)],
    );
    let entry = service.registry().get("flaky").unwrap();

    for _ in 0..2 {
        let err = service
            .coordinate(request("analysis").with_max_retries(0), None)
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }
    assert_eq!(entry.breaker.state(), CircuitState::Open);
    assert_eq!(entry.status(), HealthStatus::CircuitOpen);

    // Open circuit makes the provider ineligible; it is not called again
    let err = service.coordinate(request("analysis"), None).await.unwrap_err();
    assert!(matches!(err, CoordinationError::NoProviderAvailable { .. }));
    assert_eq!(providers[0].calls(), 2);

    providers[0].set_script(Script::Succeed);
    tokio::time::advance(recovery + Duration::from_millis(1)).await;

    let result = service.coordinate(request("analysis"), None).await.unwrap();
    assert_eq!(result.provider_id, "flaky");
    assert_eq!(entry.breaker.state(), CircuitState::Closed);
    assert_eq!(entry.status(), HealthStatus::Healthy);
}

#[tokio::test]
async fn test_round_robin_through_coordinate() {
    let (service, _providers) = service_with(
        test_config(5, Duration::from_secs(60)),
        "search",
        &[("a", Script::Succeed), ("b", Script::Succeed), ("c", Script::Succeed)],
    );

    let mut order = Vec::new();
    for _ in 0..6 {
        let result = service
            .coordinate(request("search"), Some(SelectionStrategy::RoundRobin))
            .await
            .unwrap();
        order.push(result.provider_id);
    }

    assert_eq!(order, ["a", "b", "c", "a", "b", "c"]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out_and_fails_over() {
    let (service, providers) = service_with(
        test_config(5, Duration::from_secs(60)),
        "analysis",
        &[
            ("a-slow", Script::Slow(Duration::from_secs(10))),
            ("b-fast", Script::Succeed),
        ],
    );

    let result = service
        .coordinate(request("analysis").with_timeout_ms(100), None)
        .await
        .unwrap();

    assert_eq!(result.provider_id, "b-fast");
    assert_eq!(result.attempts, 2);
    assert_eq!(providers[0].calls(), 1);

    let slow = service.registry().get("a-slow").unwrap().metrics();
    assert_eq!(slow.failed_requests, 1);
    assert_eq!(slow.in_flight, 0);
}

#[tokio::test]
async fn test_coordinate_capability_convenience() {
    let (service, _providers) = service_with(
        test_config(5, Duration::from_secs(60)),
        "translate",
        &[("t1", Script::Succeed)],
    );

    let result = service
        .coordinate_capability("translate", json!("bonjour"), Priority::High, 1000, 1)
        .await
        .unwrap();

    assert_eq!(result.priority, Priority::High);
    assert_eq!(result.result["payload"], "bonjour");
    assert!(result.completed_at >= result.started_at);
}

#[tokio::test]
async fn test_unknown_capability_is_reported() {
    let (service, providers) = service_with(
        test_config(5, Duration::from_secs(60)),
        "analysis",
        &[("a", Script::Succeed)],
    );

    let err = service.coordinate(request("teleport"), None).await.unwrap_err();

    assert_eq!(err.kind(), "no_provider_available");
    assert_eq!(providers[0].calls(), 0);
}

#[tokio::test]
async fn test_summary_tracks_mixed_outcomes() {
    let (service, _providers) = service_with(
        test_config(5, Duration::from_secs(60)),
        "analysis",
        &[("a", Script::Succeed)],
    );

    service.coordinate(request("analysis"), None).await.unwrap();
    service.coordinate(request("analysis"), None).await.unwrap();
    service.coordinate(request("nothing"), None).await.unwrap_err();

    let summary = service.coordination_summary();
    assert_eq!(summary.total_requests, 3);
    assert_eq!(summary.successful_requests, 2);
    assert_eq!(summary.failed_requests, 1);
    assert_eq!(summary.provider_count, 1);
    assert_eq!(summary.open_circuit_count, 0);

    let status = service.provider_status();
    assert_eq!(status["a"].success_rate, 100.0);
    assert_eq!(status["a"].in_flight, 0);
}
