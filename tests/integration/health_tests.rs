//! Health monitoring integration tests
//!
//! The monitor runs next to live traffic and steers selection away from
//! providers whose probes fail.

use crate::common::{Script, service_with, test_config};
use request_coordinator::{
    CoordinationRequest, HealthMonitor, HealthMonitorConfig, HealthStatus,
};
use serde_json::json;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_failed_probe_steers_traffic_away() {
    let (service, providers) = service_with(
        test_config(5, Duration::from_secs(60)),
        "analysis",
        &[("primary", Script::Succeed), ("standby", Script::Succeed)],
    );
    providers[0].set_live(false);

    let tasks = service.start_background_tasks();
    assert_eq!(tasks.active_tasks(), 2);

    // First health pass runs on the initial tick
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(
        service.registry().get("primary").unwrap().status(),
        HealthStatus::Unavailable
    );

    let result = service
        .coordinate(CoordinationRequest::new("analysis", json!(1)), None)
        .await
        .unwrap();
    assert_eq!(result.provider_id, "standby");
    assert_eq!(providers[0].calls(), 0);

    // Probe recovers, next pass restores eligibility
    providers[0].set_live(true);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(
        service.registry().get("primary").unwrap().status(),
        HealthStatus::Healthy
    );
    assert!(providers[0].probes() >= 2);

    assert!(tasks.shutdown().await);
    assert!(tasks.is_shutting_down());
}

#[tokio::test(start_paused = true)]
async fn test_aggregation_loop_publishes_summary() {
    let (service, _providers) = service_with(
        test_config(5, Duration::from_secs(60)),
        "analysis",
        &[("a", Script::Succeed)],
    );
    assert_eq!(service.published_summary().total_requests, 0);

    let tasks = service.start_background_tasks();
    service
        .coordinate(CoordinationRequest::new("analysis", json!(null)), None)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let published = service.published_summary();
    assert_eq!(published.total_requests, 1);
    assert_eq!(published.provider_count, 1);

    assert!(tasks.shutdown().await);
}

#[tokio::test]
async fn test_monitor_over_shared_registry() {
    let (service, providers) = service_with(
        test_config(5, Duration::from_secs(60)),
        "analysis",
        &[("a", Script::Succeed), ("b", Script::Succeed)],
    );
    providers[1].set_live(false);

    let monitor = HealthMonitor::new(service.registry().clone(), HealthMonitorConfig::default());
    let outcomes = monitor.check_all().await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].status, HealthStatus::Healthy);
    assert!(!outcomes[0].changed());
    assert_eq!(outcomes[1].status, HealthStatus::Unavailable);
    assert!(outcomes[1].changed());
    assert!(outcomes[1].probe_error.as_deref().unwrap().contains("b is down"));

    assert_eq!(service.eligible_providers("analysis").len(), 1);
}
