//! Concurrency integration tests
//!
//! Many requests in flight at once against a mix of healthy, failing and
//! slow providers. Whatever the interleaving, every slot is released and
//! every request is counted exactly once.

use crate::common::{Script, service_with, test_config};
use futures::future::join_all;
use proptest::prelude::*;
use request_coordinator::{CoordinationRequest, SelectionStrategy};
use serde_json::json;
use std::time::Duration;

fn script_strategy() -> impl Strategy<Value = Script> {
    prop_oneof![
        Just(Script::Succeed),
        Just(Script::Fail),
        (1usize..4).prop_map(Script::FailTimes),
        (1u64..20).prop_map(|ms| Script::Slow(Duration::from_millis(ms))),
    ]
}

fn selection_strategy() -> impl Strategy<Value = SelectionStrategy> {
    prop_oneof![
        Just(SelectionStrategy::RoundRobin),
        Just(SelectionStrategy::LeastLoaded),
        Just(SelectionStrategy::FastestResponse),
        Just(SelectionStrategy::CapabilityBased),
        Just(SelectionStrategy::Failover),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_in_flight_released_and_requests_counted(
        scripts in proptest::collection::vec(script_strategy(), 1..5),
        strategy in selection_strategy(),
        requests in 1usize..40,
        max_retries in 0u32..3,
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let ids: Vec<String> = (0..scripts.len()).map(|i| format!("p{i}")).collect();
            let providers: Vec<(&str, Script)> = ids
                .iter()
                .map(String::as_str)
                .zip(scripts.iter().cloned())
                .collect();
            let (service, handles) =
                service_with(test_config(3, Duration::from_secs(60)), "work", &providers);

            let calls = (0..requests).map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .coordinate(
                            CoordinationRequest::new("work", json!(i))
                                .with_timeout_ms(50)
                                .with_max_retries(max_retries),
                            Some(strategy),
                        )
                        .await
                })
            });
            let results = join_all(calls).await;

            let mut ok = 0u64;
            for joined in results {
                match joined.unwrap() {
                    Ok(result) => {
                        ok += 1;
                        prop_assert!(result.attempts >= 1);
                        prop_assert!(result.attempts <= max_retries + 1);
                    }
                    Err(err) => {
                        prop_assert!(!err.kind().is_empty());
                    }
                }
            }

            for (id, report) in service.provider_status() {
                prop_assert_eq!(report.in_flight, 0, "provider {} leaked a slot", id);
            }

            let summary = service.coordination_summary();
            prop_assert_eq!(summary.total_requests, requests as u64);
            prop_assert_eq!(summary.successful_requests, ok);
            prop_assert_eq!(summary.failed_requests, requests as u64 - ok);

            let invocations: usize = handles.iter().map(|p| p.calls()).sum();
            prop_assert!(invocations <= requests * (max_retries as usize + 1));
            Ok(())
        })?;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_burst_spreads_load() {
    let (service, handles) = service_with(
        test_config(5, Duration::from_secs(60)),
        "work",
        &[
            ("a", Script::Slow(Duration::from_millis(20))),
            ("b", Script::Slow(Duration::from_millis(20))),
            ("c", Script::Slow(Duration::from_millis(20))),
        ],
    );

    let calls = (0..30).map(|i| {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .coordinate(CoordinationRequest::new("work", json!(i)), None)
                .await
        })
    });
    for joined in join_all(calls).await {
        joined.unwrap().unwrap();
    }

    // Least-loaded selection keeps every provider busy
    for handle in &handles {
        assert!(handle.calls() > 0, "provider {} was never used", handle.id);
    }
    assert_eq!(service.coordination_summary().successful_requests, 30);
}
