//! Configuration integration tests
//!
//! Load a YAML file from disk, apply overrides and build a running service.

use crate::common::{Script, ScriptedProvider};
use request_coordinator::{
    CoordinationRequest, CoordinationService, Config, LogFormat, Provider, SelectionStrategy,
    ServiceError,
};
use serde_json::json;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

const CONFIG_YAML: &str = r#"
coordinator:
  default_strategy: round_robin
  default_timeout_ms: 800
  default_max_retries: 1

circuit_breaker:
  failure_threshold: 3
  recovery_timeout_secs: 15

health:
  check_interval_secs: 10
  probes_enabled: false

metrics:
  aggregation_interval_secs: 30

logging:
  level: warn
  format: json

providers:
  - id: vision
    capabilities: [image, ocr]
    capacity: 4
  - id: reader
    capabilities: [ocr]
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn executors(ids: &[&str]) -> HashMap<String, Arc<dyn Provider>> {
    ids.iter()
        .map(|id| {
            let provider: Arc<dyn Provider> = ScriptedProvider::new(id, Script::Succeed);
            (id.to_string(), provider)
        })
        .collect()
}

#[tokio::test]
async fn test_service_from_config_file() {
    let file = write_config(CONFIG_YAML);
    let config = Config::from_file(file.path()).await.unwrap();

    assert_eq!(config.logging.format, LogFormat::Json);
    let runtime = config.coordinator_config();
    assert_eq!(runtime.default_strategy, SelectionStrategy::RoundRobin);
    assert_eq!(runtime.default_timeout, Duration::from_millis(800));
    assert_eq!(runtime.circuit_breaker.failure_threshold, 3);
    assert_eq!(runtime.aggregation_interval, Duration::from_secs(30));
    assert!(!runtime.health.probes_enabled);

    let service =
        CoordinationService::from_config(&config, executors(&["vision", "reader", "spare"]))
            .unwrap();
    assert_eq!(service.list_providers(), vec!["vision", "reader"]);

    // Default strategy from the file alternates between the two ocr providers
    let first = service
        .coordinate(CoordinationRequest::new("ocr", json!("scan")), None)
        .await
        .unwrap();
    let second = service
        .coordinate(CoordinationRequest::new("ocr", json!("scan")), None)
        .await
        .unwrap();
    assert_ne!(first.provider_id, second.provider_id);

    let image = service
        .coordinate(CoordinationRequest::new("image", json!("png")), None)
        .await
        .unwrap();
    assert_eq!(image.provider_id, "vision");
}

#[tokio::test]
async fn test_missing_executor_is_rejected() {
    let config = Config::from_yaml_str(CONFIG_YAML).unwrap();
    let err = CoordinationService::from_config(&config, executors(&["vision"])).unwrap_err();
    assert!(matches!(err, ServiceError::UnknownProvider(id) if id == "reader"));
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_file(dir.path().join("absent.yaml")).await;
    assert!(result.is_err());
}

#[test]
fn test_overrides_apply_on_top_of_file() {
    let mut config = Config::from_yaml_str(CONFIG_YAML).unwrap();
    config
        .apply_overrides(|key| match key {
            "COORDINATOR_DEFAULT_STRATEGY" => Some("least_loaded".to_string()),
            "COORDINATOR_DEFAULT_MAX_RETRIES" => Some("4".to_string()),
            _ => None,
        })
        .unwrap();

    let runtime = config.coordinator_config();
    assert_eq!(runtime.default_strategy, SelectionStrategy::LeastLoaded);
    assert_eq!(runtime.default_max_retries, 4);
    // Untouched values keep the file's settings
    assert_eq!(runtime.default_timeout, Duration::from_millis(800));
}

#[test]
fn test_yaml_round_trip_preserves_config() {
    let config = Config::from_yaml_str(CONFIG_YAML).unwrap();
    let yaml = config.to_yaml().unwrap();
    assert_eq!(Config::from_yaml_str(&yaml).unwrap(), config);
}
