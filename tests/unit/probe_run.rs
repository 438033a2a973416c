//! Tests for the probe loop driving a mock internal service

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vpc_chain_tracer::config::Settings;
use vpc_chain_tracer::internal::InternalClient;
use vpc_chain_tracer::probe;

fn settings_for(base_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.internal.base_url = base_url.to_string();
    settings
}

#[tokio::test]
async fn test_run_makes_exactly_n_attempts_in_order() {
    let mock_b = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/diagnostic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "client_ip": "pod-1" })))
        .expect(20)
        .mount(&mock_b)
        .await;

    let client = InternalClient::new(&settings_for(&mock_b.uri()));
    let report = probe::run(&client, 20, 2, Duration::from_secs(5)).await;

    assert_eq!(report.total_calls, 20);
    assert_eq!(report.detailed_results.len(), 20);
    for (i, attempt) in report.detailed_results.iter().enumerate() {
        assert_eq!(attempt.call_number, (i + 1) as u32);
        assert!(attempt.success);
    }
}

#[tokio::test]
async fn test_run_records_missing_identifier_as_failure() {
    let mock_b = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/diagnostic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hostname": "b-1" })))
        .mount(&mock_b)
        .await;

    let client = InternalClient::new(&settings_for(&mock_b.uri()));
    let report = probe::run(&client, 5, 2, Duration::from_secs(5)).await;

    assert_eq!(report.detailed_results.len(), 5);
    for attempt in &report.detailed_results {
        assert!(!attempt.success);
        assert!(attempt.pod_ip.is_none());
        assert!(attempt
            .error
            .as_deref()
            .unwrap()
            .contains("missing client_ip"));
    }
    assert!(report.ip_distribution.is_empty());
    assert_eq!(report.unique_pod_ips_seen, 0);
}

#[tokio::test]
async fn test_run_respects_configured_fan_out() {
    let mock_b = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/diagnostic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "client_ip": "pod-1" })))
        .expect(3)
        .mount(&mock_b)
        .await;

    let client = InternalClient::new(&settings_for(&mock_b.uri()));
    let report = probe::run(&client, 3, 2, Duration::from_secs(5)).await;

    assert_eq!(report.total_calls, 3);
    assert_eq!(report.ip_distribution.get("pod-1"), Some(&json!(3)));
}
