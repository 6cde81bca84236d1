mod support;

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use secretscan_core::{Finding, ScanReport};
use support::{FailingFetcher, StaticEngine, TempFetcher};

fn standalone_server(
    fetcher: Arc<dyn secretscan_core::ArtifactFetcher>,
    report: ScanReport,
) -> TestServer {
    let (state, _sink) = support::test_state(fetcher, Arc::new(StaticEngine { report }), 1);
    TestServer::new(secretscan_server::routes::standalone_router(state)).unwrap()
}

#[tokio::test]
async fn zero_findings_still_returns_identity_and_timestamps() {
    let server = standalone_server(
        Arc::new(TempFetcher),
        ScanReport {
            image_id: "sha256:abcdef".to_string(),
            findings: vec![],
        },
    );

    let response = server
        .post("/secret-scan")
        .json(&json!({ "image_name_with_tag": "nginx:latest" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["node_id"], "nginx:latest");
    assert_eq!(body["node_name"], "nginx:latest");
    assert_eq!(body["image_id"], "sha256:abcdef");
    assert_eq!(body["findings"], json!([]));
    assert!(body["time_stamp"].is_i64());
    assert!(body["@timestamp"].is_string());
    assert!(body["scan_id"].is_string());
}

#[tokio::test]
async fn findings_are_returned_inline_with_their_declared_fields() {
    let server = standalone_server(
        Arc::new(TempFetcher),
        ScanReport {
            image_id: "sha256:feed".to_string(),
            findings: vec![Finding {
                rule_id: 12,
                rule_name: "Slack Token".to_string(),
                part: "contents".to_string(),
                matched_content: "xoxb-****".to_string(),
                severity: "medium".to_string(),
                severity_score: 6.5,
                full_filename: "app/config.yml".to_string(),
            }],
        },
    );

    let response = server
        .post("/secret-scan")
        .json(&json!({ "image_name_with_tag": "app:1.0" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let findings = body["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["rule_name"], "Slack Token");
    assert_eq!(findings[0]["severity_score"], 6.5);
    assert_eq!(findings[0]["full_filename"], "app/config.yml");
}

#[tokio::test]
async fn empty_image_name_is_a_bad_request() {
    let server = standalone_server(Arc::new(TempFetcher), ScanReport::default());

    let response = server
        .post("/secret-scan")
        .json(&json!({ "image_name_with_tag": "   " }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn scan_failure_maps_to_bad_gateway_with_error_body() {
    let server = standalone_server(
        Arc::new(FailingFetcher {
            message: "no such image".to_string(),
        }),
        ScanReport::default(),
    );

    let response = server
        .post("/secret-scan")
        .json(&json!({ "image_name_with_tag": "ghost:0" }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("no such image"));
}

#[tokio::test]
async fn ping_responds_with_pong() {
    let server = standalone_server(Arc::new(TempFetcher), ScanReport::default());
    let response = server.get("/secret-scan/ping").await;
    response.assert_status_ok();
    response.assert_text("pong");
}
