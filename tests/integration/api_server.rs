//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and the refresh protocol.

#[path = "api_server/test_utils.rs"]
mod test_utils;

use serde_json::Value;
use std::time::Duration;

use test_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["suburbs"], 0);
    assert!(body["lastUpdate"].is_null());
    assert!(body["uptimeSeconds"].as_u64().is_some());
}

#[tokio::test]
async fn suburbs_are_empty_before_the_first_cycle() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/suburbs").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn refresh_populates_the_store() {
    let app = TestApiServer::new().await;
    let response = app.server.post("/api/refresh").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["suburbs"], 3);
    assert_eq!(body["report"]["attempted"], 3);
    assert_eq!(body["report"]["succeeded"], 3);
    assert_eq!(body["report"]["skipped"], 0);

    let list: Value = app.server.get("/api/suburbs").await.json();
    let suburbs = list.as_array().unwrap();
    assert_eq!(suburbs.len(), 3);
    for suburb in suburbs {
        let score = suburb["currentMetrics"]["signalScore"].as_u64().unwrap();
        assert!(score <= 100);
        assert!(suburb["currentMetrics"]["riskLevel"].is_string());
        assert!(suburb["currentMetrics"]["prediction12m"].is_number());
    }
}

#[tokio::test]
async fn get_suburb_by_name_round_trips_the_record() {
    let app = TestApiServer::new().await;
    app.server.post("/api/refresh").await;

    let response = app.server.get("/api/suburbs/Ponsonby").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["name"], "Ponsonby");
    assert_eq!(body["region"], "Auckland");
    assert_eq!(body["territorialAuthority"], "Auckland");
    assert_eq!(body["classification"], "inner");
    assert!(body["id"].as_u64().unwrap() >= 1);
    assert!(body["currentMetrics"]["medianPrice"].is_number());
    assert!(body["currentMetrics"]["lastUpdated"].is_string());
}

#[tokio::test]
async fn unknown_suburb_returns_not_found() {
    let app = TestApiServer::new().await;
    app.server.post("/api/refresh").await;

    let response = app.server.get("/api/suburbs/Atlantis").await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"], "Suburb not found");
}

#[tokio::test]
async fn concurrent_refresh_is_rejected_with_conflict() {
    let app = TestApiServer::with_entity_delay(Duration::from_millis(100)).await;

    let background = {
        let orchestrator = app.orchestrator.clone();
        tokio::spawn(async move { orchestrator.run_cycle().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let response = app.server.post("/api/refresh").await;
    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("already running"));

    let report = background.await.unwrap().unwrap();
    assert_eq!(report.succeeded, 3);
}

#[tokio::test]
async fn health_reflects_the_store_after_a_refresh() {
    let app = TestApiServer::new().await;
    app.server.post("/api/refresh").await;

    let body: Value = app.server.get("/api/health").await.json();
    assert_eq!(body["suburbs"], 3);
    assert!(body["lastUpdate"].is_string());
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    app.server.post("/api/refresh").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(
        body.contains("http_requests_total"),
        "Expected http_requests_total metric"
    );
    assert!(
        body.contains("refresh_cycles_total"),
        "Expected refresh_cycles_total metric"
    );
    assert!(
        body.contains("entities_processed_total"),
        "Expected entities_processed_total metric"
    );
}

#[tokio::test]
async fn index_lists_the_endpoints() {
    let app = TestApiServer::new().await;
    let body: Value = app.server.get("/").await.json();
    assert!(body["endpoints"]["/api/suburbs"].is_string());
    assert!(body["endpoints"]["/api/refresh"].is_string());
}
