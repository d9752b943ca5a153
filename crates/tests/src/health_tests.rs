use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use metrics_exporter_prometheus::PrometheusBuilder;
use pretty_assertions::assert_eq;

use crate::common;

#[tokio::test]
async fn test_ping() {
    let (app, _pool) = common::test_app().await;
    let req = Request::builder().uri("/ping").body(Body::empty()).unwrap();
    let (status, _, body) = common::send_raw(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"pong");
}

#[tokio::test]
async fn test_health_reports_database() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "ok");
    assert_eq!(response["db"], "connected");
    assert!(response["uptimeSeconds"].is_u64());
    assert!(response["version"].is_string());
}

#[tokio::test]
async fn test_health_after_pool_close() {
    let (app, pool) = common::test_app().await;
    pool.close().await;
    let (status, response) = common::get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["db"].as_str().unwrap().starts_with("error"));
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let (app, pool) = common::test_app().await;
    pool.close().await;
    let (status, response) = common::get(&app, "/todos").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["kind"], "DatabaseError");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (app, _pool) = common::test_app().await;
    let req = Request::builder()
        .uri("/ping")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = common::send_raw(&app, req).await;
    assert_eq!(headers.get("x-request-id").unwrap(), "abc-123");
}

#[tokio::test]
async fn test_metrics_route_only_when_enabled() {
    let (app, _pool) = common::test_app().await;
    let (status, _) = common::get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let handle = PrometheusBuilder::new().build_recorder().handle();
    let (app, _pool) = common::test_app_with_metrics(handle).await;
    let (status, _) = common::get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_swagger_serves_openapi_document() {
    let (app, _pool) = common::test_app().await;
    let (status, doc) = common::get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/todos/{id}"].is_object());
}
