use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common;

#[tokio::test]
async fn test_list_todos_empty() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::get(&app, "/todos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!([]));
}

#[tokio::test]
async fn test_list_todos_trailing_slash() {
    let (app, _pool) = common::test_app().await;
    common::create_test_todo(&app, "one", None).await;
    let (status, response) = common::get(&app, "/todos/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_todos_returns_all() {
    let (app, _pool) = common::test_app().await;
    let a = common::create_test_todo(&app, "first", Some("has text")).await;
    let b = common::create_test_todo(&app, "second", None).await;

    let (status, response) = common::get(&app, "/todos").await;
    assert_eq!(status, StatusCode::OK);

    let items = response.as_array().unwrap();
    assert_eq!(items.len(), 2);

    let first = items.iter().find(|t| t["id"] == a).unwrap();
    assert_eq!(first["description"], "has text");
    let second = items.iter().find(|t| t["id"] == b).unwrap();
    assert!(second.get("description").is_none());
}
