use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common;

#[tokio::test]
async fn test_get_todo_success() {
    let (app, _pool) = common::test_app().await;
    let id = common::create_test_todo(&app, "Fetch me", Some("details")).await;

    let (status, response) = common::get(&app, &format!("/todos/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["id"], id);
    assert_eq!(response["title"], "Fetch me");
    assert_eq!(response["description"], "details");
    assert_eq!(response["completed"], false);
}

#[tokio::test]
async fn test_get_todo_not_found() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::get(&app, "/todos/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["kind"], "NotFound");
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn test_get_todo_invalid_id() {
    let (app, _pool) = common::test_app().await;
    for bad in ["abc", "-1", "1.5", "0x10"] {
        let (status, response) = common::get(&app, &format!("/todos/{bad}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "id {bad}");
        assert_eq!(response["kind"], "BadRequest");
    }
}

#[tokio::test]
async fn test_get_todo_id_beyond_range() {
    let (app, _pool) = common::test_app().await;
    let (status, _) = common::get(&app, "/todos/18446744073709551615").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_todo_undecodable_id() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::get(&app, "/todos/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["kind"], "BadRequest");
    assert!(response["error"].is_string());
}
