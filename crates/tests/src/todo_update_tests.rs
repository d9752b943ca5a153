use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common;

#[tokio::test]
async fn test_update_todo_example_scenario() {
    let (app, _pool) = common::test_app().await;
    let (status, created) = common::post_json(
        &app,
        "/todos",
        r#"{"title":"Test Todo","description":"Test Description"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);

    let (status, body) = common::patch_json(&app, "/todos/1", r#"{"completed":true}"#).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, fetched) = common::get(&app, "/todos/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["completed"], true);
    assert_eq!(fetched["title"], "Test Todo");
    assert_eq!(fetched["description"], "Test Description");
}

#[tokio::test]
async fn test_update_todo_empty_body_changes_nothing_but_timestamp() {
    let (app, _pool) = common::test_app().await;
    let id = common::create_test_todo(&app, "stable", Some("text")).await;
    common::patch_json(&app, &format!("/todos/{id}"), r#"{"completed":true}"#).await;
    let (_, before) = common::get(&app, &format!("/todos/{id}")).await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (status, _) = common::patch_json(&app, &format!("/todos/{id}"), "{}").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = common::get(&app, &format!("/todos/{id}")).await;
    assert_eq!(after["title"], before["title"]);
    assert_eq!(after["description"], before["description"]);
    assert_eq!(after["completed"], true);
    assert_eq!(after["createdAt"], before["createdAt"]);
    assert_ne!(after["updatedAt"], before["updatedAt"]);
}

#[tokio::test]
async fn test_update_todo_explicit_false_clears_completed() {
    let (app, _pool) = common::test_app().await;
    let id = common::create_test_todo(&app, "flip", None).await;
    let uri = format!("/todos/{id}");

    common::patch_json(&app, &uri, r#"{"completed":true}"#).await;
    let (status, _) = common::patch_json(&app, &uri, r#"{"completed":false}"#).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, fetched) = common::get(&app, &uri).await;
    assert_eq!(fetched["completed"], false);
}

#[tokio::test]
async fn test_update_todo_without_completed_keeps_flag() {
    let (app, _pool) = common::test_app().await;
    let id = common::create_test_todo(&app, "keep", None).await;
    let uri = format!("/todos/{id}");

    common::patch_json(&app, &uri, r#"{"completed":true}"#).await;
    let (status, _) = common::patch_json(&app, &uri, r#"{"title":"renamed"}"#).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, fetched) = common::get(&app, &uri).await;
    assert_eq!(fetched["title"], "renamed");
    assert_eq!(fetched["completed"], true);
}

#[tokio::test]
async fn test_update_todo_empty_description_clears_it() {
    let (app, _pool) = common::test_app().await;
    let id = common::create_test_todo(&app, "t", Some("to be cleared")).await;
    let uri = format!("/todos/{id}");

    let (status, _) = common::patch_json(&app, &uri, r#"{"description":""}"#).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, fetched) = common::get(&app, &uri).await;
    assert!(fetched.get("description").is_none());
}

#[tokio::test]
async fn test_update_todo_not_found() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::patch_json(&app, "/todos/999", r#"{"title":"x"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["kind"], "NotFound");
}

#[tokio::test]
async fn test_update_todo_invalid_id() {
    let (app, _pool) = common::test_app().await;
    let (status, _) = common::patch_json(&app, "/todos/abc", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_todo_rejects_bad_bodies() {
    let (app, _pool) = common::test_app().await;
    let id = common::create_test_todo(&app, "guarded", None).await;
    let uri = format!("/todos/{id}");

    for body in [
        r#"{"completed":null}"#,
        r#"{"completed":"true"}"#,
        r#"{"title":"   "}"#,
        "not json",
    ] {
        let (status, _) = common::patch_json(&app, &uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
    }

    let (_, fetched) = common::get(&app, &uri).await;
    assert_eq!(fetched["title"], "guarded");
    assert_eq!(fetched["completed"], false);
}
