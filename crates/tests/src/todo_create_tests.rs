use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common;

#[tokio::test]
async fn test_create_todo_success() {
    let (app, _pool) = common::test_app().await;
    let body = r#"{"title":"Test Todo","description":"Test Description"}"#;
    let (status, response) = common::post_json(&app, "/todos", body).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["id"], 1);
    assert_eq!(response["title"], "Test Todo");
    assert_eq!(response["description"], "Test Description");
    assert_eq!(response["completed"], false);
    assert!(response["createdAt"].is_string());
    assert!(response["updatedAt"].is_string());
    assert_eq!(response["createdAt"], response["updatedAt"]);
}

#[tokio::test]
async fn test_create_todo_trailing_slash() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::post_json(&app, "/todos/", r#"{"title":"slash"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["title"], "slash");
}

#[tokio::test]
async fn test_create_todo_without_description_omits_it() {
    let (app, pool) = common::test_app().await;
    let (status, response) = common::post_json(&app, "/todos", r#"{"title":"Buy milk"}"#).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(response.get("description").is_none());

    let stored: String = sqlx::query_scalar("SELECT description FROM todos WHERE id = ?")
        .bind(response["id"].as_i64().unwrap())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, "");
}

#[tokio::test]
async fn test_create_todo_ignores_completed() {
    let (app, _pool) = common::test_app().await;
    let (status, response) =
        common::post_json(&app, "/todos", r#"{"title":"eager","completed":true}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["completed"], false);
}

#[tokio::test]
async fn test_create_todo_missing_title() {
    let (app, _pool) = common::test_app().await;
    let (status, response) =
        common::post_json(&app, "/todos", r#"{"description":"no title"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn test_create_todo_blank_title() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::post_json(&app, "/todos", r#"{"title":"  "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["kind"], "ValidationError");
    assert!(response["fieldErrors"]["title"].is_string());
}

#[tokio::test]
async fn test_create_todo_malformed_json() {
    let (app, pool) = common::test_app().await;
    let (status, _) = common::post_json(&app, "/todos", "{\"title\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_create_todo_round_trip() {
    let (app, _pool) = common::test_app().await;
    let (_, created) = common::post_json(
        &app,
        "/todos",
        r#"{"title":"Round","description":"trip"}"#,
    )
    .await;

    let (status, fetched) =
        common::get(&app, &format!("/todos/{}", created["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}
