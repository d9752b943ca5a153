use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common;

#[tokio::test]
async fn test_user_crud_cycle() {
    let (app, _pool) = common::test_app().await;

    let (status, created) = common::post_json(&app, "/api/users", r#"{"name":"tester"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({"id": 1, "name": "tester"}));

    let (status, fetched) = common::get(&app, "/api/users/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _) = common::patch_json(&app, "/api/users/1", r#"{"name":"renamed"}"#).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, listed) = common::get(&app, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([{"id": 1, "name": "renamed"}]));

    let (status, _) = common::delete(&app, "/api/users/1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::get(&app, "/api/users/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_empty() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::get(&app, "/api/users/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!([]));
}

#[tokio::test]
async fn test_create_user_requires_name() {
    let (app, _pool) = common::test_app().await;
    for body in ["{}", r#"{"name":""}"#, "[]"] {
        let (status, _) = common::post_json(&app, "/api/users", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
    }
}

#[tokio::test]
async fn test_user_invalid_and_missing_ids() {
    let (app, _pool) = common::test_app().await;
    let (status, _) = common::get(&app, "/api/users/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::patch_json(&app, "/api/users/77", r#"{"name":"x"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::delete(&app, "/api/users/77").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_and_todos_are_independent() {
    let (app, _pool) = common::test_app().await;
    common::post_json(&app, "/api/users", r#"{"name":"owner"}"#).await;
    let (_, todos) = common::get(&app, "/todos").await;
    assert_eq!(todos, json!([]));
}

#[tokio::test]
async fn test_user_undecodable_id() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::delete(&app, "/api/users/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["kind"], "BadRequest");
}
