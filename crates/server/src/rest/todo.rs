use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use shared_types::{
    AppError, CreateTodoRequest, NewTodo, TodoChanges, TodoResponse, UpdateTodoRequest,
};

use super::parse_id;
use crate::context::RequestContext;
use crate::error_convert::{ApiJson, ApiPath, ValidateRequest};
use crate::repo::TodoStore;

// ---------------------------------------------------------------------------
// GET /todos
// ---------------------------------------------------------------------------

/// List every to-do item.
#[utoipa::path(
    get,
    path = "/todos",
    responses(
        (status = 200, description = "To-do list, possibly empty", body = Vec<TodoResponse>),
        (status = 500, description = "Store failure", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(store, ctx))]
pub async fn list_todos(
    State(store): State<Arc<dyn TodoStore>>,
    ctx: RequestContext,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let todos = store.list(&ctx).await?;
    let response: Vec<TodoResponse> = todos.into_iter().map(TodoResponse::from).collect();
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// POST /todos
// ---------------------------------------------------------------------------

/// Create a new to-do item.
#[utoipa::path(
    post,
    path = "/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "To-do created", body = TodoResponse),
        (status = 400, description = "Malformed body or missing title", body = AppError),
        (status = 500, description = "Store failure", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(store, ctx))]
pub async fn create_todo(
    State(store): State<Arc<dyn TodoStore>>,
    ctx: RequestContext,
    ApiJson(body): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    body.validate_request()?;

    let todo = store.create(&ctx, NewTodo::from(body)).await?;
    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

// ---------------------------------------------------------------------------
// GET /todos/{id}
// ---------------------------------------------------------------------------

/// Get a single to-do item by ID.
#[utoipa::path(
    get,
    path = "/todos/{id}",
    params(("id" = u64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "To-do found", body = TodoResponse),
        (status = 400, description = "Non-numeric id", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 500, description = "Store failure", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(store, ctx))]
pub async fn get_todo(
    State(store): State<Arc<dyn TodoStore>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = parse_id(&id)?;

    let todo = store.get(&ctx, id).await?;
    Ok(Json(TodoResponse::from(todo)))
}

// ---------------------------------------------------------------------------
// PATCH /todos/{id}
// ---------------------------------------------------------------------------

/// Partially update a to-do item. Omitted fields keep their stored value;
/// `completed` is only touched when the key is present.
#[utoipa::path(
    patch,
    path = "/todos/{id}",
    params(("id" = u64, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 204, description = "To-do updated"),
        (status = 400, description = "Non-numeric id or malformed body", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 500, description = "Store failure", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(store, ctx))]
pub async fn update_todo(
    State(store): State<Arc<dyn TodoStore>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<UpdateTodoRequest>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    body.check()?;

    store.update(&ctx, id, TodoChanges::from(body)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// DELETE /todos/{id}
// ---------------------------------------------------------------------------

/// Delete a to-do item.
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    params(("id" = u64, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "To-do deleted"),
        (status = 400, description = "Non-numeric id", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 500, description = "Store failure", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(store, ctx))]
pub async fn delete_todo(
    State(store): State<Arc<dyn TodoStore>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;

    store.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
