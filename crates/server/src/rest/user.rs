use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use shared_types::{
    AppError, CreateUserRequest, NewUser, UpdateUserRequest, UserChanges, UserResponse,
};

use super::parse_id;
use crate::context::RequestContext;
use crate::error_convert::{ApiJson, ApiPath, ValidateRequest};
use crate::repo::UserStore;

// ── Users ──────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(store, ctx))]
pub async fn list_users(
    State(store): State<Arc<dyn UserStore>>,
    ctx: RequestContext,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = store.list(&ctx).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(store, ctx))]
pub async fn create_user(
    State(store): State<Arc<dyn UserStore>>,
    ctx: RequestContext,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    body.validate_request()?;
    let user = store.create(&ctx, NewUser::from(body)).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Invalid id", body = AppError),
        (status = 404, description = "User not found", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(store, ctx))]
pub async fn get_user(
    State(store): State<Arc<dyn UserStore>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<UserResponse>, AppError> {
    let id = parse_id(&id)?;
    let user = store.get(&ctx, id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Invalid id or body", body = AppError),
        (status = 404, description = "User not found", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(store, ctx))]
pub async fn update_user(
    State(store): State<Arc<dyn UserStore>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<UpdateUserRequest>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    body.check()?;
    store.update(&ctx, id, UserChanges::from(body)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid id", body = AppError),
        (status = 404, description = "User not found", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(store, ctx))]
pub async fn delete_user(
    State(store): State<Arc<dyn UserStore>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    store.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
