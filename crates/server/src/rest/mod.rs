pub mod todo;
pub mod user;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use shared_types::AppError;

use crate::db::AppState;

/// Build the resource router. Collection routes answer with and without a
/// trailing slash.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Todos
        .route("/todos", get(todo::list_todos))
        .route("/todos", post(todo::create_todo))
        .route("/todos/", get(todo::list_todos))
        .route("/todos/", post(todo::create_todo))
        .route("/todos/{id}", get(todo::get_todo))
        .route("/todos/{id}", patch(todo::update_todo))
        .route("/todos/{id}", delete(todo::delete_todo))
        // Users
        .route("/api/users", get(user::list_users))
        .route("/api/users", post(user::create_user))
        .route("/api/users/", get(user::list_users))
        .route("/api/users/", post(user::create_user))
        .route("/api/users/{id}", get(user::get_user))
        .route("/api/users/{id}", patch(user::update_user))
        .route("/api/users/{id}", delete(user::delete_user))
}

/// Parse an `{id}` path segment.
///
/// Anything but ASCII digits is a 400. A well-formed id beyond the store's
/// key range cannot exist, so it is reported as not found without a lookup.
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::bad_request(format!("Invalid id: {raw:?}")));
    }
    let id: u64 = raw
        .parse()
        .map_err(|_| AppError::bad_request(format!("Invalid id: {raw:?}")))?;
    i64::try_from(id).map_err(|_| AppError::not_found(format!("Record {raw} not found")))
}
