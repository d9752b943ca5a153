use std::time::Instant;

use axum::extract::{FromRef, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

/// State for the operational endpoints.
#[derive(Clone, FromRef)]
pub struct HealthState {
    pub pool: SqlitePool,
    pub started_at: Instant,
}

impl HealthState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            started_at: Instant::now(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Health check handler.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(
    State(pool): State<SqlitePool>,
    State(started_at): State<Instant>,
) -> Json<HealthResponse> {
    let db_status = match crate::db::ping(&pool).await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {e}"),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        db: db_status,
        uptime_seconds: started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/ping",
    responses((status = 200, description = "Always pong", body = String)),
    tag = "health"
)]
pub async fn ping() -> &'static str {
    "pong"
}

pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health_check))
        .with_state(state)
}
