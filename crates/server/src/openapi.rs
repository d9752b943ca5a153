use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use shared_types::{
    AppError, AppErrorKind, CreateTodoRequest, CreateUserRequest, TodoResponse,
    UpdateTodoRequest, UpdateUserRequest, UserResponse,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use utoipa::openapi::server::Server;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::context::{attach_request_context, RequestTimeout};
use crate::db::AppState;
use crate::error_convert::panic_response;
use crate::health::{self, HealthResponse, HealthState};
use crate::rest;
use crate::telemetry::{track_metrics, AccessLogLayer};

pub const SWAGGER_PATH: &str = "/api/swagger";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        rest::todo::list_todos,
        rest::todo::create_todo,
        rest::todo::get_todo,
        rest::todo::update_todo,
        rest::todo::delete_todo,
        rest::user::list_users,
        rest::user::create_user,
        rest::user::get_user,
        rest::user::update_user,
        rest::user::delete_user,
        health::health_check,
        health::ping,
    ),
    components(schemas(
        TodoResponse,
        CreateTodoRequest,
        UpdateTodoRequest,
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        AppError,
        AppErrorKind,
        HealthResponse,
    )),
    tags(
        (name = "todos", description = "To-do item management"),
        (name = "users", description = "User management"),
        (name = "health", description = "Liveness and health checks")
    ),
    info(
        title = "restful-sample API",
        description = "REST CRUD service for to-do items and users",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The generated document, advertising `base_url` as its server when set.
    pub fn document(base_url: Option<&str>) -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(url) = base_url {
            doc.servers = Some(vec![Server::new(url)]);
        }
        doc
    }
}

/// Assemble the complete HTTP application: resource routes, operational
/// routes and the middleware stack.
///
/// Request flow, outermost first: request id, access log, metrics, panic
/// recovery, request context, handler.
pub fn app_router(
    state: AppState,
    health: HealthState,
    config: &AppConfig,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let mut router = Router::new()
        .merge(rest::api_router())
        .with_state(state)
        .merge(health::health_router(health));

    if let Some(handle) = metrics {
        router = router.route("/metrics", get(move || std::future::ready(handle.render())));
    }

    if config.swagger.enabled {
        let doc = ApiDoc::document(config.swagger.base_url.as_deref());
        router = router.merge(SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_JSON_PATH, doc));
    }

    router
        .layer(middleware::from_fn_with_state(
            RequestTimeout(config.server.request_timeout()),
            attach_request_context,
        ))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(track_metrics))
        .layer(AccessLogLayer::new(config.log.skip_paths.clone()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
