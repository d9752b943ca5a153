use std::{
    future::Future,
    net::SocketAddr,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};

use axum::{
    body::{Body, HttpBody},
    extract::{ConnectInfo, MatchedPath, Request},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use shared_types::AppError;
use thiserror::Error;
use tower::{Layer, Service};
use tracing::Level;
use tracing_subscriber::{filter::ParseError, EnvFilter};

use crate::config::{LogConfig, LogFormat};

// ---------------------------------------------------------------------------
// Subscriber
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level {level:?}: {source}")]
    Filter {
        level: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Install(Box<dyn std::error::Error + Send + Sync>),
}

/// Install the global `tracing` subscriber. `RUST_LOG` wins over
/// `config.level` when set.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|source| LoggingError::Filter {
            level: config.level.clone(),
            source,
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.color)
        .with_target(true);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Console => builder.try_init(),
    }
    .map_err(LoggingError::Install)
}

// ---------------------------------------------------------------------------
// Access log
// ---------------------------------------------------------------------------

/// Tower layer writing one access record per request.
///
/// Responses carrying an [`AppError`] in their extensions additionally get a
/// single `error`-level "request failed" record, also for skipped paths.
#[derive(Clone, Default)]
pub struct AccessLogLayer {
    skip_paths: Arc<[String]>,
}

impl AccessLogLayer {
    pub fn new(skip_paths: Vec<String>) -> Self {
        Self {
            skip_paths: skip_paths.into(),
        }
    }
}

impl<S> Layer<S> for AccessLogLayer {
    type Service = AccessLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessLogService {
            inner,
            skip_paths: self.skip_paths.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AccessLogService<S> {
    inner: S,
    skip_paths: Arc<[String]>,
}

/// Request attributes captured before the request is handed on.
struct RequestInfo {
    host: String,
    client_ip: String,
    method: String,
    path: String,
    referer: String,
    user_agent: String,
}

impl RequestInfo {
    fn from_request(req: &Request<Body>) -> Self {
        let headers = req.headers();
        Self {
            host: header_str(headers, header::HOST)
                .or_else(|| req.uri().host())
                .unwrap_or("-")
                .to_string(),
            client_ip: client_ip(req),
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            referer: header_str(headers, header::REFERER).unwrap_or("-").to_string(),
            user_agent: header_str(headers, header::USER_AGENT)
                .unwrap_or("-")
                .to_string(),
        }
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Peer address from connect info, else the first `X-Forwarded-For` hop.
fn client_ip(req: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    header_str(req.headers(), header::HeaderName::from_static("x-forwarded-for"))
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "-".to_string())
}

fn level_for(status: u16) -> Level {
    match status {
        500.. => Level::ERROR,
        400..=499 => Level::WARN,
        _ => Level::INFO,
    }
}

macro_rules! access_event {
    ($level:expr, $info:expr, $status:expr, $latency:expr, $bytes:expr) => {
        tracing::event!(
            $level,
            host = %$info.host,
            status = $status,
            latency = ?$latency,
            client_ip = %$info.client_ip,
            method = %$info.method,
            path = %$info.path,
            referer = %$info.referer,
            user_agent = %$info.user_agent,
            bytes = $bytes,
            "request"
        )
    };
}

fn log_access(info: &RequestInfo, response: &Response, latency: std::time::Duration) {
    let status = response.status().as_u16();
    let bytes = response.body().size_hint().exact().unwrap_or(0);
    match level_for(status) {
        Level::ERROR => access_event!(Level::ERROR, info, status, latency, bytes),
        Level::WARN => access_event!(Level::WARN, info, status, latency, bytes),
        _ => access_event!(Level::INFO, info, status, latency, bytes),
    }
}

impl<S> Service<Request<Body>> for AccessLogService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let start = Instant::now();
        let info = RequestInfo::from_request(&req);
        let skip = self.skip_paths.iter().any(|p| *p == info.path);

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let future = inner.call(req);

        Box::pin(async move {
            let response = future.await?;

            if let Some(err) = response.extensions().get::<AppError>() {
                tracing::error!(
                    kind = %err.kind,
                    error = %err.message,
                    method = %info.method,
                    path = %info.path,
                    "request failed"
                );
            }
            if !skip {
                log_access(&info, &response, start.elapsed());
            }

            Ok(response)
        })
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";

const DURATION_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

fn prometheus_builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), &DURATION_BUCKETS)
}

/// Install the process-wide Prometheus recorder. Only one recorder can be
/// installed per process.
pub fn install_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = prometheus_builder()?.install_recorder()?;
    metrics::describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests");
    metrics::describe_histogram!(
        REQUEST_DURATION,
        metrics::Unit::Seconds,
        "HTTP request latency"
    );
    tracing::info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// Middleware recording request count and latency. `path` is the matched
/// route template so ids do not explode label cardinality.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = req.method().to_string();
    let host = header_str(req.headers(), header::HOST)
        .unwrap_or("-")
        .to_string();

    let response = next.run(req).await;

    let code = response.status().as_u16().to_string();
    metrics::counter!(
        REQUESTS_TOTAL,
        "host" => host,
        "path" => path.clone(),
        "method" => method.clone(),
        "code" => code.clone()
    )
    .increment(1);
    metrics::histogram!(
        REQUEST_DURATION,
        "path" => path,
        "method" => method,
        "code" => code
    )
    .record(start.elapsed().as_secs_f64());

    response
}
