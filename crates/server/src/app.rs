//! Process lifecycle: explicit construction of every component in
//! dependency order, then serve until the shutdown token fires.

use std::future::IntoFuture;
use std::net::SocketAddr;

use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::SqlitePool;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::db::{self, AppState};
use crate::health::HealthState;
use crate::openapi::app_router;
use crate::telemetry::LoggingError;

/// Anything that stops the process before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    #[error("metrics setup failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// A fully wired application that has not started listening yet.
pub struct App {
    config: AppConfig,
    pool: SqlitePool,
    router: Router,
}

impl App {
    /// Connect and verify the database, create the schema and assemble the
    /// router.
    pub async fn build(
        config: AppConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, StartupError> {
        let pool = db::connect(&config.database).await?;
        db::ping(&pool).await?;
        db::ensure_schema(&pool).await?;
        info!(dsn = %config.database.dsn, "database ready");

        let state = AppState::sqlite(pool.clone());
        let health = HealthState::new(pool.clone());
        let router = app_router(state, health, &config, metrics);

        Ok(Self {
            config,
            pool,
            router,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bind and serve until `shutdown` is cancelled, then drain in-flight
    /// requests and close the pool, each bounded by the shutdown grace.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), StartupError> {
        let addr = self.config.server.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| StartupError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!(%addr, "listening");

        let grace = self.config.server.shutdown_grace();
        let serve = axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
        tokio::pin!(serve);

        tokio::select! {
            result = &mut serve => result.map_err(StartupError::Serve)?,
            () = shutdown.cancelled() => {
                info!(grace_secs = grace.as_secs(), "draining in-flight requests");
                match tokio::time::timeout(grace, &mut serve).await {
                    Ok(result) => result.map_err(StartupError::Serve)?,
                    Err(_) => warn!("grace period elapsed with requests still in flight"),
                }
            }
        }

        if tokio::time::timeout(grace, self.pool.close()).await.is_err() {
            warn!("database pool did not close within the grace period");
        }
        info!("shutdown complete");
        Ok(())
    }
}

/// Cancel the returned token on SIGINT or SIGTERM.
pub fn shutdown_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT, initiating shutdown"),
                        _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable, listening for SIGINT only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        trigger.cancel();
    });

    token
}
