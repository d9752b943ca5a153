use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::repo::todo::SqliteTodoStore;
use crate::repo::user::SqliteUserStore;
use crate::repo::{TodoStore, UserStore};

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract `State<Arc<dyn TodoStore>>`
/// directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub todos: Arc<dyn TodoStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(todos: impl TodoStore + 'static, users: impl UserStore + 'static) -> Self {
        Self {
            todos: Arc::new(todos),
            users: Arc::new(users),
        }
    }

    /// SQLite-backed stores sharing one pool.
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self::new(
            SqliteTodoStore::new(pool.clone()),
            SqliteUserStore::new(pool),
        )
    }
}

/// Open a connection pool for `config`.
///
/// An in-memory database lives only as long as a connection to it, so that
/// case pins one connection with no idle or lifetime expiry.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.dsn)?.create_if_missing(true);

    let pool_options = if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
    };

    pool_options
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
}

/// Round-trip a trivial query.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Create every table the stores need.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    SqliteTodoStore::new(pool.clone()).ensure_schema().await?;
    SqliteUserStore::new(pool.clone()).ensure_schema().await?;
    Ok(())
}
