use std::marker::PhantomData;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use super::{StoreError, StoreResult};
use crate::context::RequestContext;

/// Table metadata for one persisted resource.
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    const TABLE: &'static str;
    /// Column list in `SELECT`/`RETURNING` order.
    const COLUMNS: &'static str;
    /// `CREATE TABLE IF NOT EXISTS` statement.
    const SCHEMA: &'static str;
}

/// SQLite-backed store for records of type `R`.
///
/// Holds only the pool; concurrent calls on different ids never wait on
/// each other beyond what SQLite itself serializes.
pub struct SqlStore<R> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for SqlStore<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> SqlStore<R> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(R::SCHEMA).execute(&self.pool).await?;
        tracing::debug!(table = R::TABLE, "schema ensured");
        Ok(())
    }

    pub(crate) async fn fetch(&self, ctx: &RequestContext, id: i64) -> StoreResult<R> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", R::COLUMNS, R::TABLE);
        let query = sqlx::query_as::<_, R>(&sql).bind(id);
        ctx.run(query.fetch_optional(&self.pool))
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    pub(crate) async fn fetch_all(&self, ctx: &RequestContext) -> StoreResult<Vec<R>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", R::COLUMNS, R::TABLE);
        let query = sqlx::query_as::<_, R>(&sql);
        ctx.run(query.fetch_all(&self.pool)).await
    }

    pub(crate) async fn remove(&self, ctx: &RequestContext, id: i64) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
        let result = ctx
            .run(sqlx::query(&sql).bind(id).execute(&self.pool))
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
