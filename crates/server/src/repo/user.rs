use async_trait::async_trait;
use chrono::Utc;
use shared_types::{NewUser, User, UserChanges};

use super::{Record, SqlStore, StoreError, StoreResult, UserStore};
use crate::context::RequestContext;

/// SQLite adapter for [`UserStore`].
pub type SqliteUserStore = SqlStore<User>;

impl Record for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, name, created_at, updated_at";
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS users (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
    "#;
}

#[async_trait]
impl UserStore for SqlStore<User> {
    #[tracing::instrument(skip(self, ctx, user), fields(name = %user.name))]
    async fn create(&self, ctx: &RequestContext, user: NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let query = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, created_at, updated_at)
            VALUES (?, ?, ?)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(now)
        .bind(now);

        ctx.run(query.fetch_one(self.pool())).await
    }

    async fn get(&self, ctx: &RequestContext, id: i64) -> StoreResult<User> {
        self.fetch(ctx, id).await
    }

    async fn list(&self, ctx: &RequestContext) -> StoreResult<Vec<User>> {
        self.fetch_all(ctx).await
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: UserChanges,
    ) -> StoreResult<User> {
        let query = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name       = COALESCE(?, name),
                updated_at = ?
            WHERE id = ?
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(changes.name)
        .bind(Utc::now())
        .bind(id);

        ctx.run(query.fetch_optional(self.pool()))
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    #[tracing::instrument(skip(self, ctx))]
    async fn delete(&self, ctx: &RequestContext, id: i64) -> StoreResult<()> {
        self.remove(ctx, id).await
    }
}
