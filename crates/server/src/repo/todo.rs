use async_trait::async_trait;
use chrono::Utc;
use shared_types::{NewTodo, Todo, TodoChanges};

use super::{Record, SqlStore, StoreError, StoreResult, TodoStore};
use crate::context::RequestContext;

/// SQLite adapter for [`TodoStore`].
pub type SqliteTodoStore = SqlStore<Todo>;

impl Record for Todo {
    const TABLE: &'static str = "todos";
    const COLUMNS: &'static str = "id, title, description, completed, created_at, updated_at";
    // AUTOINCREMENT: ids of deleted rows are never handed out again.
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS todos (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT    NOT NULL,
            description TEXT    NOT NULL DEFAULT '',
            completed   BOOLEAN NOT NULL DEFAULT 0,
            created_at  TEXT    NOT NULL,
            updated_at  TEXT    NOT NULL
        )
    "#;
}

#[async_trait]
impl TodoStore for SqlStore<Todo> {
    #[tracing::instrument(skip(self, ctx, todo), fields(title = %todo.title))]
    async fn create(&self, ctx: &RequestContext, todo: NewTodo) -> StoreResult<Todo> {
        let now = Utc::now();
        let query = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (title, description, completed, created_at, updated_at)
            VALUES (?, ?, 0, ?, ?)
            RETURNING id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(now)
        .bind(now);

        let created = ctx.run(query.fetch_one(self.pool())).await?;
        tracing::debug!(id = created.id, "todo inserted");
        Ok(created)
    }

    async fn get(&self, ctx: &RequestContext, id: i64) -> StoreResult<Todo> {
        self.fetch(ctx, id).await
    }

    async fn list(&self, ctx: &RequestContext) -> StoreResult<Vec<Todo>> {
        self.fetch_all(ctx).await
    }

    /// Absent fields keep their column value through `COALESCE`; there is
    /// no read-modify-write window.
    #[tracing::instrument(skip(self, ctx))]
    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: TodoChanges,
    ) -> StoreResult<Todo> {
        let query = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title       = COALESCE(?, title),
                description = COALESCE(?, description),
                completed   = COALESCE(?, completed),
                updated_at  = ?
            WHERE id = ?
            RETURNING id, title, description, completed, created_at, updated_at
            "#,
        )
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.completed)
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
