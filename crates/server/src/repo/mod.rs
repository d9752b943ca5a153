//! Persistence ports and their SQLite adapters.
//!
//! Handlers depend only on the [`TodoStore`] and [`UserStore`] traits; the
//! adapters in [`todo`] and [`user`] implement them on top of the generic
//! [`SqlStore`].

pub mod sql;
pub mod todo;
pub mod user;

use async_trait::async_trait;
use shared_types::{NewTodo, NewUser, Todo, TodoChanges, User, UserChanges};
use thiserror::Error;

use crate::context::RequestContext;

pub use sql::{Record, SqlStore};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record has the requested id.
    #[error("record {0} not found")]
    NotFound(i64),

    /// The caller's context was cancelled before the operation finished.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline passed before the operation finished.
    #[error("operation deadline exceeded")]
    DeadlineExceeded,

    /// Storage engine failure: connectivity, constraint, pool timeout.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// True for failures caused by the caller going away, not the store.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StoreError::Cancelled | StoreError::DeadlineExceeded)
    }
}

/// Todo persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Inserts a record; the store assigns id, timestamps and
    /// `completed = false`.
    async fn create(&self, ctx: &RequestContext, todo: NewTodo) -> StoreResult<Todo>;

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record has `id`.
    async fn get(&self, ctx: &RequestContext, id: i64) -> StoreResult<Todo>;

    /// All records; an empty store yields an empty vector.
    async fn list(&self, ctx: &RequestContext) -> StoreResult<Vec<Todo>>;

    /// Overwrites only the fields set in `changes` and refreshes
    /// `updated_at`, even when `changes` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record has `id`.
    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: TodoChanges,
    ) -> StoreResult<Todo>;

    /// Hard delete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record has `id`.
    async fn delete(&self, ctx: &RequestContext, id: i64) -> StoreResult<()>;
}

/// User persistence contract. Same semantics as [`TodoStore`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, ctx: &RequestContext, user: NewUser) -> StoreResult<User>;

    async fn get(&self, ctx: &RequestContext, id: i64) -> StoreResult<User>;

    async fn list(&self, ctx: &RequestContext) -> StoreResult<Vec<User>>;

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: UserChanges,
    ) -> StoreResult<User>;

    async fn delete(&self, ctx: &RequestContext, id: i64) -> StoreResult<()>;
}
