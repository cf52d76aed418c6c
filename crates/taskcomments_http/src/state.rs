//! Shared request state.

use crate::error::ApiError;
use rusqlite::Connection;
use log::warn;
use std::sync::{Arc, Mutex, PoisonError};
use taskcomments_core::{
    CommentService, CommentServiceError, SqliteCommentRepository, SqliteTaskRepository,
    TaskService, TaskServiceError,
};

/// Connection handle shared by all handlers.
///
/// SQLite connections are not `Sync`; requests take turns on one connection
/// and each request holds the lock for exactly one store operation.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection (see `taskcomments_core::db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub(crate) async fn with_comment_service<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&CommentService<SqliteCommentRepository<'_>>) -> Result<T, CommentServiceError>
            + Send
            + 'static,
    {
        self.run(move |conn| {
            let repo = SqliteCommentRepository::try_new(conn).map_err(ApiError::storage)?;
            f(&CommentService::new(repo)).map_err(ApiError::from)
        })
        .await
    }

    pub(crate) async fn with_task_service<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&TaskService<SqliteTaskRepository<'_>>) -> Result<T, TaskServiceError>
            + Send
            + 'static,
    {
        self.run(move |conn| {
            let repo = SqliteTaskRepository::try_new(conn).map_err(ApiError::storage)?;
            f(&TaskService::new(repo)).map_err(ApiError::from)
        })
        .await
    }

    async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
    {
        let shared = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            // A panicking operation poisons the lock. Its open transaction was
            // rolled back on unwind, so the connection is still usable.
            let conn = shared.lock().unwrap_or_else(|poisoned| {
                warn!("event=connection_lock module=http status=recovered reason=poisoned");
                shared.clear_poison();
                PoisonError::into_inner(poisoned)
            });
            f(&conn)
        })
        .await
        .map_err(|err| ApiError::storage(format!("blocking task failed: {err}")))?
    }
}
