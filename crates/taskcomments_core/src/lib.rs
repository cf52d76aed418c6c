//! Core domain logic for task comments.
//! This crate is the single source of truth for comment invariants.

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use form::comment_form::{CommentDraft, CommentForm, CommentFormError, FormMode};
pub use logging::{default_log_level, init_logging, logging_status, LoggingOptions};
pub use model::comment::{
    Comment, CommentChanges, CommentId, CommentValidationError, FieldUpdate, NewComment,
};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::comment_service::{CommentService, CommentServiceError, CommentServiceResult};
pub use service::task_service::{TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
