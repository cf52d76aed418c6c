//! Comment use-case service.
//!
//! # Responsibility
//! - Validate raw comment input (trim, required fields, widths).
//! - Orchestrate repository calls for list/create/get/update/delete.
//! - Translate repository failures into the `NotFound` / `Validation` /
//!   `Storage` taxonomy callers map to transport status codes.
//!
//! # Invariants
//! - Create validates the body before looking up the task, so an empty body
//!   is a validation failure even for unknown tasks.
//! - Update checks comment existence before validating the payload.
//! - One attempt per call; no retries.
//! - Log lines carry ids and timings only, never comment text.

use crate::model::comment::{
    Comment, CommentChanges, CommentId, CommentValidationError, FieldUpdate, NewComment,
};
use crate::model::task::TaskId;
use crate::repo::comment_repo::CommentRepository;
use crate::repo::RepoError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for comment use-cases.
#[derive(Debug)]
pub enum CommentServiceError {
    /// Referenced task does not exist.
    TaskNotFound(TaskId),
    /// Referenced comment does not exist.
    CommentNotFound(CommentId),
    /// Input rejected before touching storage.
    Validation(CommentValidationError),
    /// Storage failure; the transaction was rolled back.
    Storage(RepoError),
}

impl CommentServiceError {
    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TaskNotFound(_) => "task_not_found",
            Self::CommentNotFound(_) => "comment_not_found",
            Self::Validation(_) => "validation_failed",
            Self::Storage(_) => "storage_failed",
        }
    }
}

impl Display for CommentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::CommentNotFound(id) => write!(f, "comment not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for CommentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::TaskNotFound(_) | Self::CommentNotFound(_) => None,
        }
    }
}

impl From<RepoError> for CommentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::CommentNotFound(id) => Self::CommentNotFound(id),
            RepoError::CommentValidation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

impl From<CommentValidationError> for CommentServiceError {
    fn from(value: CommentValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type CommentServiceResult<T> = Result<T, CommentServiceError>;

/// Comment service facade over repository implementations.
pub struct CommentService<R: CommentRepository> {
    repo: R,
}

impl<R: CommentRepository> CommentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists a task's comments in creation order.
    ///
    /// Returns `TaskNotFound` when the task does not exist; an existing task
    /// without comments yields an empty list.
    pub fn list_comments(&self, task_id: TaskId) -> CommentServiceResult<Vec<Comment>> {
        let started_at = Instant::now();
        let result: CommentServiceResult<Vec<Comment>> =
            self.repo.list_by_task(task_id).map_err(Into::into);
        log_outcome("comment_list", started_at, &result, |comments| {
            format!("task_id={task_id} count={}", comments.len())
        });
        result
    }

    /// Creates one comment under a task.
    ///
    /// `body` is trimmed and required; `author` is trimmed and an empty value
    /// is stored as absent.
    pub fn create_comment(
        &self,
        task_id: TaskId,
        body: Option<&str>,
        author: Option<&str>,
    ) -> CommentServiceResult<Comment> {
        let started_at = Instant::now();
        let result = NewComment::try_new(body, author)
            .map_err(CommentServiceError::from)
            .and_then(|comment| Ok(self.repo.insert(task_id, &comment)?));
        log_outcome("comment_create", started_at, &result, |comment| {
            format!("task_id={task_id} comment_id={}", comment.id)
        });
        result
    }

    /// Loads one comment by id.
    pub fn get_comment(&self, id: CommentId) -> CommentServiceResult<Comment> {
        let started_at = Instant::now();
        let result = self
            .repo
            .fetch(id)
            .map_err(CommentServiceError::from)
            .and_then(|comment| comment.ok_or(CommentServiceError::CommentNotFound(id)));
        log_outcome("comment_get", started_at, &result, |comment| {
            format!("task_id={} comment_id={id}", comment.task_id)
        });
        result
    }

    /// Updates body and/or author of one comment.
    ///
    /// # Contract
    /// - `body`: `Keep` leaves it unchanged, `Set` must be non-empty after
    ///   trimming, `Clear` is a validation failure.
    /// - `author`: `Keep` leaves it unchanged, `Clear` removes it, `Set`
    ///   replaces it (empty after trimming removes it).
    pub fn update_comment(
        &self,
        id: CommentId,
        body: FieldUpdate<String>,
        author: FieldUpdate<String>,
    ) -> CommentServiceResult<Comment> {
        let started_at = Instant::now();
        let result = self.update_comment_inner(id, body, author);
        log_outcome("comment_update", started_at, &result, |comment| {
            format!("task_id={} comment_id={id}", comment.task_id)
        });
        result
    }

    /// Deletes one comment. Deleting an already-deleted id is `CommentNotFound`.
    pub fn delete_comment(&self, id: CommentId) -> CommentServiceResult<()> {
        let started_at = Instant::now();
        let result: CommentServiceResult<()> = self.repo.delete(id).map_err(Into::into);
        log_outcome("comment_delete", started_at, &result, |_| {
            format!("comment_id={id}")
        });
        result
    }

    fn update_comment_inner(
        &self,
        id: CommentId,
        body: FieldUpdate<String>,
        author: FieldUpdate<String>,
    ) -> CommentServiceResult<Comment> {
        if self.repo.fetch(id)?.is_none() {
            return Err(CommentServiceError::CommentNotFound(id));
        }
        let changes = CommentChanges::try_new(body, author)?;
        Ok(self.repo.update(id, &changes)?)
    }
}

fn log_outcome<T>(
    event: &str,
    started_at: Instant,
    result: &CommentServiceResult<T>,
    describe: impl FnOnce(&T) -> String,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(value) => info!(
            "event={event} module=service status=ok duration_ms={duration_ms} {}",
            describe(value)
        ),
        Err(err @ CommentServiceError::Storage(_)) => error!(
            "event={event} module=service status=error duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected duration_ms={duration_ms} error_code={}",
            err.code()
        ),
    }
}
