//! Task use-case service.
//!
//! Thin facade over `TaskRepository` with the same error taxonomy as the
//! comment service. Deleting a task cascades to its comments.

use crate::model::task::{normalize_title, Task, TaskId, TaskValidationError};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    TaskNotFound(TaskId),
    Validation(TaskValidationError),
    Storage(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::TaskNotFound(_) => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::TaskValidation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task from a raw, possibly missing title.
    pub fn create_task(&self, title: Option<&str>) -> Result<Task, TaskServiceError> {
        let title = normalize_title(title)?;
        let task = self
            .repo
            .create_task(&title)
            .map_err(|err| log_storage_failure("task_create", err.into()))?;
        info!("event=task_create module=service status=ok task_id={}", task.id);
        Ok(task)
    }

    /// Loads one task by id.
    pub fn get_task(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.repo
            .get_task(id)
            .map_err(|err| log_storage_failure("task_get", err.into()))?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Deletes one task and, through the FK cascade, all of its comments.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        let cascaded = self
            .repo
            .delete_task(id)
            .map_err(|err| log_storage_failure("task_delete", err.into()))?;
        info!(
            "event=task_delete module=service status=ok task_id={id} cascaded_comments={cascaded}"
        );
        Ok(())
    }
}

fn log_storage_failure(event: &str, err: TaskServiceError) -> TaskServiceError {
    if let TaskServiceError::Storage(inner) = &err {
        error!("event={event} module=service status=error error_code=storage_failed error={inner}");
    }
    err
}
