//! Task domain model.
//!
//! Tasks are the parent side of the comment relationship. The core only keeps
//! the columns needed to anchor comments and enforce cascade deletion.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned task identifier.
pub type TaskId = i64;

/// Persisted task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, never empty.
    pub title: String,
    /// Epoch milliseconds (UTC).
    pub created_at: i64,
    /// Epoch milliseconds (UTC).
    pub updated_at: i64,
}

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title missing or whitespace-only.
    TitleRequired,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleRequired => write!(f, "title is required"),
        }
    }
}

impl Error for TaskValidationError {}

/// Trims a task title and rejects empty results.
pub fn normalize_title(raw: Option<&str>) -> Result<String, TaskValidationError> {
    match raw.map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(TaskValidationError::TitleRequired),
    }
}
