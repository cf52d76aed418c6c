//! Comment domain model.
//!
//! # Responsibility
//! - Define the persisted comment record and its write-side inputs.
//! - Normalize body/author text before it reaches storage.
//! - Represent partial updates with explicit field presence.
//!
//! # Invariants
//! - `body` is trimmed and never empty.
//! - `author` is trimmed; empty input is normalized to `None`.
//! - `author` never exceeds `AUTHOR_MAX_CHARS` characters.
//! - `task_id` and `created_at` never change after creation.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned comment identifier.
pub type CommentId = i64;

/// Maximum author length, in characters.
pub const AUTHOR_MAX_CHARS: usize = 128;

/// Persisted comment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    /// Owning task. Immutable after creation.
    pub task_id: TaskId,
    pub body: String,
    /// `None` means no author was given; distinct from an empty string.
    pub author: Option<String>,
    /// Epoch milliseconds (UTC), set once.
    pub created_at: i64,
    /// Epoch milliseconds (UTC), refreshed on every mutation.
    pub updated_at: i64,
}

impl Comment {
    /// Re-checks invariants on a record loaded from storage.
    pub fn validate(&self) -> Result<(), CommentValidationError> {
        check_stored_fields(&self.body, self.author.as_deref())
    }
}

/// Validation failures for comment input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    /// The `body` field was not supplied at all (or was `null`).
    BodyRequired,
    /// The `body` field was supplied but is empty after trimming.
    BodyEmpty,
    /// The `author` field exceeds `AUTHOR_MAX_CHARS`.
    AuthorTooLong { max_chars: usize, actual_chars: usize },
}

impl Display for CommentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BodyRequired => write!(f, "body is required"),
            Self::BodyEmpty => write!(f, "body cannot be empty"),
            Self::AuthorTooLong {
                max_chars,
                actual_chars,
            } => write!(
                f,
                "author must be at most {max_chars} characters, got {actual_chars}"
            ),
        }
    }
}

impl Error for CommentValidationError {}

/// Tri-state presence for one updatable field.
///
/// `Keep` means the caller did not mention the field, `Clear` means the caller
/// explicitly sent `null`, `Set` carries a new value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Builds a field update from a "present / maybe-null" pair.
    ///
    /// The outer `Option` is key presence, the inner one is JSON `null`.
    pub fn from_presence(value: Option<Option<T>>) -> Self {
        match value {
            None => Self::Keep,
            Some(None) => Self::Clear,
            Some(Some(value)) => Self::Set(value),
        }
    }
}

/// Validated input for creating one comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub body: String,
    pub author: Option<String>,
}

impl NewComment {
    /// Normalizes raw create input.
    ///
    /// # Errors
    /// - `BodyRequired` when `body` is absent.
    /// - `BodyEmpty` when `body` is whitespace-only.
    /// - `AuthorTooLong` when the trimmed author is too wide.
    pub fn try_new(
        body: Option<&str>,
        author: Option<&str>,
    ) -> Result<Self, CommentValidationError> {
        let body = normalize_body(body.ok_or(CommentValidationError::BodyRequired)?)?;
        let author = normalize_author(author)?;
        Ok(Self { body, author })
    }

    /// Re-checks invariants for values built without `try_new`.
    pub fn validate(&self) -> Result<(), CommentValidationError> {
        check_stored_fields(&self.body, self.author.as_deref())
    }
}

/// Validated partial update for one comment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentChanges {
    /// `None` leaves the stored body unchanged.
    pub body: Option<String>,
    pub author: FieldUpdate<String>,
}

impl CommentChanges {
    /// Normalizes raw update input.
    ///
    /// Author precedence: `Keep` leaves the value, `Clear` removes it, and a
    /// `Set` that trims to empty also removes it.
    ///
    /// # Errors
    /// - `BodyRequired` when `body` is explicitly `null`.
    /// - `BodyEmpty` when `body` is whitespace-only.
    /// - `AuthorTooLong` when the trimmed author is too wide.
    pub fn try_new(
        body: FieldUpdate<String>,
        author: FieldUpdate<String>,
    ) -> Result<Self, CommentValidationError> {
        let body = match body {
            FieldUpdate::Keep => None,
            FieldUpdate::Clear => return Err(CommentValidationError::BodyRequired),
            FieldUpdate::Set(raw) => Some(normalize_body(&raw)?),
        };
        let author = match author {
            FieldUpdate::Keep => FieldUpdate::Keep,
            FieldUpdate::Clear => FieldUpdate::Clear,
            FieldUpdate::Set(raw) => match normalize_author(Some(&raw))? {
                Some(author) => FieldUpdate::Set(author),
                None => FieldUpdate::Clear,
            },
        };
        Ok(Self { body, author })
    }

    /// Applies changes to an in-memory record. Timestamps are left to storage.
    pub fn apply_to(&self, comment: &mut Comment) {
        if let Some(body) = self.body.as_ref() {
            comment.body.clone_from(body);
        }
        match &self.author {
            FieldUpdate::Keep => {}
            FieldUpdate::Clear => comment.author = None,
            FieldUpdate::Set(author) => comment.author = Some(author.clone()),
        }
    }
}

/// Trims a comment body and rejects empty results.
pub fn normalize_body(raw: &str) -> Result<String, CommentValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CommentValidationError::BodyEmpty);
    }
    Ok(trimmed.to_string())
}

/// Trims an optional author; empty input becomes `None`.
pub fn normalize_author(raw: Option<&str>) -> Result<Option<String>, CommentValidationError> {
    let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    check_author_width(trimmed)?;
    Ok(Some(trimmed.to_string()))
}

fn check_stored_fields(body: &str, author: Option<&str>) -> Result<(), CommentValidationError> {
    if body.trim().is_empty() {
        return Err(CommentValidationError::BodyEmpty);
    }
    if let Some(author) = author {
        check_author_width(author)?;
    }
    Ok(())
}

fn check_author_width(author: &str) -> Result<(), CommentValidationError> {
    let actual_chars = author.chars().count();
    if actual_chars > AUTHOR_MAX_CHARS {
        return Err(CommentValidationError::AuthorTooLong {
            max_chars: AUTHOR_MAX_CHARS,
            actual_chars,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_author, normalize_body, Comment, CommentChanges, CommentValidationError,
        FieldUpdate, NewComment, AUTHOR_MAX_CHARS,
    };

    fn sample_comment() -> Comment {
        Comment {
            id: 7,
            task_id: 3,
            body: "original".to_string(),
            author: Some("Yug".to_string()),
            created_at: 1_000,
            updated_at: 1_000,
        }
    }

    #[test]
    fn normalize_body_trims_and_rejects_whitespace() {
        assert_eq!(normalize_body("  hi \n").unwrap(), "hi");
        assert_eq!(
            normalize_body(" \t\n").unwrap_err(),
            CommentValidationError::BodyEmpty
        );
    }

    #[test]
    fn normalize_author_maps_blank_to_none() {
        assert_eq!(normalize_author(None).unwrap(), None);
        assert_eq!(normalize_author(Some("   ")).unwrap(), None);
        assert_eq!(
            normalize_author(Some(" Yug ")).unwrap().as_deref(),
            Some("Yug")
        );
    }

    #[test]
    fn normalize_author_counts_characters_not_bytes() {
        let wide = "é".repeat(AUTHOR_MAX_CHARS);
        assert!(normalize_author(Some(&wide)).is_ok());

        let too_wide = "a".repeat(AUTHOR_MAX_CHARS + 1);
        assert!(matches!(
            normalize_author(Some(&too_wide)),
            Err(CommentValidationError::AuthorTooLong {
                actual_chars,
                ..
            }) if actual_chars == AUTHOR_MAX_CHARS + 1
        ));
    }

    #[test]
    fn new_comment_requires_body() {
        assert_eq!(
            NewComment::try_new(None, Some("Yug")).unwrap_err(),
            CommentValidationError::BodyRequired
        );
        let created = NewComment::try_new(Some(" hi "), Some("")).unwrap();
        assert_eq!(created.body, "hi");
        assert_eq!(created.author, None);
    }

    #[test]
    fn field_update_from_presence_distinguishes_null_from_absent() {
        assert_eq!(FieldUpdate::<String>::from_presence(None), FieldUpdate::Keep);
        assert_eq!(
            FieldUpdate::<String>::from_presence(Some(None)),
            FieldUpdate::Clear
        );
        assert_eq!(
            FieldUpdate::from_presence(Some(Some("x".to_string()))),
            FieldUpdate::Set("x".to_string())
        );
    }

    #[test]
    fn changes_reject_null_body_and_blank_body() {
        assert_eq!(
            CommentChanges::try_new(FieldUpdate::Clear, FieldUpdate::Keep).unwrap_err(),
            CommentValidationError::BodyRequired
        );
        assert_eq!(
            CommentChanges::try_new(FieldUpdate::Set("  ".to_string()), FieldUpdate::Keep)
                .unwrap_err(),
            CommentValidationError::BodyEmpty
        );
    }

    #[test]
    fn changes_apply_author_precedence() {
        let mut comment = sample_comment();
        CommentChanges::try_new(FieldUpdate::Keep, FieldUpdate::Keep)
            .unwrap()
            .apply_to(&mut comment);
        assert_eq!(comment.author.as_deref(), Some("Yug"));

        let blank = CommentChanges::try_new(FieldUpdate::Keep, FieldUpdate::Set(" ".into())).unwrap();
        assert_eq!(blank.author, FieldUpdate::Clear);
        blank.apply_to(&mut comment);
        assert_eq!(comment.author, None);

        CommentChanges::try_new(FieldUpdate::Set(" new ".into()), FieldUpdate::Set("Ana".into()))
            .unwrap()
            .apply_to(&mut comment);
        assert_eq!(comment.body, "new");
        assert_eq!(comment.author.as_deref(), Some("Ana"));
    }

    #[test]
    fn validate_rejects_blank_persisted_body() {
        let mut comment = sample_comment();
        comment.body = "   ".to_string();
        assert_eq!(comment.validate(), Err(CommentValidationError::BodyEmpty));
    }
}
