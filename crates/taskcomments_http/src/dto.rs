//! Request and response bodies.
//!
//! Timestamps leave the core as epoch milliseconds and are rendered here as
//! RFC 3339 UTC strings with millisecond precision.

use crate::error::ApiError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use taskcomments_core::{Comment, CommentId, Task, TaskId};

/// Comment JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: CommentId,
    pub task_id: TaskId,
    pub body: String,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Comment> for CommentResponse {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id,
            task_id: value.task_id,
            body: value.body,
            author: value.author,
            created_at: format_epoch_ms(value.created_at),
            updated_at: format_epoch_ms(value.updated_at),
        }
    }
}

/// Task JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: TaskId,
    pub title: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Task> for TaskResponse {
    fn from(value: Task) -> Self {
        Self {
            id: value.id,
            title: value.title,
            created_at: format_epoch_ms(value.created_at),
            updated_at: format_epoch_ms(value.updated_at),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreateCommentRequest {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// Outer `None` is an absent key, `Some(None)` an explicit `null`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateCommentRequest {
    #[serde(default, deserialize_with = "present")]
    pub body: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub author: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn deleted() -> Self {
        Self { message: "deleted" }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

/// Parses a JSON object body. Blank input counts as `{}`.
pub(crate) fn parse_json_body<T>(bytes: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|_| ApiError::invalid_json())?;
    if !value.is_object() {
        return Err(ApiError::invalid_json());
    }
    serde_json::from_value(value).map_err(|_| ApiError::invalid_json())
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn format_epoch_ms(value: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(value)
        .map(|timestamp| timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::{format_epoch_ms, parse_json_body, UpdateCommentRequest};

    #[test]
    fn update_request_distinguishes_absent_from_null() {
        let request: UpdateCommentRequest =
            parse_json_body(br#"{"body": "hi", "author": null}"#).unwrap();
        assert_eq!(request.body, Some(Some("hi".to_string())));
        assert_eq!(request.author, Some(None));

        let request: UpdateCommentRequest = parse_json_body(br#"{"author": "Yug"}"#).unwrap();
        assert_eq!(request.body, None);
    }

    #[test]
    fn blank_body_is_empty_object_and_non_objects_are_rejected() {
        let request: UpdateCommentRequest = parse_json_body(b"  ").unwrap();
        assert!(request.body.is_none() && request.author.is_none());

        assert!(parse_json_body::<UpdateCommentRequest>(b"[\"hi\"]").is_err());
        assert!(parse_json_body::<UpdateCommentRequest>(b"{\"body\":").is_err());
        assert!(parse_json_body::<UpdateCommentRequest>(br#"{"body": 5}"#).is_err());
    }

    #[test]
    fn epoch_ms_renders_as_utc_rfc3339() {
        assert_eq!(
            format_epoch_ms(1_700_000_000_123).as_deref(),
            Some("2023-11-14T22:13:20.123Z")
        );
        assert_eq!(format_epoch_ms(i64::MAX), None);
    }
}
