//! Route handlers.
//!
//! Each handler parses the path and body, runs one service call on the
//! blocking pool and maps the outcome to a response.

use crate::dto::{
    parse_json_body, CommentResponse, CreateCommentRequest, CreateTaskRequest, HealthResponse,
    MessageResponse, TaskResponse, UpdateCommentRequest,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskcomments_core::{core_version, CommentId, CommentValidationError, FieldUpdate, TaskId};

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: core_version(),
    })
}

pub(crate) async fn route_not_found() -> ApiError {
    ApiError::not_found("not found")
}

pub(crate) async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let request: CreateTaskRequest = parse_json_body(&body)?;
    let task = state
        .with_task_service(move |service| service.create_task(request.title.as_deref()))
        .await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

pub(crate) async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task_id = parse_task_id(&task_id)?;
    let task = state
        .with_task_service(move |service| service.get_task(task_id))
        .await?;
    Ok(Json(task.into()))
}

pub(crate) async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let task_id = parse_task_id(&task_id)?;
    state
        .with_task_service(move |service| service.delete_task(task_id))
        .await?;
    Ok(Json(MessageResponse::deleted()))
}

pub(crate) async fn list_comments(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let task_id = parse_task_id(&task_id)?;
    let comments = state
        .with_comment_service(move |service| service.list_comments(task_id))
        .await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

pub(crate) async fn create_comment(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let task_id = parse_task_id(&task_id)?;
    let request: CreateCommentRequest = parse_json_body(&body)?;
    let comment = state
        .with_comment_service(move |service| {
            service.create_comment(task_id, request.body.as_deref(), request.author.as_deref())
        })
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// Serves both PUT and PATCH. The `body` key is required on this route; a
/// missing comment still wins over a missing key.
pub(crate) async fn update_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    body: Bytes,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment_id = parse_comment_id(&comment_id)?;
    let request: UpdateCommentRequest = parse_json_body(&body)?;
    let comment = state
        .with_comment_service(move |service| {
            if request.body.is_none() {
                service.get_comment(comment_id)?;
                return Err(CommentValidationError::BodyRequired.into());
            }
            service.update_comment(
                comment_id,
                FieldUpdate::from_presence(request.body),
                FieldUpdate::from_presence(request.author),
            )
        })
        .await?;
    Ok(Json(comment.into()))
}

pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let comment_id = parse_comment_id(&comment_id)?;
    state
        .with_comment_service(move |service| service.delete_comment(comment_id))
        .await?;
    Ok(Json(MessageResponse::deleted()))
}

// Ids that do not parse cannot name a stored record.
fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found("task not found"))
}

fn parse_comment_id(raw: &str) -> Result<CommentId, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found("comment not found"))
}
