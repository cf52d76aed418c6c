//! Router assembly.

use crate::handlers::{
    create_comment, create_task, delete_comment, delete_task, get_task, health, list_comments,
    route_not_found, update_comment,
};
use crate::middleware::log_request;
use crate::state::AppState;
use axum::routing::{get, post, put};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};

/// Builds the full API router over `state`.
///
/// | Method | Path |
/// |---|---|
/// | GET | `/api/health` |
/// | POST | `/api/tasks` |
/// | GET, DELETE | `/api/tasks/{task_id}` |
/// | GET, POST | `/api/tasks/{task_id}/comments` |
/// | PUT, PATCH, DELETE | `/api/comments/{comment_id}` |
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/tasks", post(create_task))
        .route("/api/tasks/{task_id}", get(get_task).delete(delete_task))
        .route(
            "/api/tasks/{task_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/api/comments/{comment_id}",
            put(update_comment)
                .patch(update_comment)
                .delete(delete_comment),
        )
        .fallback(route_not_found)
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}
