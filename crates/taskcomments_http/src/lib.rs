//! HTTP surface for task comments.
//!
//! # Responsibility
//! - Map comment and task use-cases onto JSON routes.
//! - Translate service errors into status codes with `{"error": ...}` bodies.
//! - Log one metadata-only line per request.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes an `ApiError`.
//! - Store work runs on the blocking pool, one operation per lock.

mod dto;
mod error;
mod handlers;
mod middleware;
mod routes;
mod state;

pub use dto::{CommentResponse, TaskResponse};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
