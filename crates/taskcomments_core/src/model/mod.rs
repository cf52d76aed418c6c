//! Domain model for tasks and their comments.
//!
//! # Responsibility
//! - Define canonical records shared by repository, service and HTTP layers.
//! - Own input normalization rules (trimming, required fields, widths).
//!
//! # Invariants
//! - Every comment references exactly one task by `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod comment;
pub mod task;
