//! Headless client-side form models.
//!
//! # Responsibility
//! - Hold the editable state a browser form keeps for comments.
//! - Apply the client-side checks that run before any request is sent.
//!
//! # Invariants
//! - The server stays the authority on validation; forms only block the
//!   obvious empty-body case.

pub mod comment_form;
