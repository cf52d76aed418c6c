//! Comment form state machine.
//!
//! Create mode starts empty and clears itself after a successful submit.
//! Edit mode starts from the comment being edited, offers a cancel action and
//! keeps its fields after submit.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Alert text shown when the user submits an empty body.
pub const EMPTY_BODY_ALERT: &str = "Comment body is required";

/// Primary button label when the caller does not supply one.
pub const DEFAULT_SUBMIT_LABEL: &str = "Submit";

/// Payload handed to the submit callback.
///
/// Serializes to the JSON accepted by the create and update routes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentDraft {
    pub body: String,
    pub author: Option<String>,
}

/// Which flow the form is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Reasons a form action did not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentFormError<E> {
    /// Body was empty after trimming; carries the alert text.
    EmptyBody(&'static str),
    /// Cancel was requested on a create-mode form.
    CancelUnavailable,
    /// The submit callback failed; the fields are left untouched.
    Callback(E),
}

impl<E: Display> Display for CommentFormError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBody(alert) => write!(f, "{alert}"),
            Self::CancelUnavailable => write!(f, "cancel is only available while editing"),
            Self::Callback(err) => write!(f, "submit failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for CommentFormError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Callback(err) => Some(err),
            Self::EmptyBody(_) | Self::CancelUnavailable => None,
        }
    }
}

/// Editable body/author text plus the mode-specific behavior around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentForm {
    mode: FormMode,
    submit_label: String,
    initial: CommentDraft,
    body: String,
    author: String,
}

impl CommentForm {
    /// Empty form for adding a comment.
    pub fn create(submit_label: Option<&str>) -> Self {
        Self {
            mode: FormMode::Create,
            submit_label: resolve_submit_label(submit_label),
            initial: CommentDraft::default(),
            body: String::new(),
            author: String::new(),
        }
    }

    /// Form pre-filled with an existing comment.
    pub fn edit(initial: CommentDraft, submit_label: Option<&str>) -> Self {
        let mut form = Self {
            mode: FormMode::Edit,
            submit_label: resolve_submit_label(submit_label),
            initial: CommentDraft::default(),
            body: String::new(),
            author: String::new(),
        };
        form.reset(initial);
        form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_body(&mut self, value: impl Into<String>) {
        self.body = value.into();
    }

    pub fn set_author(&mut self, value: impl Into<String>) {
        self.author = value.into();
    }

    /// Label of the primary button.
    pub fn submit_label(&self) -> &str {
        &self.submit_label
    }

    /// Whether a cancel button is rendered.
    pub fn can_cancel(&self) -> bool {
        self.mode == FormMode::Edit
    }

    /// Re-seeds the fields when the initial values change upstream.
    pub fn reset(&mut self, initial: CommentDraft) {
        self.body.clone_from(&initial.body);
        self.author = initial.author.clone().unwrap_or_default();
        self.initial = initial;
    }

    /// Builds the normalized payload, or the alert when the body is empty.
    pub fn draft(&self) -> Result<CommentDraft, &'static str> {
        let body = self.body.trim();
        if body.is_empty() {
            return Err(EMPTY_BODY_ALERT);
        }
        let author = Some(self.author.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(CommentDraft {
            body: body.to_string(),
            author,
        })
    }

    /// Validates and hands the payload to `on_submit`.
    ///
    /// Create mode clears both fields once the callback succeeds; edit mode
    /// never clears.
    pub fn submit<E>(
        &mut self,
        on_submit: impl FnOnce(CommentDraft) -> Result<(), E>,
    ) -> Result<(), CommentFormError<E>> {
        let draft = self.draft().map_err(CommentFormError::EmptyBody)?;
        on_submit(draft).map_err(CommentFormError::Callback)?;
        if self.mode == FormMode::Create {
            self.body.clear();
            self.author.clear();
        }
        Ok(())
    }

    /// Restores the initial values and notifies the caller. Edit mode only.
    pub fn cancel<E>(&mut self, on_cancel: impl FnOnce()) -> Result<(), CommentFormError<E>> {
        if !self.can_cancel() {
            return Err(CommentFormError::CancelUnavailable);
        }
        let initial = self.initial.clone();
        self.reset(initial);
        on_cancel();
        Ok(())
    }
}

fn resolve_submit_label(label: Option<&str>) -> String {
    label
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_SUBMIT_LABEL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        CommentDraft, CommentForm, CommentFormError, FormMode, DEFAULT_SUBMIT_LABEL,
        EMPTY_BODY_ALERT,
    };
    use std::convert::Infallible;

    #[test]
    fn empty_body_blocks_submit_without_calling_back() {
        let mut form = CommentForm::create(None);
        form.set_body("   \n");
        let mut called = false;
        let result = form.submit(|_| {
            called = true;
            Ok::<(), Infallible>(())
        });
        assert_eq!(result, Err(CommentFormError::EmptyBody(EMPTY_BODY_ALERT)));
        assert!(!called);
        assert_eq!(form.body(), "   \n");
    }

    #[test]
    fn create_submit_trims_and_clears_fields() {
        let mut form = CommentForm::create(None);
        form.set_body("  hello ");
        form.set_author("   ");
        let mut received = None;
        form.submit(|draft| {
            received = Some(draft);
            Ok::<(), Infallible>(())
        })
        .unwrap();

        assert_eq!(
            received,
            Some(CommentDraft {
                body: "hello".to_string(),
                author: None,
            })
        );
        assert_eq!(form.body(), "");
        assert_eq!(form.author(), "");
    }

    #[test]
    fn failed_callback_keeps_create_fields() {
        let mut form = CommentForm::create(None);
        form.set_body("keep me");
        let result = form.submit(|_| Err("offline"));
        assert_eq!(result, Err(CommentFormError::Callback("offline")));
        assert_eq!(form.body(), "keep me");
    }

    #[test]
    fn edit_mode_prefills_and_does_not_clear() {
        let mut form = CommentForm::edit(
            CommentDraft {
                body: "original".to_string(),
                author: Some("Yug".to_string()),
            },
            Some("Save"),
        );
        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.submit_label(), "Save");
        assert_eq!(form.author(), "Yug");

        form.set_body("changed");
        form.submit(|draft| {
            assert_eq!(draft.author.as_deref(), Some("Yug"));
            Ok::<(), Infallible>(())
        })
        .unwrap();
        assert_eq!(form.body(), "changed");
    }

    #[test]
    fn cancel_restores_initial_values_in_edit_mode_only() {
        let mut edit = CommentForm::edit(
            CommentDraft {
                body: "original".to_string(),
                author: None,
            },
            None,
        );
        edit.set_body("scratch");
        let mut cancelled = false;
        edit.cancel::<Infallible>(|| cancelled = true).unwrap();
        assert!(cancelled);
        assert_eq!(edit.body(), "original");

        let mut create = CommentForm::create(None);
        assert_eq!(
            create.cancel::<Infallible>(|| {}),
            Err(CommentFormError::CancelUnavailable)
        );
    }

    #[test]
    fn submit_label_defaults_and_accepts_caller_value() {
        assert_eq!(CommentForm::create(None).submit_label(), DEFAULT_SUBMIT_LABEL);
        assert_eq!(CommentForm::create(Some("  ")).submit_label(), "Submit");
        assert_eq!(
            CommentForm::create(Some("Add comment")).submit_label(),
            "Add comment"
        );
    }

    #[test]
    fn draft_serializes_to_request_shape() {
        let draft = CommentDraft {
            body: "hi".to_string(),
            author: None,
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value, serde_json::json!({"body": "hi", "author": null}));
    }
}
