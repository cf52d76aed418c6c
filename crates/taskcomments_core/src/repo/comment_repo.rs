//! Comment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the comment store: insert, fetch, ordered list by task, update,
//!   delete.
//! - Stamp `created_at`/`updated_at` on every write.
//!
//! # Invariants
//! - Inserts only succeed for an existing task. The check runs inside the
//!   write transaction and the FK backs it up.
//! - Task listing is ordered by `created_at ASC, id ASC`.
//! - `task_id` and `created_at` are never written by updates.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::comment::{Comment, CommentChanges, CommentId, NewComment};
use crate::model::task::TaskId;
use crate::repo::{ensure_connection_ready, now_epoch_ms, task_exists_in, RepoError, RepoResult};
use rusqlite::{
    params, Connection, ErrorCode, OptionalExtension, Row, Transaction, TransactionBehavior,
};

const COMMENT_SELECT_SQL: &str = "SELECT
    id,
    task_id,
    body,
    author,
    created_at,
    updated_at
FROM comments";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("tasks", &["id"]),
    (
        "comments",
        &["id", "task_id", "body", "author", "created_at", "updated_at"],
    ),
];

/// Repository interface for the comment store.
pub trait CommentRepository {
    /// Returns whether the task exists.
    fn task_exists(&self, task_id: TaskId) -> RepoResult<bool>;
    /// Inserts one comment under a task and returns the stored record.
    fn insert(&self, task_id: TaskId, comment: &NewComment) -> RepoResult<Comment>;
    /// Loads one comment by id.
    fn fetch(&self, id: CommentId) -> RepoResult<Option<Comment>>;
    /// Lists a task's comments in creation order.
    fn list_by_task(&self, task_id: TaskId) -> RepoResult<Vec<Comment>>;
    /// Applies changes to one comment and returns the stored record.
    fn update(&self, id: CommentId, changes: &CommentChanges) -> RepoResult<Comment>;
    /// Hard-deletes one comment.
    fn delete(&self, id: CommentId) -> RepoResult<()>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn task_exists(&self, task_id: TaskId) -> RepoResult<bool> {
        task_exists_in(self.conn, task_id)
    }

    fn insert(&self, task_id: TaskId, comment: &NewComment) -> RepoResult<Comment> {
        comment.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !task_exists_in(&tx, task_id)? {
            return Err(RepoError::TaskNotFound(task_id));
        }

        let now = now_epoch_ms();
        tx.execute(
            "INSERT INTO comments (
                task_id,
                body,
                author,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?4);",
            params![task_id, comment.body.as_str(), comment.author.as_deref(), now],
        )
        .map_err(|err| map_missing_task(err, task_id))?;

        let created = load_required_comment(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(created)
    }

    fn fetch(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        load_comment(self.conn, id)
    }

    fn list_by_task(&self, task_id: TaskId) -> RepoResult<Vec<Comment>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        if !task_exists_in(&tx, task_id)? {
            return Err(RepoError::TaskNotFound(task_id));
        }

        let comments = {
            let mut stmt = tx.prepare(&format!(
                "{COMMENT_SELECT_SQL}
                 WHERE task_id = ?1
                 ORDER BY created_at ASC, id ASC;"
            ))?;
            let mut rows = stmt.query([task_id])?;
            let mut comments = Vec::new();
            while let Some(row) = rows.next()? {
                comments.push(parse_comment_row(row)?);
            }
            comments
        };

        tx.commit()?;
        Ok(comments)
    }

    fn update(&self, id: CommentId, changes: &CommentChanges) -> RepoResult<Comment> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let Some(mut comment) = load_comment(&tx, id)? else {
            return Err(RepoError::CommentNotFound(id));
        };

        changes.apply_to(&mut comment);
        comment.validate()?;

        let now = now_epoch_ms().max(comment.created_at);
        tx.execute(
            "UPDATE comments
             SET
                body = ?2,
                author = ?3,
                updated_at = ?4
             WHERE id = ?1;",
            params![id, comment.body.as_str(), comment.author.as_deref(), now],
        )?;

        let updated = load_required_comment(&tx, id)?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete(&self, id: CommentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::CommentNotFound(id));
        }

        Ok(())
    }
}

fn load_comment(conn: &Connection, id: CommentId) -> RepoResult<Option<Comment>> {
    let mut stmt = conn.prepare(&format!("{COMMENT_SELECT_SQL} WHERE id = ?1;"))?;
    let row = stmt
        .query_row([id], |row| Ok(parse_comment_row(row)))
        .optional()?;
    row.transpose()
}

fn load_required_comment(conn: &Connection, id: CommentId) -> RepoResult<Comment> {
    load_comment(conn, id)?.ok_or_else(|| {
        RepoError::InvalidData(format!("comment {id} missing in write read-back"))
    })
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    let comment = Comment {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        body: row.get("body")?,
        author: row.get("author")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    comment.validate().map_err(|err| {
        RepoError::InvalidData(format!("comment {} in comments: {err}", comment.id))
    })?;
    Ok(comment)
}

fn map_missing_task(err: rusqlite::Error, task_id: TaskId) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            RepoError::TaskNotFound(task_id)
        }
        _ => err.into(),
    }
}
