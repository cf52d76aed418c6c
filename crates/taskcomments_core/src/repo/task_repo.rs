//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the parent rows that comments attach to.
//! - Delete tasks together with their comments.
//!
//! # Invariants
//! - Comment removal on task deletion comes from the `ON DELETE CASCADE`
//!   foreign key, not from application-side loops.

use crate::model::task::{normalize_title, Task, TaskId};
use crate::repo::{ensure_connection_ready, now_epoch_ms, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("tasks", &["id", "title", "created_at", "updated_at"]),
    ("comments", &["task_id"]),
];

/// Repository interface for task rows.
pub trait TaskRepository {
    /// Creates one task and returns the stored record.
    fn create_task(&self, title: &str) -> RepoResult<Task>;
    /// Loads one task by id.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Deletes one task and returns how many comments were cascaded away.
    fn delete_task(&self, id: TaskId) -> RepoResult<usize>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, title: &str) -> RepoResult<Task> {
        let title = normalize_title(Some(title))?;
        let now = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO tasks (title, created_at, updated_at) VALUES (?1, ?2, ?2);",
            params![title, now],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_task(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("task {id} missing in write read-back")))
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let task = self
            .conn
            .query_row(
                "SELECT id, title, created_at, updated_at FROM tasks WHERE id = ?1;",
                [id],
                parse_task_row,
            )
            .optional()?;
        Ok(task)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let cascaded: i64 = tx.query_row(
            "SELECT COUNT(*) FROM comments WHERE task_id = ?1;",
            [id],
            |row| row.get(0),
        )?;

        let changed = tx.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        tx.commit()?;
        Ok(usize::try_from(cascaded).unwrap_or_default())
    }
}

fn parse_task_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
