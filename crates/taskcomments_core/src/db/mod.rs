//! SQLite bootstrap for the comments store.
//!
//! Every connection handed out by [`open_db`] or [`open_db_in_memory`] has
//! `foreign_keys=ON` and the `tasks`/`comments` schema at
//! [`migrations::latest_version`]. Deleting a task therefore always removes
//! its comments, and a comment can never point at a missing task.
//!
//! A database file written by a newer build is refused rather than
//! downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating a comments database.
#[derive(Debug)]
pub enum DbError {
    /// Open, pragma or migration statement failed.
    Sqlite(rusqlite::Error),
    /// `PRAGMA user_version` is ahead of the migrations this build knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
