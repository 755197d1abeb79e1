//! SQLite file that persists the four live-state slots.
//!
//! The schema is a single key-value table:
//!
//! ```text
//! slots(
//!     key        TEXT PRIMARY KEY,   -- slot name, e.g. "currentTasks"
//!     value      TEXT NOT NULL,      -- JSON-encoded slot value
//!     updated_at INTEGER NOT NULL    -- epoch ms of the last write
//! )
//! ```
//!
//! Connections come from [`open_db`] or [`open_db_in_memory`], which apply
//! every pending migration before returning. `PRAGMA user_version` records
//! the applied migration count; a file written by a newer build is refused
//! rather than reinterpreted.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or migrate the slot database.
#[derive(Debug)]
pub enum DbError {
    /// Error reported by SQLite while opening, configuring or migrating.
    Sqlite(rusqlite::Error),
    /// `user_version` is ahead of the newest migration this build ships.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "slot database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "slot database was written by a newer closedlist (schema {db_version}, this build reads up to {latest_supported})"
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

#[cfg(test)]
mod tests {
    use super::DbError;

    #[test]
    fn unsupported_version_message_names_both_versions() {
        let err = DbError::UnsupportedSchemaVersion {
            db_version: 7,
            latest_supported: 1,
        };
        let message = err.to_string();
        assert!(message.contains("schema 7"));
        assert!(message.contains("up to 1"));
    }
}
