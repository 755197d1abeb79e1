//! Key-value persistence medium and its SQLite implementation.
//!
//! # Responsibility
//! - Read and write raw slot text by key.
//! - Apply multi-key writes all-or-nothing.
//!
//! # Invariants
//! - `write_batch` either stores every entry or none of them.
//! - Construction rejects connections that were not migrated.

use super::{StoreError, StoreResult};
use crate::db::migrations::{current_user_version, latest_version};
use rusqlite::{params, Connection, OptionalExtension};

const SLOTS_TABLE: &str = "slots";
const SLOTS_REQUIRED_COLUMNS: &[&str] = &["key", "value", "updated_at"];

/// Durable string-keyed storage for slot values.
pub trait KeyValueStore {
    /// Returns the stored text for `key`, or `None` when never written.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the values of all `entries` in one atomic write.
    fn write_batch(&self, entries: &[(&str, String)]) -> StoreResult<()>;
}

/// SQLite-backed key-value store over the `slots` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection opened through `db::open_db`/`db::open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is
    ///   incomplete.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        if !table_exists(conn, SLOTS_TABLE)? {
            return Err(StoreError::MissingRequiredTable(SLOTS_TABLE));
        }

        let columns = table_columns(conn, SLOTS_TABLE)?;
        if let Some(column) = SLOTS_REQUIRED_COLUMNS
            .iter()
            .find(|column| !columns.iter().any(|existing| existing == *column))
        {
            return Err(StoreError::MissingRequiredColumn {
                table: SLOTS_TABLE,
                column: *column,
            });
        }

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_batch(&self, entries: &[(&str, String)]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO slots (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
