//! Horde preferences stored in an SQLite database.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension};

use crate::error::{ConvertError, Result};

use super::{decode_preference_bytes, PreferenceSource, PREF_NAME, PREF_SCOPE};

/// Default Horde preferences table.
pub const DEFAULT_TABLE: &str = "horde_prefs";

/// Reads `pref_value` from a Horde `horde_prefs` table.
#[derive(Debug)]
pub struct SqliteSource {
    conn: Connection,
    table: String,
}

impl SqliteSource {
    /// Open a database read-only.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConvertError::FileNotFound(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        tracing::info!(path = %path.display(), table, "Opened preferences database");
        Self::with_connection(conn, table)
    }

    /// Wrap an existing connection.
    pub fn with_connection(conn: Connection, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }
}

impl PreferenceSource for SqliteSource {
    /// The first matching row wins; Horde keeps at most one.
    fn fetch_rules(&self, uid: &str) -> Result<Option<String>> {
        let sql = format!(
            "SELECT pref_value FROM {} WHERE pref_uid = ?1 AND pref_scope = ?2 AND pref_name = ?3",
            self.table
        );

        let value = self
            .conn
            .query_row(&sql, (uid, PREF_SCOPE, PREF_NAME), |row| {
                Ok(match row.get_ref(0)? {
                    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes.to_vec(),
                    _ => Vec::new(),
                })
            })
            .optional()?;

        tracing::debug!(uid, found = value.is_some(), "Fetched Ingo rules preference");
        Ok(value.map(|bytes| decode_preference_bytes(&bytes)))
    }
}

/// Table names cannot be bound as parameters; accept plain identifiers only.
fn validate_table_name(table: &str) -> Result<()> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(ConvertError::InvalidConfig(format!(
            "'{table}' is not a valid table name"
        )))
    }
}
