//! Target database file handling.
//!
//! The database is built in a temporary file next to the output path and
//! renamed over it only once the import transaction has committed.

use crate::error::{ImportError, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A SQLite database being built for `output`.
pub struct TargetDatabase {
    conn: Connection,
    temp: NamedTempFile,
    output: PathBuf,
}

impl TargetDatabase {
    /// Create an empty database file beside `output`.
    pub fn create(output: &Path) -> Result<Self> {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp = tempfile::Builder::new()
            .prefix(".dump2sqlite-")
            .suffix(".sqlite3")
            .tempfile_in(&dir)
            .map_err(|e| ImportError::io(&dir, e))?;

        let conn = Connection::open(temp.path()).map_err(|e| ImportError::database(output, e))?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(|e| ImportError::database(output, e))?;

        Ok(Self {
            conn,
            temp,
            output: output.to_path_buf(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection and move the file into place.
    ///
    /// Dropping a `TargetDatabase` without persisting deletes the file.
    pub fn persist(self) -> Result<PathBuf> {
        let TargetDatabase { conn, temp, output } = self;

        conn.close()
            .map_err(|(_, e)| ImportError::database(&output, e))?;

        temp.persist(&output)
            .map_err(|e| ImportError::io(&output, e.error))?;
        Ok(output)
    }
}
