//! Store handle
//!
//! The process acquires one `StoreHandle` at startup, threads it through every
//! query and workflow call, and releases it once at shutdown.

use crate::config::StoreConfig;
use crate::errors::{connection_error, from_rusqlite, store_error, Result};
use rusqlite::{Connection, OpenFlags};

/// Exclusively owned connection to the calendar store
pub struct StoreHandle {
    conn: Connection,
    location: String,
}

impl StoreHandle {
    /// Open an existing database described by `config`
    ///
    /// The file is not created when missing: a store that is not there is a
    /// `Connection` error, not an empty calendar.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let location = config.path.display().to_string();
        let conn = Connection::open_with_flags(
            &config.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| connection_error(&location, e))?;

        let handle = Self { conn, location };
        handle.configure(config)?;
        tracing::debug!(location = %handle.location, "Opened store");
        Ok(handle)
    }

    /// Open an in-memory database (tests seed the schema themselves)
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| connection_error(":memory:", e))?;
        let handle = Self {
            conn,
            location: ":memory:".to_string(),
        };
        handle.configure(&StoreConfig::default())?;
        Ok(handle)
    }

    /// Apply connection settings and confirm the file is a database
    fn configure(&self, config: &StoreConfig) -> Result<()> {
        self.conn
            .busy_timeout(config.busy_timeout())
            .map_err(|e| connection_error(&self.location, e))?;

        if config.foreign_keys {
            self.conn
                .execute("PRAGMA foreign_keys = ON", [])
                .map_err(|e| connection_error(&self.location, e))?;
        }

        // Opening is lazy; touching the schema surfaces NOTADB and friends now.
        self.conn
            .query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
                row.get::<_, i64>(0)
            })
            .map_err(|e| connection_error(&self.location, e))?;

        Ok(())
    }

    /// Shared access for read-only catalog queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Exclusive access, required to open a transaction
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Path or `:memory:`
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Whether a transaction is currently open on this handle
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Count rows in a table; used by the dispatcher's status line and tests
    pub fn row_count(&self, table: CountedTable) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
        self.conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| store_error("row_count", e))
    }

    /// Release the connection
    pub fn close(self) -> Result<()> {
        let location = self.location;
        self.conn.close().map_err(|(_, e)| from_rusqlite(e))?;
        tracing::debug!(location = %location, "Closed store");
        Ok(())
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("location", &self.location)
            .finish()
    }
}

/// Tables whose size this layer reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountedTable {
    Schedule,
    StudentGroup,
}

impl CountedTable {
    fn as_str(&self) -> &'static str {
        match self {
            CountedTable::Schedule => "schedule",
            CountedTable::StudentGroup => "student_group",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acal_core::ExErrorKind;

    #[test]
    fn test_open_in_memory() {
        let handle = StoreHandle::open_in_memory().unwrap();
        assert_eq!(handle.location(), ":memory:");
        assert!(!handle.in_transaction());
        handle.close().unwrap();
    }

    #[test]
    fn test_missing_file_is_connection_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig::with_path(dir.path().join("absent.db"));

        let err = StoreHandle::open(&config).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Connection);
        assert_eq!(err.op(), Some("open_store"));
    }

    #[test]
    fn test_non_database_file_is_connection_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.db");
        std::fs::write(&path, b"this is certainly not a sqlite database file").unwrap();

        let err = StoreHandle::open(&StoreConfig::with_path(&path)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Connection);
    }
}
