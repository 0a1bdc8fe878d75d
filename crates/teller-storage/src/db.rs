//! SQLite connection handling.
//!
//! A single connection guarded by a `Mutex`, opened in WAL mode. All
//! queries go through [`Database::with_conn`], which holds the lock for
//! the duration of the closure.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use teller_core::error::TellerError;

use crate::migrations;

/// Shared handle to the bank database.
///
/// `rusqlite::Connection` is not `Sync`, so the handle serializes access
/// behind a mutex; WAL mode keeps concurrent readers from other handles
/// safe at the file level.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file, apply pragmas, and migrate.
    pub fn new(path: &Path) -> Result<Self, TellerError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| {
            TellerError::Storage(format!("Cannot open database {}: {}", path.display(), e))
        })?;
        let db = Self::prepare(conn)?;
        info!(path = %path.display(), "Database ready");
        Ok(db)
    }

    /// An in-memory database with the full schema, for tests.
    pub fn in_memory() -> Result<Self, TellerError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TellerError::Storage(format!("Cannot open in-memory database: {}", e)))?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self, TellerError> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| TellerError::Storage(format!("Cannot apply pragmas: {}", e)))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;
        Ok(db)
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, TellerError>
    where
        F: FnOnce(&Connection) -> Result<T, TellerError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| TellerError::Storage(format!("Database lock poisoned: {}", e)))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}
