//! SQLite-based session storage.
//!
//! One table, append-only. Rows are written in a single `INSERT`, so a reader
//! never sees half a session.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::debug;

use super::{data_dir, SessionStore};
use crate::error::{CoreError, StorageError};
use crate::session::{Category, Session};

/// SQLite database holding the session log.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/focusroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or the database cannot be opened.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("focusroom.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened session database");
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                recorded_at   TEXT NOT NULL,
                duration_secs INTEGER NOT NULL CHECK (duration_secs > 0),
                category      TEXT NOT NULL,
                distractions  INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_recorded_at ON sessions(recorded_at);",
        )?;
        Ok(())
    }

    /// Number of stored sessions.
    pub fn count(&self) -> Result<u64, StorageError> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get::<_, u64>(0))?;
        Ok(n)
    }
}

impl SessionStore for Database {
    fn append(&self, session: &Session) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO sessions (recorded_at, duration_secs, category, distractions)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.timestamp.to_rfc3339(),
                session.duration_secs,
                session.category.as_str(),
                session.distraction_count,
            ],
        )?;
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Session>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT recorded_at, duration_secs, category, distractions
             FROM sessions
             ORDER BY recorded_at",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (recorded_at, duration_secs, category, distractions) = row?;
            let timestamp = DateTime::parse_from_rfc3339(&recorded_at)
                .map_err(|e| StorageError::Corrupt(format!("{recorded_at}: {e}")))?
                .with_timezone(&Utc);
            let category: Category = category.parse().map_err(StorageError::Corrupt)?;
            let session = Session::new(timestamp, duration_secs, category, distractions)
                .ok_or_else(|| StorageError::Corrupt("zero-length session".into()))?;
            sessions.push(session);
        }
        Ok(sessions)
    }
}
