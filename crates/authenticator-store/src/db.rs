//! `SQLite` connection and migration runner.
//!
//! The token database holds no secrets beyond the key URIs themselves; it
//! is a plain `SQLite` file placed in the user's data directory.

use std::fmt;
use std::path::Path;

pub use rusqlite::Connection;

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Embedded migrations
// ---------------------------------------------------------------------------

/// Forward-only SQL migrations, embedded at compile time.
/// Index 0 → version 1, index 1 → version 2, etc.
const MIGRATIONS: &[&str] = &[include_str!("../migrations/001_initial_schema.sql")];

/// Database file name inside the data directory.
pub const DB_FILE: &str = "tokens.sqlite";

// ---------------------------------------------------------------------------
// TokenDb
// ---------------------------------------------------------------------------

/// Handle to an open, migrated token database.
///
/// All token I/O flows through the wrapped [`rusqlite::Connection`].
pub struct TokenDb {
    conn: Connection,
}

impl fmt::Debug for TokenDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenDb(***)")
    }
}

impl TokenDb {
    /// Open (or create) the token database at `path`.
    ///
    /// Enables WAL journaling and runs any pending migrations.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Database`] if the file cannot be opened.
    /// - [`StoreError::Migration`] if a migration fails.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        tracing::debug!(path = %path.display(), "opened token database");
        Self::with_connection(conn)
    }

    /// Open a private in-memory database (tests and dry runs).
    ///
    /// # Errors
    ///
    /// Same as [`TokenDb::open`].
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Open `{data_dir}/tokens.sqlite`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the directory cannot be created.
    /// - Same as [`TokenDb::open`] otherwise.
    pub fn open_in_dir(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;
        Self::open(&data_dir.join(DB_FILE))
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let mut db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Returns a reference to the underlying [`rusqlite::Connection`].
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the current schema version (`PRAGMA user_version`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the pragma query fails.
    pub fn schema_version(&self) -> Result<i32, StoreError> {
        let v: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(v)
    }

    // -----------------------------------------------------------------------
    // Migration runner
    // -----------------------------------------------------------------------

    /// Apply all pending migrations sequentially.
    ///
    /// Each migration is wrapped in a transaction. The `user_version` pragma
    /// is bumped atomically on commit.
    fn run_migrations(&mut self) -> Result<(), StoreError> {
        let current = self.schema_version()?;

        for (idx, sql) in MIGRATIONS.iter().enumerate() {
            // Migration versions are 1-indexed: index 0 → version 1.
            let version = idx
                .checked_add(1)
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| StoreError::Migration("migration index overflow".into()))?;

            if version <= current {
                continue;
            }

            let tx = self.conn.transaction().map_err(|e| {
                StoreError::Migration(format!(
                    "failed to start transaction for migration {version}: {e}"
                ))
            })?;

            tx.execute_batch(sql)
                .map_err(|e| StoreError::Migration(format!("migration {version} failed: {e}")))?;

            tx.pragma_update(None, "user_version", version)
                .map_err(|e| {
                    StoreError::Migration(format!(
                        "failed to update user_version to {version}: {e}"
                    ))
                })?;

            tx.commit().map_err(|e| {
                StoreError::Migration(format!("failed to commit migration {version}: {e}"))
            })?;

            tracing::info!(version, "applied token database migration");
        }

        Ok(())
    }
}
