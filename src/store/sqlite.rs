//! SQLite backend for the record store contract.
//!
//! All entity kinds share one `records` table keyed by `(kind, key)`;
//! scans order by key so the backend matches the in-memory `BTreeMap`
//! semantics exactly. Schema changes go through the versioned migration
//! runner.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::record::RecordStore;
use super::StoreError;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite-backed store at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(unavailable)?;
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".into()))
    }
}

impl RecordStore for SqliteStore {
    fn get(&self, kind: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let conn = self.locked()?;
        conn.query_row(
            "SELECT value FROM records WHERE kind = ?1 AND key = ?2",
            params![kind, key],
            |row| row.get(0),
        )
        .optional()
        .map_err(unavailable)
    }

    fn put(&self, kind: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let conn = self.locked()?;
        conn.execute(
            "INSERT OR REPLACE INTO records (kind, key, value) VALUES (?1, ?2, ?3)",
            params![kind, key, value],
        )
        .map_err(unavailable)?;
        Ok(())
    }

    fn scan(&self, kind: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let conn = self.locked()?;
        let mut stmt = conn
            .prepare("SELECT key, value FROM records WHERE kind = ?1 ORDER BY key")
            .map_err(unavailable)?;
        let rows = stmt
            .query_map(params![kind], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
            })
            .map_err(unavailable)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(unavailable)
    }

    fn count(&self, kind: &str) -> Result<u64, StoreError> {
        let conn = self.locked()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM records WHERE kind = ?1",
                params![kind],
                |row| row.get(0),
            )
            .map_err(unavailable)?;
        Ok(count as u64)
    }
}

fn unavailable(e: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn configure_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )
    .map_err(unavailable)
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/migrations/001_initial.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| {
                StoreError::Unavailable(format!("migration v{version} failed: {e}"))
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}
