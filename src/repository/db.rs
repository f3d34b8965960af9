//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations. All repositories share one
//! connection behind an async mutex; cascade rules depend on the
//! foreign-key pragma being set here.

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared connection handle used by all repositories
pub type Db = Arc<Mutex<Connection>>;

/// Open the database at `db_path` (or `:memory:`) and run migrations
pub fn init_db(db_path: &Path) -> DomainResult<Db> {
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Internal(format!("Failed to open db: {}", e)))?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    run_migrations(&conn)?;

    Ok(Arc::new(Mutex::new(conn)))
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner TEXT NOT NULL,
            name TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            list_id INTEGER NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
            task TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            inserted_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS list_members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            list_id INTEGER NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'viewer'
                CHECK (role IN ('owner','editor','viewer')),
            UNIQUE (list_id, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_todos_list ON todos(list_id);
        CREATE INDEX IF NOT EXISTS idx_members_list ON list_members(list_id);",
    )
    .map_err(|e| DomainError::Internal(format!("Migration failed: {}", e)))?;

    Ok(())
}
