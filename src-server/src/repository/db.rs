//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::DomainError;

/// Path that opens a private in-memory database
pub const MEMORY_DB: &str = ":memory:";

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: Arc<Mutex<Option<Connection>>>,
    pub db_path: PathBuf,
}

impl DbState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            db_path,
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Drop the connection; repositories sharing it report "not initialized" afterwards
    pub async fn close(&self) {
        let mut guard = self.conn.lock().await;
        *guard = None;
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

/// Initialize database with path
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = if db_path == Path::new(MEMORY_DB) {
        Connection::open_in_memory().map_err(|e| format!("Failed to open in-memory db: {}", e))?
    } else {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create db dir: {}", e))?;
            }
        }
        Connection::open(db_path).map_err(|e| format!("Failed to open db: {}", e))?
    };

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| format!("Failed to enable foreign keys: {}", e))?;

    // Run migrations
    run_migrations(&conn)?;

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);
    log::info!("Menu database ready at {}", db_path.display());

    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(names) = stmt.query_map([], |row| row.get::<_, String>(1)) else {
        return false;
    };
    let found = names.flatten().any(|name| name == column);
    found
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            name TEXT PRIMARY KEY,
            position INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS menu_items (
            name TEXT PRIMARY KEY,
            category TEXT NOT NULL REFERENCES categories(name),
            position INTEGER NOT NULL DEFAULT 0,
            price INTEGER NOT NULL DEFAULT 0,
            available INTEGER NOT NULL DEFAULT 1
        );
        CREATE TABLE IF NOT EXISTS sides (
            item_name TEXT NOT NULL REFERENCES menu_items(name) ON DELETE CASCADE,
            name TEXT NOT NULL,
            price INTEGER NOT NULL DEFAULT 0,
            available INTEGER NOT NULL DEFAULT 1,
            position INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (item_name, name)
        );",
    )
    .map_err(|e| e.to_string())?;

    // Change tracking columns
    for table in ["categories", "menu_items"] {
        if !column_exists(conn, table, "updated_at") {
            conn.execute(&format!("ALTER TABLE {} ADD COLUMN updated_at INTEGER", table), [])
                .map_err(|e| format!("Failed to add updated_at to {}: {}", table, e))?;
        }
    }

    // Create index for faster category queries
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_menu_items_category ON menu_items(category, position)",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}
