//! SQLite connection factory and schema.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use super::CatalogError;
use crate::config::DatabaseConfig;

/// Location and settings of the catalog database.
///
/// Holds no connection; every request opens its own with [`Database::connect`].
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            busy_timeout,
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(&config.path, Duration::from_millis(config.busy_timeout_ms))
    }

    /// Create the database file and tables if needed.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let db = Self::from_config(&DatabaseConfig {
            path: path.to_path_buf(),
            ..Default::default()
        });
        db.initialize()?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory and the schema. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CatalogError::Database(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = self.connect()?;
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get::<_, String>(0))?;
        Self::initialize_schema(&conn)
    }

    /// Opens a new connection with foreign keys enforced.
    pub fn connect(&self) -> Result<Connection, CatalogError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                image_name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_items_category_id ON items(category_id);
            "#,
        )?;

        Ok(())
    }
}
