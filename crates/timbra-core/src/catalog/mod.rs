//! SQLite-backed catalog of registered voice samples.

mod migrations;

use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::VoiceEntry;

use migrations::MIGRATIONS;

/// A catalog handle owning one SQLite connection.
///
/// Opened once per process and injected wherever registration or lookup
/// is needed; the connection is released when the handle drops.
#[derive(Debug)]
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open (or create) a catalog at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let catalog = Self { conn };
        catalog.apply_migrations()?;
        Ok(catalog)
    }

    /// Open an in-memory catalog (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let catalog = Self { conn };
        catalog.apply_migrations()?;
        Ok(catalog)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

impl Catalog {
    /// Register a voice sample under a display label.
    ///
    /// Idempotent on the path: registering an already-known path is a
    /// no-op. Returns whether a new row was inserted.
    pub fn register(&self, name: &str, path: &Path) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO voices (name, path) VALUES (?1, ?2)",
            rusqlite::params![name, path.to_string_lossy().as_ref()],
        )?;
        Ok(inserted > 0)
    }

    /// Whether a path already has a catalog row.
    pub fn is_registered(&self, path: &Path) -> Result<bool> {
        let mut stmt = self.conn.prepare("SELECT 1 FROM voices WHERE path = ?1")?;
        let found = stmt.exists(rusqlite::params![path.to_string_lossy().as_ref()])?;
        Ok(found)
    }

    /// All entries in registration order.
    pub fn list_all(&self) -> Result<Vec<VoiceEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, path FROM voices ORDER BY id")?;
        let entries = stmt
            .query_map([], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Entries whose name contains the fragment, unanchored.
    ///
    /// Uses SQLite's default `LIKE` collation, so matching is
    /// case-insensitive for ASCII. `%` and `_` in the fragment act as
    /// wildcards.
    pub fn search(&self, name_fragment: &str) -> Result<Vec<VoiceEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, path FROM voices WHERE name LIKE ?1 ORDER BY id")?;
        let pattern = format!("%{name_fragment}%");
        let entries = stmt
            .query_map(rusqlite::params![pattern], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Number of registered entries.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM voices", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Remove every entry. Returns the number of rows deleted.
    pub fn clear(&self) -> Result<usize> {
        let deleted = self.conn.execute("DELETE FROM voices", [])?;
        Ok(deleted)
    }
}

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<VoiceEntry> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let path: String = row.get(2)?;
    Ok(VoiceEntry::new(id, name, PathBuf::from(path)))
}
