use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::Result;

const BUSY_TIMEOUT: Duration = Duration::from_millis(500);

/// The connection shared by every repository of a session.
///
/// Opening is the only place pragmas are applied; callers own the value and
/// close the database by dropping it.
pub struct SqliteStorage {
    path: Option<PathBuf>,
    conn: Connection,
}

impl SqliteStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        log::debug!("opened sqlite database at {}", path.display());

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Self { path: None, conn })
    }

    /// Remove the database file at `path`, if any.
    pub fn reset_all<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(path)?;
        log::info!("removed database {}", path.display());
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn configure(conn: &Connection) -> rusqlite::Result<()> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        // Reading the header makes a non-database file fail here instead of
        // on the first entity operation.
        let _version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(())
    }
}
