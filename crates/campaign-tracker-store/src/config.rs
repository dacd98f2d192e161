//! Tracker configuration and storage locations.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Default database file name. Versioned so an incompatible layout can move
/// to a new file instead of migrating in place.
pub const DEFAULT_DATABASE_NAME: &str = "local_campaigns_v1.db";

/// SQLite journal mode applied to every new connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    /// Write-ahead log: readers do not block the writer.
    #[default]
    Wal,
    /// Classic rollback journal, deleted after each transaction.
    Delete,
    /// Journal kept in memory.
    Memory,
}

impl JournalMode {
    pub(crate) fn as_pragma(self) -> &'static str {
        match self {
            JournalMode::Wal => "WAL",
            JournalMode::Delete => "DELETE",
            JournalMode::Memory => "MEMORY",
        }
    }
}

/// SQLite `synchronous` level applied to every new connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Synchronous {
    Off,
    #[default]
    Normal,
    Full,
}

impl Synchronous {
    pub(crate) fn as_pragma(self) -> &'static str {
        match self {
            Synchronous::Off => "OFF",
            Synchronous::Normal => "NORMAL",
            Synchronous::Full => "FULL",
        }
    }
}

/// Configuration for a [`SqliteTracker`](crate::SqliteTracker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// File name used inside a [`StorageLocation::Directory`].
    pub database_name: String,
    /// How long a writer waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// Journal mode for file-backed databases.
    pub journal_mode: JournalMode,
    /// Durability level.
    pub synchronous: Synchronous,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            busy_timeout_ms: 5_000,
            journal_mode: JournalMode::default(),
            synchronous: Synchronous::default(),
        }
    }
}

/// Where a tracker keeps its data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageLocation {
    /// A directory owned by the host application; the database file is
    /// `<dir>/<database_name>`.
    Directory(PathBuf),
    /// An explicit database file.
    File(PathBuf),
    /// A private in-memory database. Contents live as long as the
    /// read/write handle, so they are gone after `close`.
    InMemory,
}

impl StorageLocation {
    /// Location inside a directory.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        StorageLocation::Directory(path.into())
    }

    /// Location at an explicit file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        StorageLocation::File(path.into())
    }

    /// Path of the database file, or `None` for in-memory storage.
    pub fn database_path(&self, config: &TrackerConfig) -> Option<PathBuf> {
        match self {
            StorageLocation::Directory(dir) => Some(dir.join(&config.database_name)),
            StorageLocation::File(path) => Some(path.clone()),
            StorageLocation::InMemory => None,
        }
    }

    /// Delete the database file and its SQLite side files.
    ///
    /// Missing files are not an error. Does nothing for in-memory storage.
    /// Trackers still holding a handle on the file keep their old view of it
    /// until they are closed.
    pub fn delete_database(&self, config: &TrackerConfig) -> Result<()> {
        let Some(path) = self.database_path(config) else {
            return Ok(());
        };

        debug!(path = %path.display(), "deleting database");
        remove_if_exists(&path)?;
        for suffix in ["-wal", "-shm", "-journal"] {
            remove_if_exists(&sibling(&path, suffix))?;
        }
        Ok(())
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLocation::Directory(dir) => write!(f, "dir:{}", dir.display()),
            StorageLocation::File(path) => write!(f, "file:{}", path.display()),
            StorageLocation::InMemory => f.write_str(":memory:"),
        }
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
