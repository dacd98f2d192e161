//! Schema manager: turns a storage location into migrated connections.
//!
//! Creating a [`SchemaManager`] does no I/O. The database file is opened,
//! configured and migrated only when [`SchemaManager::connect`] is called,
//! which the tracker does on its first real access.

use std::sync::Arc;
use std::time::Duration;

use campaign_tracker_core::Clock;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::config::{StorageLocation, TrackerConfig};
use crate::error::Result;
use crate::migration;

/// Knows where the database lives and how to open it.
#[derive(Debug, Clone)]
pub struct SchemaManager {
    location: StorageLocation,
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
}

impl SchemaManager {
    /// Create a schema manager. Does not touch the filesystem.
    pub fn new(location: StorageLocation, config: TrackerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            location,
            config,
            clock,
        }
    }

    /// The bound storage location.
    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// The configuration used for new connections.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Open a read/write connection with the schema in place.
    ///
    /// Creates the parent directory and database file if needed.
    pub fn connect(&self) -> Result<Connection> {
        let mut conn = match self.location.database_path(&self.config) {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                info!(path = %path.display(), "opening campaign tracker database");
                Connection::open(&path)?
            }
            None => {
                debug!("opening in-memory campaign tracker database");
                Connection::open_in_memory()?
            }
        };

        self.apply_pragmas(&conn)?;
        migration::migrate(&mut conn, self.clock.now_millis())?;
        Ok(conn)
    }

    fn apply_pragmas(&self, conn: &Connection) -> Result<()> {
        conn.busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))?;

        if !matches!(self.location, StorageLocation::InMemory) {
            conn.pragma_update(None, "journal_mode", self.config.journal_mode.as_pragma())?;
        }
        conn.pragma_update(None, "synchronous", self.config.synchronous.as_pragma())?;

        debug!(
            journal_mode = self.config.journal_mode.as_pragma(),
            synchronous = self.config.synchronous.as_pragma(),
            busy_timeout_ms = self.config.busy_timeout_ms,
            "database pragmas applied"
        );
        Ok(())
    }
}
