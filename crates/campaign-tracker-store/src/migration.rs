//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::{params, Connection, TransactionBehavior};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Name of the occurrence table.
pub const OCCURRENCES_TABLE: &str = "campaign_occurrences";

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
/// A database written by a newer schema version is rejected.
pub fn migrate(conn: &mut Connection, now: i64) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    // IMMEDIATE so two connections racing on a fresh file cannot both
    // decide to apply the same migration.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current = current_version(&tx)?;

    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current, CURRENT_VERSION
        )));
    }

    for version in (current + 1)..=CURRENT_VERSION {
        debug!(version, "applying schema migration");
        apply_migration(&tx, version)?;

        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, now],
        )?;
    }

    tx.commit()?;
    Ok(())
}

/// Highest applied schema version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per tracked campaign; absence means never shown
        CREATE TABLE campaign_occurrences (
            campaign_id TEXT PRIMARY KEY NOT NULL,
            view_count INTEGER NOT NULL DEFAULT 0 CHECK (view_count >= 0),
            last_occurrence INTEGER NOT NULL DEFAULT 0   -- Unix ms of the latest view
        );
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creates_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn, 1_000).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&OCCURRENCES_TABLE.to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
    }

    #[test]
    fn test_migration_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn, 1_000).unwrap();
        migrate(&mut conn, 2_000).unwrap();
        migrate(&mut conn, 3_000).unwrap();

        assert_eq!(current_version(&conn).unwrap(), CURRENT_VERSION);

        let applied_at: i64 = conn
            .query_row(
                "SELECT applied_at FROM schema_migrations WHERE version = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(applied_at, 1_000);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn, 1_000).unwrap();
        conn.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, 0)",
            params![CURRENT_VERSION + 1],
        )
        .unwrap();

        let err = migrate(&mut conn, 2_000).unwrap_err();
        assert!(matches!(err, StoreError::Migration(_)));
    }

    #[test]
    fn test_view_count_cannot_go_negative() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn, 1_000).unwrap();

        let result = conn.execute(
            "INSERT INTO campaign_occurrences (campaign_id, view_count, last_occurrence)
             VALUES ('bad', -1, 0)",
            [],
        );
        assert!(result.is_err());
    }
}
