//! Database schema migrations for SQLite.
//!
//! A simple versioned migration system: each migration transforms the
//! schema from version N to N+1 inside one transaction.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_secs()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
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
        -- Treasury records, keyed by derived address (one per owner)
        CREATE TABLE treasuries (
            address BLOB PRIMARY KEY,         -- 32 bytes, derived from owner
            owner BLOB NOT NULL,              -- 32 bytes
            last_harvest_at INTEGER NOT NULL,
            claimable_pool INTEGER NOT NULL,
            reserve_balance INTEGER NOT NULL,
            total_distributed INTEGER NOT NULL,
            total_harvested INTEGER NOT NULL,
            total_slashed INTEGER NOT NULL
        );

        -- Oracle records
        CREATE TABLE oracles (
            identity BLOB PRIMARY KEY,        -- 32 bytes
            key BLOB NOT NULL,                -- 32 bytes, Ed25519 public key
            stake INTEGER NOT NULL,
            registered_at INTEGER NOT NULL,
            slash_count INTEGER NOT NULL,
            last_slash_at INTEGER NOT NULL
        );

        -- User reward records
        CREATE TABLE users (
            identity BLOB PRIMARY KEY,        -- 32 bytes
            last_claim_at INTEGER NOT NULL,
            total_claimed INTEGER NOT NULL,
            claim_count INTEGER NOT NULL
        );

        -- Append-only event audit log
        CREATE TABLE events (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            at INTEGER NOT NULL,              -- operation timestamp
            recorded_at INTEGER NOT NULL,     -- local append timestamp
            payload TEXT NOT NULL             -- JSON-encoded event
        );

        -- Indexes for common queries
        CREATE INDEX idx_events_kind ON events(kind);
        CREATE INDEX idx_events_at ON events(at);
        CREATE INDEX idx_treasuries_owner ON treasuries(owner);
        "#,
    )?;

    Ok(())
}

/// Get current time in seconds.
fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
