//! Database migrations
//!
//! Versioned schema migrations tracked in a `schema_migrations` table.
//! Each migration runs inside its own transaction.

use crate::core::error::{LiftlogError, Result};
use rusqlite::Connection;
use tracing::{info, warn};

/// Migration version tracking table
const MIGRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Initial schema migration (version 1)
///
/// The UNIQUE constraint on users.email is the serialization point for the
/// email-uniqueness invariant: of N concurrent inserts with one email,
/// exactly one succeeds. The workouts foreign key is deliberately not
/// ON DELETE CASCADE; account deletion removes workouts first through the
/// workout store, and the constraint rejects any ordering that would orphan
/// them.
const MIGRATION_V1: &str = r#"
-- Users table (authentication)
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Workouts table (owned by users)
CREATE TABLE IF NOT EXISTS workouts (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    notes TEXT,
    performed_at DATETIME,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id)
);
"#;

/// Workout duration and owner index (version 2)
const MIGRATION_V2: &str = r#"
ALTER TABLE workouts ADD COLUMN duration_min INTEGER;

CREATE INDEX IF NOT EXISTS idx_workouts_user_id ON workouts(user_id);
"#;

/// Run all pending migrations
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    info!("Running database migrations");

    conn.execute_batch(MIGRATION_TABLE)
        .map_err(LiftlogError::DatabaseError)?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(LiftlogError::DatabaseError)?;

    info!("Current database schema version: {}", current_version);

    if current_version < 1 {
        info!("Applying migration v1: Initial schema");
        apply_migration(conn, 1, MIGRATION_V1)?;
    }

    if current_version < 2 {
        info!("Applying migration v2: Workout duration and index");
        apply_migration(conn, 2, MIGRATION_V2)?;
    }

    info!("Database migrations completed successfully");
    Ok(())
}

/// Apply a single migration inside a transaction
fn apply_migration(conn: &mut Connection, version: i64, sql: &str) -> Result<()> {
    let tx = conn.transaction().map_err(LiftlogError::DatabaseError)?;

    tx.execute_batch(sql).map_err(|e| {
        warn!("Migration v{} failed: {}", version, e);
        LiftlogError::DatabaseError(e)
    })?;

    tx.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        [version],
    )
    .map_err(LiftlogError::DatabaseError)?;

    tx.commit().map_err(LiftlogError::DatabaseError)?;

    info!("Migration v{} applied successfully", version);
    Ok(())
}
