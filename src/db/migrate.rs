use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

/// Schema version written to `PRAGMA user_version` once the store is created.
pub const SCHEMA_VERSION: i32 = 1;

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

/// Create the `events` table and its category index, then stamp version 1.
///
/// `timestamp` is the primary key: two events in the same millisecond
/// collide on insert.
fn create_events_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        BEGIN;

        CREATE TABLE IF NOT EXISTS events (
            timestamp  INTEGER PRIMARY KEY,
            category   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_category ON events(category);

        PRAGMA user_version = 1;

        COMMIT;
        "#,
    )
}

pub fn schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
}

/// Public entry point: run all pending migrations.
///
/// Invoked on every store open. Future schema changes hook in here, keyed to
/// a bump of [`SCHEMA_VERSION`].
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    match schema_version(conn)? {
        0 => {
            create_events_table(conn)?;
            tracing::info!(version = SCHEMA_VERSION, "created events schema");
        }
        SCHEMA_VERSION => {
            conn.execute_batch(
                "CREATE INDEX IF NOT EXISTS idx_events_category ON events(category);",
            )?;
        }
        other => {
            return Err(AppError::StoreUnavailable(format!(
                "unsupported database schema version {} (expected {})",
                other, SCHEMA_VERSION
            )));
        }
    }

    Ok(())
}
