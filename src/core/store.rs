//! Durable append-only event log with day-scoped aggregate queries.
//!
//! Every public operation runs in its own SQLite transaction. Two calls are
//! never wrapped in a shared transaction, so two consecutive counts may
//! observe different snapshots if a write lands in between.

use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::event::Event;
use crate::utils::date::now_millis;
use rusqlite::{Connection, ErrorCode, TransactionBehavior};

pub struct EventStore {
    pool: DbPool,
}

fn tx_failure(err: rusqlite::Error) -> AppError {
    AppError::TransactionFailure(err.to_string())
}

fn insert_failure(err: rusqlite::Error, timestamp: i64) -> AppError {
    if let rusqlite::Error::SqliteFailure(e, _) = &err
        && e.code == ErrorCode::ConstraintViolation
        && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
    {
        return AppError::DuplicateKey(timestamp);
    }
    tx_failure(err)
}

impl EventStore {
    /// Open (creating on first run) the store at `path` and bring its schema
    /// to the current version.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)
            .map_err(|e| AppError::StoreUnavailable(format!("{}: {}", path, e)))?;
        Self::from_pool(pool)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory().map_err(|e| AppError::StoreUnavailable(e.to_string()))?;
        Self::from_pool(pool)
    }

    fn from_pool(pool: DbPool) -> AppResult<Self> {
        init_db(&pool.conn).map_err(|e| match e {
            AppError::StoreUnavailable(_) => e,
            other => AppError::StoreUnavailable(other.to_string()),
        })?;
        tracing::debug!("event store ready");
        Ok(Self { pool })
    }

    /// Underlying connection, used for the internal audit log.
    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    /// Log `category` at the current wall-clock millisecond.
    pub fn append(&mut self, category: Category) -> AppResult<Event> {
        self.append_at(category, now_millis())
    }

    /// Insert `{timestamp, category}`. A timestamp that already exists fails
    /// with [`AppError::DuplicateKey`]; no retry is attempted.
    pub fn append_at(&mut self, category: Category, timestamp: i64) -> AppResult<Event> {
        let event = Event::new(timestamp, category);

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(tx_failure)?;
        queries::insert_event(&tx, &event).map_err(|e| insert_failure(e, timestamp))?;
        tx.commit().map_err(tx_failure)?;

        tracing::debug!(timestamp, category = %category, "event appended");
        Ok(event)
    }

    pub fn count_by_category_in_range(
        &mut self,
        category: Category,
        start: i64,
        end: i64,
    ) -> AppResult<u64> {
        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(tx_failure)?;
        let count =
            queries::count_by_category_in_range(&tx, category, start, end).map_err(tx_failure)?;
        tx.commit().map_err(tx_failure)?;
        Ok(count)
    }

    /// Remove every event in `[start, end]` regardless of category.
    ///
    /// All-or-nothing: on any failure the transaction is rolled back when it
    /// is dropped and the error is returned.
    pub fn delete_range(&mut self, start: i64, end: i64) -> AppResult<usize> {
        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(tx_failure)?;
        let deleted = queries::delete_range(&tx, start, end).map_err(tx_failure)?;
        tx.commit().map_err(tx_failure)?;

        tracing::debug!(start, end, deleted, "range deleted");
        Ok(deleted)
    }

    pub fn events_in_range(&mut self, start: i64, end: i64) -> AppResult<Vec<Event>> {
        let tx = self.pool.conn.transaction().map_err(tx_failure)?;
        let events = queries::load_events_in_range(&tx, start, end).map_err(tx_failure)?;
        tx.commit().map_err(tx_failure)?;
        Ok(events)
    }
}
