use crate::errors::AppError;
use crate::models::category::Category;
use crate::models::event::Event;
use rusqlite::{Connection, Result, Row, params};

pub fn map_row(row: &Row) -> Result<Event> {
    let category_str: String = row.get("category")?;
    let category = Category::from_db_str(&category_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidCategory(category_str.clone())),
        )
    })?;

    Ok(Event {
        timestamp: row.get("timestamp")?,
        category,
    })
}

pub fn insert_event(conn: &Connection, ev: &Event) -> Result<()> {
    conn.execute(
        "INSERT INTO events (timestamp, category) VALUES (?1, ?2)",
        params![ev.timestamp, ev.category.to_db_str()],
    )?;
    Ok(())
}

/// Count events of `category` with `start <= timestamp <= end`.
pub fn count_by_category_in_range(
    conn: &Connection,
    category: Category,
    start: i64,
    end: i64,
) -> Result<u64> {
    let mut stmt = conn.prepare_cached(
        "SELECT COUNT(*) FROM events
         WHERE category = ?1 AND timestamp BETWEEN ?2 AND ?3",
    )?;
    let count: i64 = stmt.query_row(params![category.to_db_str(), start, end], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

/// Delete every event with `start <= timestamp <= end`, whatever its category.
pub fn delete_range(conn: &Connection, start: i64, end: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM events WHERE timestamp BETWEEN ?1 AND ?2",
        params![start, end],
    )
}

pub fn load_events_in_range(conn: &Connection, start: i64, end: i64) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare_cached(
        "SELECT timestamp, category FROM events
         WHERE timestamp BETWEEN ?1 AND ?2
         ORDER BY timestamp ASC",
    )?;

    let rows = stmt.query_map(params![start, end], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
