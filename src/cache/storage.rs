//! SQLite-backed cache storage, shared between the request path and
//! background revalidation tasks.

use super::{AssetRequest, AssetResponse};
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use chrono::Local;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Arc;

fn cache_err(err: rusqlite::Error) -> AppError {
    AppError::Cache(err.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInfo {
    pub name: String,
    pub entries: usize,
}

#[derive(Clone)]
pub struct CacheStorage {
    conn: Arc<Mutex<Connection>>,
}

impl CacheStorage {
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = Connection::open(expand_tilde(path))
            .map_err(|e| AppError::Cache(format!("{}: {}", path, e)))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory().map_err(cache_err)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> AppResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(cache_err)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cache_generations (
                name        TEXT PRIMARY KEY,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS cache_entries (
                generation  TEXT NOT NULL
                            REFERENCES cache_generations(name) ON DELETE CASCADE,
                method      TEXT NOT NULL,
                url         TEXT NOT NULL,
                status      INTEGER NOT NULL,
                headers     TEXT NOT NULL DEFAULT '[]',
                body        BLOB NOT NULL,
                stored_at   TEXT NOT NULL,
                PRIMARY KEY (generation, method, url)
            );
            "#,
        )
        .map_err(cache_err)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn ensure_generation(conn: &Connection, name: &str) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT OR IGNORE INTO cache_generations (name, created_at) VALUES (?1, ?2)",
            params![name, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn write_entry(
        conn: &Connection,
        generation: &str,
        request: &AssetRequest,
        response: &AssetResponse,
    ) -> AppResult<()> {
        let headers = serde_json::to_string(&response.headers)
            .map_err(|e| AppError::Cache(format!("headers: {}", e)))?;
        conn.execute(
            "INSERT OR REPLACE INTO cache_entries
                (generation, method, url, status, headers, body, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                generation,
                request.method.to_uppercase(),
                request.url.as_str(),
                response.status,
                headers,
                response.body,
                Local::now().to_rfc3339(),
            ],
        )
        .map_err(cache_err)?;
        Ok(())
    }

    pub fn has_generation(&self, name: &str) -> AppResult<bool> {
        let conn = self.conn.lock();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM cache_generations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()
            .map_err(cache_err)?;
        Ok(found.is_some())
    }

    /// All generations, oldest first, with their entry counts.
    pub fn generations(&self) -> AppResult<Vec<GenerationInfo>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT g.name, COUNT(e.url)
                 FROM cache_generations g
                 LEFT JOIN cache_entries e ON e.generation = g.name
                 GROUP BY g.name
                 ORDER BY g.created_at ASC, g.name ASC",
            )
            .map_err(cache_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(GenerationInfo {
                    name: row.get(0)?,
                    entries: row.get::<_, i64>(1)?.max(0) as usize,
                })
            })
            .map_err(cache_err)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(cache_err)?);
        }
        Ok(out)
    }

    /// Delete every generation except `keep`, returning the deleted names.
    pub fn delete_generations_except(&self, keep: &str) -> AppResult<Vec<String>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(cache_err)?;

        let doomed: Vec<String> = {
            let mut stmt = tx
                .prepare("SELECT name FROM cache_generations WHERE name <> ?1 ORDER BY name")
                .map_err(cache_err)?;
            let rows = stmt
                .query_map([keep], |row| row.get::<_, String>(0))
                .map_err(cache_err)?;
            let mut names = Vec::new();
            for r in rows {
                names.push(r.map_err(cache_err)?);
            }
            names
        };

        tx.execute("DELETE FROM cache_generations WHERE name <> ?1", [keep])
            .map_err(cache_err)?;
        tx.commit().map_err(cache_err)?;

        Ok(doomed)
    }

    pub fn match_request(
        &self,
        generation: &str,
        request: &AssetRequest,
    ) -> AppResult<Option<AssetResponse>> {
        let conn = self.conn.lock();
        let row: Option<(u16, String, Vec<u8>)> = conn
            .query_row(
                "SELECT status, headers, body FROM cache_entries
                 WHERE generation = ?1 AND method = ?2 AND url = ?3",
                params![
                    generation,
                    request.method.to_uppercase(),
                    request.url.as_str()
                ],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(cache_err)?;

        match row {
            Some((status, headers, body)) => {
                let headers = serde_json::from_str(&headers)
                    .map_err(|e| AppError::Cache(format!("headers: {}", e)))?;
                Ok(Some(AssetResponse {
                    status,
                    headers,
                    body,
                }))
            }
            None => Ok(None),
        }
    }

    /// Store (overwrite) one entry, creating the generation if needed.
    pub fn put(
        &self,
        generation: &str,
        request: &AssetRequest,
        response: &AssetResponse,
    ) -> AppResult<()> {
        let conn = self.conn.lock();
        Self::ensure_generation(&conn, generation).map_err(cache_err)?;
        Self::write_entry(&conn, generation, request, response)
    }

    /// Store a batch of entries in one transaction: either all are written
    /// (and the generation exists) or nothing is.
    pub fn put_all(
        &self,
        generation: &str,
        entries: &[(AssetRequest, AssetResponse)],
    ) -> AppResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(cache_err)?;

        Self::ensure_generation(&tx, generation).map_err(cache_err)?;
        for (request, response) in entries {
            Self::write_entry(&tx, generation, request, response)?;
        }

        tx.commit().map_err(cache_err)
    }
}
