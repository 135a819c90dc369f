//! Local single-file trending store

use super::{NewTrendingEntry, TrendingBackend, TrendingEntry};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS trending_searches (
    id          TEXT PRIMARY KEY,
    search_term TEXT NOT NULL,
    count       INTEGER NOT NULL DEFAULT 1 CHECK (count >= 1),
    poster_url  TEXT NOT NULL DEFAULT '',
    movie_id    INTEGER NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_trending_searches_term ON trending_searches(search_term);
CREATE INDEX IF NOT EXISTS idx_trending_searches_count ON trending_searches(count DESC);
";

const COLUMNS: &str = "id, search_term, count, poster_url, movie_id";

pub struct SqliteBackend {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteBackend {
    /// Open (creating if needed) the store at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open trending database {}", path.display()))?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)
            .context("Failed to create trending schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Trending database lock poisoned"))
    }

    fn map_entry(row: &rusqlite::Row) -> rusqlite::Result<TrendingEntry> {
        Ok(TrendingEntry {
            id: row.get(0)?,
            search_term: row.get(1)?,
            count: row.get(2)?,
            poster_url: row.get(3)?,
            movie_id: row.get::<_, i64>(4)? as u64,
        })
    }

    fn get_by_id(conn: &Connection, id: &str) -> Result<TrendingEntry> {
        let sql = format!("SELECT {} FROM trending_searches WHERE id = ?1", COLUMNS);
        conn.query_row(&sql, [id], Self::map_entry)
            .optional()?
            .with_context(|| format!("No trending entry with id {}", id))
    }
}

impl TrendingBackend for SqliteBackend {
    fn find_by_term(&self, term: &str) -> Result<Option<TrendingEntry>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM trending_searches WHERE search_term = ?1
             ORDER BY created_at ASC LIMIT 1",
            COLUMNS
        );
        Ok(conn.query_row(&sql, [term], Self::map_entry).optional()?)
    }

    fn create(&self, entry: &NewTrendingEntry) -> Result<TrendingEntry> {
        let conn = self.conn()?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO trending_searches
                 (id, search_term, count, poster_url, movie_id, created_at, updated_at)
             VALUES (?1, ?2, 1, ?3, ?4, ?5, ?5)",
            params![
                id,
                entry.search_term,
                entry.poster_url,
                entry.movie_id as i64,
                now
            ],
        )
        .context("Failed to insert trending entry")?;
        Self::get_by_id(&conn, &id)
    }

    fn increment(&self, entry: &TrendingEntry) -> Result<TrendingEntry> {
        let conn = self.conn()?;
        let now = chrono::Utc::now().to_rfc3339();
        let changed = conn
            .execute(
                "UPDATE trending_searches SET count = count + 1, updated_at = ?2 WHERE id = ?1",
                params![entry.id, now],
            )
            .context("Failed to update trending entry")?;
        if changed == 0 {
            anyhow::bail!("No trending entry with id {}", entry.id);
        }
        Self::get_by_id(&conn, &entry.id)
    }

    fn list_by_count_desc(&self, limit: usize) -> Result<Vec<TrendingEntry>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM trending_searches ORDER BY count DESC, updated_at DESC LIMIT ?1",
            COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map([limit as i64], Self::map_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite {}", path.display()),
            None => "sqlite (in-memory)".to_string(),
        }
    }
}
