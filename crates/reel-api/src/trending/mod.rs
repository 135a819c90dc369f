//! Trending searches: a per-term hit counter kept in a document store
//!
//! `record_search` is a find-then-create-or-increment sequence with no
//! transaction around it. Two first searches for the same term racing each
//! other can both create a row; that is accepted.

use crate::catalog::Movie;
use crate::config::StoreConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod appwrite;
pub mod sqlite;

pub use appwrite::AppwriteBackend;
pub use sqlite::SqliteBackend;

/// Number of entries shown in the trending panel
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    /// Store-assigned identifier
    pub id: String,
    pub search_term: String,
    pub count: i64,
    /// Poster of the first result seen for this term
    pub poster_url: String,
    pub movie_id: u64,
}

/// Row to insert the first time a term is searched
#[derive(Debug, Clone)]
pub struct NewTrendingEntry {
    pub search_term: String,
    pub poster_url: String,
    pub movie_id: u64,
}

impl NewTrendingEntry {
    pub fn from_top_result(term: &str, top_result: &Movie) -> Self {
        Self {
            search_term: term.to_string(),
            poster_url: top_result.poster_url(),
            movie_id: top_result.id,
        }
    }
}

/// Document collection operations the counter is built on
pub trait TrendingBackend: Send + Sync {
    /// Entry whose search term matches `term` exactly
    fn find_by_term(&self, term: &str) -> Result<Option<TrendingEntry>>;

    /// Insert a new row with a count of 1
    fn create(&self, entry: &NewTrendingEntry) -> Result<TrendingEntry>;

    /// Add one to the count of an existing row
    fn increment(&self, entry: &TrendingEntry) -> Result<TrendingEntry>;

    /// Up to `limit` rows ordered by count, highest first
    fn list_by_count_desc(&self, limit: usize) -> Result<Vec<TrendingEntry>>;

    /// Short human-readable location, used in logs
    fn describe(&self) -> String;
}

/// Trending counter over a shared backend; cheap to clone into worker threads
#[derive(Clone)]
pub struct Trending {
    backend: Arc<dyn TrendingBackend>,
}

impl Trending {
    pub fn new(backend: impl TrendingBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Open the store described by the configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let trending = match config {
            StoreConfig::Appwrite(cfg) => Self::new(AppwriteBackend::new(cfg)?),
            StoreConfig::Sqlite { path } => Self::new(SqliteBackend::open(path)?),
        };
        log::debug!("Trending store: {}", trending.describe());
        Ok(trending)
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    /// Count one search for `term`, creating the entry from `top_result` on first sight
    pub fn record_search(&self, term: &str, top_result: &Movie) -> Result<TrendingEntry> {
        anyhow::ensure!(!term.is_empty(), "Cannot record an empty search term");

        match self.backend.find_by_term(term)? {
            Some(existing) => {
                log::debug!(
                    "Incrementing trending entry {:?} ({} -> {})",
                    term,
                    existing.count,
                    existing.count + 1
                );
                self.backend.increment(&existing)
            }
            None => {
                log::debug!("Creating trending entry {:?}", term);
                self.backend
                    .create(&NewTrendingEntry::from_top_result(term, top_result))
            }
        }
    }

    /// Top entries by hit count, highest first
    pub fn list_top_trending(&self, limit: usize) -> Result<Vec<TrendingEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut entries = self.backend.list_by_count_desc(limit)?;
        entries.truncate(limit);
        Ok(entries)
    }
}
