//! Background catalog and trending worker threads

use crate::catalog::{Movie, MovieCatalog};
use crate::error::FetchError;
use crate::trending::{Trending, TrendingEntry};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Committed query sent to the search worker
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub id: u64,
    pub text: String,
}

/// Results from the search worker
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub query_id: u64,
    /// Movies, or the message to show the user
    pub outcome: Result<Vec<Movie>, String>,
    pub duration: Duration,
}

/// Request for the current top trending entries
#[derive(Debug, Clone, Copy)]
pub struct TrendingRequest {
    pub limit: usize,
}

/// Fetch one query and, on a non-empty result for a non-empty query, record the
/// top result as a trending search on its own thread.
///
/// Returns the user-facing outcome plus the recording thread, if one was started.
pub fn fetch_and_record(
    catalog: &dyn MovieCatalog,
    trending: Option<&Trending>,
    query: &str,
) -> (Result<Vec<Movie>, String>, Option<JoinHandle<()>>) {
    match catalog.fetch_movies(query) {
        Ok(movies) => {
            let recorder = match (trending, movies.first()) {
                (Some(trending), Some(top)) if !query.is_empty() => Some(
                    record_search_in_background(trending.clone(), query.to_string(), top.clone()),
                ),
                _ => None,
            };
            (Ok(movies), recorder)
        }
        Err(e) => {
            log::error!("Error fetching movies for {:?}: {}", query, e);
            if let FetchError::Status { body, .. } = &e {
                if !body.is_empty() {
                    log::debug!("Catalog error body: {}", body);
                }
            }
            (Err(e.user_message()), None)
        }
    }
}

/// Record a search without blocking the caller. Failures are logged only.
pub fn record_search_in_background(
    trending: Trending,
    term: String,
    top_result: Movie,
) -> JoinHandle<()> {
    thread::spawn(move || match trending.record_search(&term, &top_result) {
        Ok(entry) => log::debug!("Trending {:?} now at {}", entry.search_term, entry.count),
        Err(e) => log::warn!("Failed to record trending search {:?}: {:#}", term, e),
    })
}

/// Spawn the search worker thread
pub fn spawn_search_worker(
    catalog: Arc<dyn MovieCatalog>,
    trending: Option<Trending>,
    query_rx: Receiver<SearchQuery>,
    result_tx: Sender<SearchResults>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(mut query) = query_rx.recv() {
            // Drain pending queries, keep only the latest
            while let Ok(next) = query_rx.try_recv() {
                query = next;
            }

            let start = Instant::now();
            let (outcome, _recorder) =
                fetch_and_record(catalog.as_ref(), trending.as_ref(), &query.text);
            let duration = start.elapsed();

            let sent = result_tx.send(SearchResults {
                query_id: query.id,
                outcome,
                duration,
            });
            if sent.is_err() {
                break;
            }
        }
    })
}

/// Spawn the trending worker thread. Read failures are logged and produce no
/// response, so the panel keeps whatever it showed before.
pub fn spawn_trending_worker(
    trending: Trending,
    req_rx: Receiver<TrendingRequest>,
    resp_tx: Sender<Vec<TrendingEntry>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(mut req) = req_rx.recv() {
            // Coalesce rapid refreshes
            while let Ok(next) = req_rx.try_recv() {
                req = next;
            }

            match trending.list_top_trending(req.limit) {
                Ok(entries) => {
                    if resp_tx.send(entries).is_err() {
                        break;
                    }
                }
                Err(e) => log::warn!("Failed to load trending searches: {:#}", e),
            }
        }
    })
}
