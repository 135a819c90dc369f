//! Search screen state and its transitions
//!
//! `UiState` is owned by the front-end and only changes through
//! [`UiState::apply`], a pure `(state, event) -> state` function. Every
//! dispatched search carries a request id; completions for anything but the
//! latest id are dropped so a slow stale response never overwrites a newer one.

use crate::catalog::Movie;
use crate::trending::TrendingEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Raw text in the search input
    pub query: String,
    /// Query of the latest dispatched search
    pub debounced_query: String,
    pub movies: Vec<Movie>,
    pub trending_movies: Vec<TrendingEntry>,
    pub loading: bool,
    /// Empty when there is nothing to report
    pub error_message: String,
    /// Id of the latest dispatched search (0 = none yet)
    pub latest_request: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The input text changed
    QueryEdited(String),
    /// A committed query was handed to the fetcher
    SearchStarted {
        request_id: u64,
        query: String,
    },
    /// A fetch finished; the error side is the user-visible message
    SearchCompleted {
        request_id: u64,
        outcome: Result<Vec<Movie>, String>,
    },
    TrendingLoaded(Vec<TrendingEntry>),
}

/// What the main panel shows; exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MainPanel<'a> {
    Loading,
    Error(&'a str),
    Movies(&'a [Movie]),
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id to tag the next dispatched search with
    pub fn next_request_id(&self) -> u64 {
        self.latest_request + 1
    }

    #[must_use]
    pub fn apply(mut self, event: UiEvent) -> Self {
        match event {
            UiEvent::QueryEdited(text) => {
                self.query = text;
            }
            UiEvent::SearchStarted { request_id, query } => {
                self.debounced_query = query;
                self.latest_request = request_id;
                self.loading = true;
                self.error_message.clear();
            }
            UiEvent::SearchCompleted {
                request_id,
                outcome,
            } => {
                if request_id != self.latest_request {
                    log::debug!(
                        "Dropping stale search result {} (latest is {})",
                        request_id,
                        self.latest_request
                    );
                    return self;
                }
                self.loading = false;
                match outcome {
                    Ok(movies) => {
                        self.movies = movies;
                        self.error_message.clear();
                    }
                    Err(message) => {
                        self.error_message = message;
                    }
                }
            }
            UiEvent::TrendingLoaded(entries) => {
                self.trending_movies = entries;
            }
        }
        self
    }

    pub fn main_panel(&self) -> MainPanel<'_> {
        if self.loading {
            MainPanel::Loading
        } else if !self.error_message.is_empty() {
            MainPanel::Error(&self.error_message)
        } else {
            MainPanel::Movies(&self.movies)
        }
    }

    pub fn show_trending(&self) -> bool {
        !self.trending_movies.is_empty()
    }
}
