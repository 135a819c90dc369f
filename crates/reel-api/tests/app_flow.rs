mod common;

use common::{FakeServer, Reply};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use reel_api::error::GENERIC_FETCH_ERROR;
use reel_api::trending::{NewTrendingEntry, SqliteBackend, TrendingBackend};
use reel_api::tui::App;
use reel_api::{
    CatalogConfig, FetchError, MainPanel, Movie, MovieCatalog, TmdbClient, Trending, TrendingEntry,
};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const DEBOUNCE: Duration = Duration::from_millis(600);

/// Answers every query with one movie titled after the query
#[derive(Default)]
struct EchoCatalog {
    queries: Mutex<Vec<String>>,
}

impl EchoCatalog {
    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl MovieCatalog for EchoCatalog {
    fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, FetchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if query.starts_with("slow") {
            thread::sleep(Duration::from_millis(200));
        }
        let movie = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": query,
            "poster_path": "/p1.jpg",
        }))
        .map_err(FetchError::from)?;
        Ok(vec![movie])
    }
}

/// Crashes the search worker on its first fetch
struct CrashingCatalog;

impl MovieCatalog for CrashingCatalog {
    fn fetch_movies(&self, _query: &str) -> Result<Vec<Movie>, FetchError> {
        panic!("catalog crashed")
    }
}

struct BrokenStore;

impl TrendingBackend for BrokenStore {
    fn find_by_term(&self, _term: &str) -> anyhow::Result<Option<TrendingEntry>> {
        anyhow::bail!("store offline")
    }
    fn create(&self, _entry: &NewTrendingEntry) -> anyhow::Result<TrendingEntry> {
        anyhow::bail!("store offline")
    }
    fn increment(&self, _entry: &TrendingEntry) -> anyhow::Result<TrendingEntry> {
        anyhow::bail!("store offline")
    }
    fn list_by_count_desc(&self, _limit: usize) -> anyhow::Result<Vec<TrendingEntry>> {
        anyhow::bail!("store offline")
    }
    fn describe(&self) -> String {
        "broken".to_string()
    }
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Type `text` one character every 100ms starting at `start`; returns the time of the last key
fn type_text(app: &mut App, text: &str, start: Instant) -> Instant {
    let mut at = start;
    for (i, c) in text.chars().enumerate() {
        at = start + Duration::from_millis(100 * i as u64);
        app.handle_event_at(key(KeyCode::Char(c)), at);
    }
    at
}

fn wait_until(app: &mut App, what: &str, cond: impl Fn(&App) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        app.poll_results();
        app.poll_trending();
        if cond(app) {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("timed out waiting for {}", what);
}

fn idle(app: &mut App) {
    wait_until(app, "search to finish", |app| !app.state.loading);
}

#[test]
fn mount_loads_popular_listing() {
    let catalog = Arc::new(EchoCatalog::default());
    let mut app = App::with_services(catalog.clone(), None, DEBOUNCE);
    assert!(app.state.loading);
    assert_eq!(app.state.main_panel(), MainPanel::Loading);

    idle(&mut app);
    assert_eq!(catalog.queries(), vec![String::new()]);
    assert_eq!(app.state.movies.len(), 1);
    assert_eq!(app.list_state.selected(), Some(0));
}

#[test]
fn keystrokes_are_debounced_into_one_search() {
    let catalog = Arc::new(EchoCatalog::default());
    let mut app = App::with_services(catalog.clone(), None, DEBOUNCE);
    idle(&mut app);

    let t0 = Instant::now();
    let last = type_text(&mut app, "dune", t0);
    assert_eq!(app.state.query, "dune");
    assert!(app.is_query_pending());

    app.tick_at(last + Duration::from_millis(599));
    assert!(!app.state.loading);
    assert_eq!(catalog.queries().len(), 1);

    app.tick_at(last + DEBOUNCE);
    assert!(app.state.loading);
    assert_eq!(app.state.debounced_query, "dune");
    idle(&mut app);

    assert_eq!(catalog.queries(), vec!["".to_string(), "dune".to_string()]);
    assert_eq!(app.state.movies[0].title, "dune");
}

#[test]
fn retyping_the_same_query_fetches_once() {
    let catalog = Arc::new(EchoCatalog::default());
    let mut app = App::with_services(catalog.clone(), None, DEBOUNCE);
    idle(&mut app);

    let t0 = Instant::now();
    app.handle_event_at(key(KeyCode::Char('q')), t0);
    app.handle_event_at(key(KeyCode::Backspace), t0 + Duration::from_millis(50));
    app.handle_event_at(key(KeyCode::Char('q')), t0 + Duration::from_millis(100));
    app.tick_at(t0 + Duration::from_millis(700));
    idle(&mut app);

    // Settling on the already-shown query does not refetch
    app.handle_event_at(key(KeyCode::Char('x')), t0 + Duration::from_millis(800));
    app.handle_event_at(key(KeyCode::Backspace), t0 + Duration::from_millis(850));
    app.tick_at(t0 + Duration::from_millis(1500));

    assert!(!app.state.loading);
    assert_eq!(catalog.queries(), vec!["".to_string(), "q".to_string()]);
}

#[test]
fn stale_response_does_not_overwrite_newer_one() {
    let catalog = Arc::new(EchoCatalog::default());
    let mut app = App::with_services(catalog.clone(), None, DEBOUNCE);
    idle(&mut app);

    let t0 = Instant::now();
    let last = type_text(&mut app, "slow", t0);
    app.tick_at(last + DEBOUNCE);
    wait_until(&mut app, "slow fetch to start", |_| catalog.queries().len() == 2);

    // Replace the query while the slow fetch is in flight
    for _ in 0..4 {
        app.handle_event_at(key(KeyCode::Backspace), last + DEBOUNCE);
    }
    let t1 = last + DEBOUNCE + Duration::from_millis(10);
    let last = type_text(&mut app, "fast", t1);
    app.tick_at(last + DEBOUNCE);
    assert_eq!(app.state.debounced_query, "fast");

    idle(&mut app);
    assert_eq!(app.state.movies[0].title, "fast");
    assert_eq!(
        catalog.queries(),
        vec!["".to_string(), "slow".to_string(), "fast".to_string()]
    );
}

#[test]
fn non_success_status_shows_error() {
    let server = FakeServer::start(|_| {
        Reply::status(500, serde_json::json!({ "status_message": "Internal error" }))
    });
    let catalog = TmdbClient::new(&CatalogConfig {
        base_url: server.url.clone(),
        token: "t".to_string(),
    })
    .unwrap();

    let mut app = App::with_services(Arc::new(catalog), None, DEBOUNCE);
    idle(&mut app);

    assert!(!app.state.loading);
    assert_eq!(app.state.error_message, GENERIC_FETCH_ERROR);
    assert_eq!(app.state.main_panel(), MainPanel::Error(GENERIC_FETCH_ERROR));
    assert!(app.selected_movie().is_none());
}

#[test]
fn store_failure_leaves_results_untouched() {
    let catalog = Arc::new(EchoCatalog::default());
    let mut app = App::with_services(catalog.clone(), Some(Trending::new(BrokenStore)), DEBOUNCE);
    idle(&mut app);

    let last = type_text(&mut app, "dune", Instant::now());
    app.tick_at(last + DEBOUNCE);
    idle(&mut app);

    // Give the background recorder time to fail
    thread::sleep(Duration::from_millis(100));
    app.poll_results();
    app.poll_trending();

    assert!(app.state.error_message.is_empty());
    assert_eq!(app.state.movies.len(), 1);
    assert_eq!(app.state.movies[0].title, "dune");
    assert!(!app.state.show_trending());
}

#[test]
fn trending_panel_loads_at_mount_and_on_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trending.db");
    let trending = Trending::new(SqliteBackend::open(&path).unwrap());
    let seed: Movie = serde_json::from_value(serde_json::json!({
        "id": 9,
        "title": "Heat",
        "poster_path": "/h.jpg",
    }))
    .unwrap();
    trending.record_search("heat", &seed).unwrap();

    let catalog = Arc::new(EchoCatalog::default());
    let mut app = App::with_services(catalog, Some(trending.clone()), DEBOUNCE);
    wait_until(&mut app, "trending panel", |app| app.state.show_trending());
    assert_eq!(app.state.trending_movies[0].search_term, "heat");
    idle(&mut app);

    // A search records its term in the background; refresh picks it up
    let last = type_text(&mut app, "dune", Instant::now());
    app.tick_at(last + DEBOUNCE);
    idle(&mut app);
    wait_until(&mut app, "recorded search", |_| {
        trending
            .list_top_trending(5)
            .map(|e| e.len() == 2)
            .unwrap_or(false)
    });

    assert!(app.request_trending());
    wait_until(&mut app, "refreshed panel", |app| {
        app.state.trending_movies.len() == 2
    });
}

#[test]
fn dead_search_worker_shows_error_instead_of_spinning() {
    let mut app = App::with_services(Arc::new(CrashingCatalog), None, DEBOUNCE);

    // Keep settling new queries until one finds the worker gone
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut at = Instant::now();
    while app.state.error_message.is_empty() {
        assert!(Instant::now() < deadline, "search never failed");
        thread::sleep(Duration::from_millis(10));
        app.handle_event_at(key(KeyCode::Char('a')), at);
        at += DEBOUNCE;
        app.tick_at(at);
    }

    assert!(!app.state.loading);
    assert_eq!(app.state.error_message, GENERIC_FETCH_ERROR);
    assert_eq!(app.state.main_panel(), MainPanel::Error(GENERIC_FETCH_ERROR));
}

#[test]
fn dropping_app_discards_pending_query() {
    let catalog = Arc::new(EchoCatalog::default());
    let mut app = App::with_services(catalog.clone(), None, DEBOUNCE);
    idle(&mut app);

    let last = type_text(&mut app, "dune", Instant::now());
    app.tick_at(last + Duration::from_millis(300));
    assert!(app.is_query_pending());
    drop(app);

    thread::sleep(DEBOUNCE + Duration::from_millis(100));
    assert_eq!(catalog.queries(), vec![String::new()]);
}
