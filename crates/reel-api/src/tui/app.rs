//! Browser state and event loop

use super::ui;
use super::worker::{
    SearchQuery, SearchResults, TrendingRequest, spawn_search_worker, spawn_trending_worker,
};
use crate::catalog::{Movie, MovieCatalog, TmdbClient};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::GENERIC_FETCH_ERROR;
use crate::state::{UiEvent, UiState};
use crate::trending::{DEFAULT_TRENDING_LIMIT, Trending, TrendingEntry};
use anyhow::Result;
use arboard::Clipboard;
use crossterm::{
    cursor::SetCursorStyle,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, widgets::ListState};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

const TOAST_DURATION: Duration = Duration::from_secs(2);
const ERROR_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Single-line text input with cursor
#[derive(Default, Clone)]
pub struct TextInput {
    pub text: String,
    /// Byte offset, always on a char boundary
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.text.len())
    }

    pub fn delete_char_before(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_char_at(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.next_boundary();
            self.text.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Titles break words on whitespace and title punctuation ("Alien: Covenant")
    fn is_word_boundary(c: char) -> bool {
        c.is_whitespace() || matches!(c, ':' | '-' | ',' | '.')
    }

    /// Start of the word ending at the cursor, skipping trailing boundaries
    fn word_start_before(&self) -> usize {
        let s = &self.text[..self.cursor];
        let trimmed_len = s
            .char_indices()
            .rev()
            .find(|(_, c)| !Self::is_word_boundary(*c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        s[..trimmed_len]
            .char_indices()
            .rev()
            .find(|(_, c)| Self::is_word_boundary(*c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0)
    }

    pub fn move_word_left(&mut self) {
        self.cursor = self.word_start_before();
    }

    pub fn move_word_right(&mut self) {
        let s = &self.text[self.cursor..];
        let boundary_bytes: usize = s
            .chars()
            .take_while(|c| Self::is_word_boundary(*c))
            .map(char::len_utf8)
            .sum();
        let word_bytes: usize = s[boundary_bytes..]
            .chars()
            .take_while(|c| !Self::is_word_boundary(*c))
            .map(char::len_utf8)
            .sum();
        self.cursor += boundary_bytes + word_bytes;
    }

    pub fn delete_word_before(&mut self) {
        let start = self.word_start_before();
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Handle a key event, returns true if the event was consumed
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let has_ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let has_alt = modifiers.contains(KeyModifiers::ALT);
        // macOS Option may report as SUPER
        let has_word_mod = has_alt || modifiers.contains(KeyModifiers::SUPER);

        match code {
            KeyCode::Char('u') if has_ctrl => self.clear(),
            KeyCode::Char('w') if has_ctrl => self.delete_word_before(),
            KeyCode::Backspace if has_word_mod => self.delete_word_before(),
            KeyCode::Char('a') if has_ctrl => self.move_start(),
            KeyCode::Char('e') if has_ctrl => self.move_end(),
            KeyCode::Char('b') if has_word_mod => self.move_word_left(),
            KeyCode::Char('f') if has_word_mod => self.move_word_right(),
            KeyCode::Left if has_word_mod || has_ctrl => self.move_word_left(),
            KeyCode::Right if has_word_mod || has_ctrl => self.move_word_right(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Backspace => self.delete_char_before(),
            KeyCode::Delete => self.delete_char_at(),
            KeyCode::Char(c) if !has_ctrl && !has_alt => self.insert_char(c),
            _ => return false,
        }
        true
    }
}

/// Toast notification state
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
    pub is_error: bool,
}

impl Toast {
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            expires_at: Instant::now() + duration,
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            is_error: true,
            ..Self::new(message, duration)
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Command palette commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RefreshTrending,
    OpenInBrowser,
    CopyTitle,
    ClearSearch,
}

impl Command {
    pub const ALL: &'static [Command] = &[
        Command::RefreshTrending,
        Command::OpenInBrowser,
        Command::CopyTitle,
        Command::ClearSearch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::RefreshTrending => "refresh-trending",
            Command::OpenInBrowser => "open-in-browser",
            Command::CopyTitle => "copy-title",
            Command::ClearSearch => "clear-search",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::RefreshTrending => "Reload the trending searches panel",
            Command::OpenInBrowser => "Open the selected movie on themoviedb.org",
            Command::CopyTitle => "Copy the selected movie's title to clipboard",
            Command::ClearSearch => "Clear the search box and show popular movies",
        }
    }

    /// Whether the command can run right now
    pub fn is_enabled(&self, has_selection: bool, has_trending_store: bool) -> bool {
        match self {
            Command::RefreshTrending => has_trending_store,
            Command::OpenInBrowser | Command::CopyTitle => has_selection,
            Command::ClearSearch => true,
        }
    }

    /// Score command against a fuzzy query (higher = better match, None = no match)
    pub fn match_score(&self, query: &str) -> Option<i64> {
        use fuzzy_matcher::FuzzyMatcher;
        use fuzzy_matcher::skim::SkimMatcherV2;

        if query.is_empty() {
            return Some(0);
        }

        let matcher = SkimMatcherV2::default();

        // Name matches rank above description matches
        if let Some(score) = matcher.fuzzy_match(self.name(), query) {
            return Some(score + 1000);
        }
        matcher.fuzzy_match(self.description(), query)
    }
}

/// Application state
pub struct App {
    pub search_input: TextInput,
    /// Search screen state; only changed through `UiState::apply`
    pub state: UiState,
    /// Selection + scroll for the movie list
    pub list_state: ListState,
    pub should_quit: bool,
    pub toast: Option<Toast>,
    /// Time taken by the fetch behind the current list
    pub last_duration: Option<Duration>,
    /// When the current search was dispatched (drives the spinner)
    pub search_started: Instant,
    /// Where trending counters live, for the status bar
    pub store_description: Option<String>,
    debouncer: Debouncer<String>,
    /// Query of the last dispatched search; None before the first one
    last_committed: Option<String>,
    query_tx: Sender<SearchQuery>,
    result_rx: Receiver<SearchResults>,
    trending_tx: Option<Sender<TrendingRequest>>,
    trending_rx: Option<Receiver<Vec<TrendingEntry>>>,
    /// Opened on first copy
    clipboard: Option<Clipboard>,
    pub show_command_palette: bool,
    pub command_palette_index: usize,
    pub command_palette_input: TextInput,
    pub command_palette_filtered: Vec<Command>,
}

impl App {
    /// Build the app from configuration. The trending store is optional at
    /// runtime: if it cannot be opened, searching still works.
    pub fn new(config: &Config) -> Result<Self> {
        let catalog: Arc<dyn MovieCatalog> = Arc::new(TmdbClient::new(&config.catalog)?);
        let (trending, store_error) = match Trending::from_config(&config.store) {
            Ok(trending) => (Some(trending), None),
            Err(e) => {
                log::warn!("Trending store unavailable: {:#}", e);
                (None, Some(format!("Trending unavailable: {}", e)))
            }
        };

        let mut app = Self::with_services(catalog, trending, config.debounce);
        if let Some(message) = store_error {
            app.toast = Some(Toast::error(message, ERROR_TOAST_DURATION));
        }
        Ok(app)
    }

    /// Build the app over explicit services and start the mount-time loads:
    /// the popular listing and, when a store is present, the trending panel.
    pub fn with_services(
        catalog: Arc<dyn MovieCatalog>,
        trending: Option<Trending>,
        debounce: Duration,
    ) -> Self {
        let (query_tx, query_rx) = mpsc::channel::<SearchQuery>();
        let (result_tx, result_rx) = mpsc::channel::<SearchResults>();
        spawn_search_worker(catalog, trending.clone(), query_rx, result_tx);

        let store_description = trending.as_ref().map(Trending::describe);
        let (trending_tx, trending_rx) = match trending {
            Some(trending) => {
                let (req_tx, req_rx) = mpsc::channel::<TrendingRequest>();
                let (resp_tx, resp_rx) = mpsc::channel::<Vec<TrendingEntry>>();
                spawn_trending_worker(trending, req_rx, resp_tx);
                (Some(req_tx), Some(resp_rx))
            }
            None => (None, None),
        };

        let mut app = Self {
            search_input: TextInput::new(),
            state: UiState::new(),
            list_state: ListState::default(),
            should_quit: false,
            toast: None,
            last_duration: None,
            search_started: Instant::now(),
            store_description,
            debouncer: Debouncer::new(debounce),
            last_committed: None,
            query_tx,
            result_rx,
            trending_tx,
            trending_rx,
            clipboard: None,
            show_command_palette: false,
            command_palette_index: 0,
            command_palette_input: TextInput::new(),
            command_palette_filtered: Command::ALL.to_vec(),
        };

        app.commit_query(String::new());
        app.request_trending();
        app
    }

    fn dispatch(&mut self, event: UiEvent) {
        self.state = std::mem::take(&mut self.state).apply(event);
    }

    /// Hand a settled query to the search worker unless it was the last one sent
    fn commit_query(&mut self, query: String) {
        if self.last_committed.as_deref() == Some(query.as_str()) {
            return;
        }
        self.last_committed = Some(query.clone());

        let request_id = self.state.next_request_id();
        log::debug!("Searching {:?} (request {})", query, request_id);
        self.dispatch(UiEvent::SearchStarted {
            request_id,
            query: query.clone(),
        });
        self.search_started = Instant::now();

        let sent = self.query_tx.send(SearchQuery {
            id: request_id,
            text: query,
        });
        if sent.is_err() {
            log::error!("Search worker is gone; request {} dropped", request_id);
            self.dispatch(UiEvent::SearchCompleted {
                request_id,
                outcome: Err(GENERIC_FETCH_ERROR.to_string()),
            });
        }
    }

    /// Ask the trending worker for a fresh top list
    pub fn request_trending(&mut self) -> bool {
        match &self.trending_tx {
            Some(tx) => tx
                .send(TrendingRequest {
                    limit: DEFAULT_TRENDING_LIMIT,
                })
                .is_ok(),
            None => false,
        }
    }

    /// Release the debounced query once it has settled
    pub fn tick_at(&mut self, now: Instant) {
        if let Some(query) = self.debouncer.poll(now) {
            self.commit_query(query);
        }
    }

    pub fn is_query_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Apply finished searches (non-blocking)
    pub fn poll_results(&mut self) {
        while let Ok(results) = self.result_rx.try_recv() {
            let is_latest = results.query_id == self.state.latest_request;
            self.dispatch(UiEvent::SearchCompleted {
                request_id: results.query_id,
                outcome: results.outcome,
            });

            if is_latest {
                self.last_duration = Some(results.duration);
                self.list_state = ListState::default();
                if !self.state.movies.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
        }
    }

    /// Apply trending panel updates (non-blocking)
    pub fn poll_trending(&mut self) {
        let Some(rx) = &self.trending_rx else {
            return;
        };
        let mut latest = None;
        while let Ok(entries) = rx.try_recv() {
            latest = Some(entries);
        }
        if let Some(entries) = latest {
            self.dispatch(UiEvent::TrendingLoaded(entries));
        }
    }

    pub fn selected_index(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        if self.state.loading || !self.state.error_message.is_empty() {
            return None;
        }
        self.state.movies.get(self.selected_index())
    }

    pub fn has_trending_store(&self) -> bool {
        self.trending_tx.is_some()
    }

    fn select_prev(&mut self, n: usize) {
        if self.state.movies.is_empty() {
            return;
        }
        let current = self.selected_index();
        self.list_state.select(Some(current.saturating_sub(n)));
    }

    fn select_next(&mut self, n: usize) {
        if self.state.movies.is_empty() {
            return;
        }
        let max_index = self.state.movies.len() - 1;
        let current = self.selected_index();
        self.list_state
            .select(Some(current.saturating_add(n).min(max_index)));
    }

    fn select_first(&mut self) {
        if !self.state.movies.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if !self.state.movies.is_empty() {
            self.list_state.select(Some(self.state.movies.len() - 1));
        }
    }

    fn open_selected(&mut self) {
        let Some(url) = self.selected_movie().map(Movie::page_url) else {
            self.toast = Some(Toast::error("No movie selected", TOAST_DURATION));
            return;
        };
        self.toast = Some(match open::that(&url) {
            Ok(()) => Toast::new("Opened in browser", TOAST_DURATION),
            Err(e) => {
                log::warn!("Failed to open {}: {}", url, e);
                Toast::error("Failed to open browser", TOAST_DURATION)
            }
        });
    }

    fn copy_selected_title(&mut self) {
        let Some(title) = self.selected_movie().map(|m| m.title.clone()) else {
            self.toast = Some(Toast::error("No movie selected", TOAST_DURATION));
            return;
        };

        if self.clipboard.is_none() {
            self.clipboard = Clipboard::new().ok();
        }
        let copied = self
            .clipboard
            .as_mut()
            .map(|clipboard| clipboard.set_text(&title).is_ok());

        self.toast = Some(match copied {
            Some(true) => Toast::new(format!("Copied: {}", title), TOAST_DURATION),
            Some(false) => Toast::error("Failed to copy to clipboard", TOAST_DURATION),
            None => Toast::error("Clipboard not available", TOAST_DURATION),
        });
    }

    fn clear_search(&mut self, now: Instant) {
        self.search_input.clear();
        self.on_query_edited(now);
    }

    /// Clear expired toast
    pub fn update_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    fn execute_command(&mut self, cmd: Command, now: Instant) {
        match cmd {
            Command::RefreshTrending => {
                self.toast = Some(if self.request_trending() {
                    Toast::new("Refreshing trending searches...", TOAST_DURATION)
                } else {
                    Toast::error("No trending store configured", TOAST_DURATION)
                });
            }
            Command::OpenInBrowser => self.open_selected(),
            Command::CopyTitle => self.copy_selected_title(),
            Command::ClearSearch => self.clear_search(now),
        }
    }

    fn update_command_filter(&mut self) {
        let query = &self.command_palette_input.text;
        let mut scored: Vec<_> = Command::ALL
            .iter()
            .copied()
            .filter_map(|cmd| cmd.match_score(query).map(|score| (cmd, score)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        self.command_palette_filtered = scored.into_iter().map(|(cmd, _)| cmd).collect();
        self.command_palette_index = 0;
    }

    fn open_command_palette(&mut self) {
        self.show_command_palette = true;
        self.command_palette_index = 0;
        self.command_palette_input.clear();
        self.command_palette_filtered = Command::ALL.to_vec();
    }

    fn close_command_palette(&mut self) {
        self.show_command_palette = false;
        self.command_palette_input.clear();
    }

    /// The input text changed: record it and restart the debounce timer
    fn on_query_edited(&mut self, now: Instant) {
        let text = self.search_input.text.clone();
        if text == self.state.query {
            return;
        }
        self.dispatch(UiEvent::QueryEdited(text.clone()));
        self.debouncer.push(text, now);
    }

    pub fn handle_event(&mut self, event: Event) {
        self.handle_event_at(event, Instant::now());
    }

    /// Handle an input event with an explicit clock (mouse scroll is coalesced in run_loop)
    pub fn handle_event_at(&mut self, event: Event, now: Instant) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.show_command_palette {
            match (key.code, key.modifiers) {
                (KeyCode::Esc, _)
                | (KeyCode::Char('c'), KeyModifiers::CONTROL)
                | (KeyCode::Char('o'), KeyModifiers::CONTROL) => self.close_command_palette(),
                (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                    self.command_palette_index = self.command_palette_index.saturating_sub(1);
                }
                (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::CONTROL) => {
                    let max = self.command_palette_filtered.len().saturating_sub(1);
                    self.command_palette_index = (self.command_palette_index + 1).min(max);
                }
                (KeyCode::Enter, _) => {
                    if let Some(&cmd) = self
                        .command_palette_filtered
                        .get(self.command_palette_index)
                    {
                        self.close_command_palette();
                        self.execute_command(cmd, now);
                    }
                }
                _ => {
                    if self
                        .command_palette_input
                        .handle_key(key.code, key.modifiers)
                    {
                        self.update_command_filter();
                    }
                }
            }
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            (KeyCode::Char('o'), KeyModifiers::CONTROL) => self.open_command_palette(),
            (KeyCode::Char('y'), KeyModifiers::CONTROL) => self.copy_selected_title(),
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::CONTROL) => self.select_prev(1),
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::CONTROL) => {
                self.select_next(1)
            }
            (KeyCode::PageUp, _) => self.select_prev(10),
            (KeyCode::PageDown, _) => self.select_next(10),
            (KeyCode::Home, _) => self.select_first(),
            (KeyCode::End, _) => self.select_last(),
            (KeyCode::Enter, _) => self.open_selected(),
            // "/" opens the palette only while the search box is empty
            (KeyCode::Char('/'), _) if self.search_input.text.is_empty() => {
                self.open_command_palette()
            }
            _ => {
                if self.search_input.handle_key(key.code, key.modifiers) {
                    self.on_query_edited(now);
                }
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(query) = self.debouncer.cancel() {
            log::debug!("Discarding unsettled query {:?}", query);
        }
    }
}

/// Run the interactive browser until the user quits
pub fn run(config: &Config) -> Result<()> {
    let mut app = App::new(config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetCursorStyle::BlinkingBar
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        SetCursorStyle::DefaultUserShape
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // ~120Hz
    const FRAME_TIME: Duration = Duration::from_micros(8333);

    loop {
        let frame_start = Instant::now();

        // Drain pending input first
        let mut scroll_delta: isize = 0;
        let mut events_processed = 0usize;
        while event::poll(Duration::from_millis(0))? && events_processed < 100 {
            let ev = event::read()?;
            match &ev {
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => scroll_delta += 1,
                    MouseEventKind::ScrollUp => scroll_delta -= 1,
                    _ => {}
                },
                _ => app.handle_event(ev),
            }
            events_processed += 1;
            if app.should_quit {
                break;
            }
        }

        if app.should_quit {
            break;
        }

        // Each card is 3 lines tall
        if !app.show_command_palette && scroll_delta != 0 {
            let amount = (scroll_delta.unsigned_abs() / 3).clamp(1, 10);
            if scroll_delta > 0 {
                app.select_next(amount);
            } else {
                app.select_prev(amount);
            }
        }

        app.tick_at(Instant::now());
        app.update_toast();
        app.poll_results();
        app.poll_trending();

        terminal.draw(|f| ui::render(f, app))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str) -> TextInput {
        TextInput {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    #[test]
    fn test_text_input_editing() {
        let mut ti = TextInput::new();
        for c in "amélie".chars() {
            ti.insert_char(c);
        }
        ti.move_left();
        ti.move_left();
        ti.delete_char_before();
        assert_eq!(ti.text, "améie");
        assert_eq!(ti.cursor, "amé".len());

        ti.move_end();
        ti.delete_char_before();
        assert_eq!(ti.text, "améi");
    }

    #[test]
    fn test_word_motion_on_titles() {
        let mut ti = input("Alien: Covenant");
        ti.delete_word_before();
        assert_eq!(ti.text, "Alien: ");

        let mut ti = input("Spider-Man");
        ti.move_word_left();
        assert_eq!(ti.cursor, "Spider-".len());
        ti.move_start();
        ti.move_word_right();
        assert_eq!(ti.cursor, "Spider".len());
    }

    #[test]
    fn test_handle_key_modifiers() {
        let mut ti = input("the dark knight");
        assert!(ti.handle_key(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(ti.text, "the dark ");
        assert!(ti.handle_key(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(ti.text, "");
        assert!(!ti.handle_key(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert!(ti.handle_key(KeyCode::Char('X'), KeyModifiers::SHIFT));
        assert_eq!(ti.text, "X");
    }

    #[test]
    fn test_command_match_score() {
        assert_eq!(Command::RefreshTrending.match_score(""), Some(0));
        assert!(Command::RefreshTrending.match_score("trend").unwrap() > 1000);
        assert!(Command::CopyTitle.match_score("zzzz").is_none());

        // Description-only match ranks below name matches
        let desc = Command::OpenInBrowser.match_score("themoviedb").unwrap();
        assert!(desc < 1000);
    }

    #[test]
    fn test_command_enabled() {
        assert!(!Command::CopyTitle.is_enabled(false, true));
        assert!(Command::CopyTitle.is_enabled(true, false));
        assert!(!Command::RefreshTrending.is_enabled(true, false));
        assert!(Command::ClearSearch.is_enabled(false, false));
    }
}
