pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod search;
pub mod state;
pub mod trending;
pub mod tui;

pub use catalog::{Movie, MovieCatalog, TmdbClient, catalog_endpoint, poster_url};
pub use config::{CatalogConfig, Config, StoreConfig};
pub use debounce::Debouncer;
pub use error::FetchError;
pub use search::{
    SearchArgs, TrendingArgs, execute as execute_search, execute_trending, fetch_and_record,
};
pub use state::{MainPanel, UiEvent, UiState};
pub use trending::{Trending, TrendingBackend, TrendingEntry};

/// Directory for local state (~/.reel)
pub fn reel_home_dir() -> anyhow::Result<std::path::PathBuf> {
    use anyhow::Context;

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".reel"))
}
