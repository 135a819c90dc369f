//! Startup configuration read from the process environment
//!
//! Everything is read once when the application starts. A missing catalog
//! token, or a partially configured hosted store, fails fast with a message
//! naming the variables to set.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_APPWRITE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
pub const DEFAULT_DEBOUNCE_MS: u64 = 600;

pub const ENV_CATALOG_TOKEN: &str = "TMDB_API_KEY";
pub const ENV_CATALOG_BASE_URL: &str = "TMDB_API_BASE_URL";
pub const ENV_APPWRITE_ENDPOINT: &str = "APPWRITE_ENDPOINT";
pub const ENV_APPWRITE_PROJECT_ID: &str = "APPWRITE_PROJECT_ID";
pub const ENV_APPWRITE_DATABASE_ID: &str = "APPWRITE_DATABASE_ID";
pub const ENV_APPWRITE_COLLECTION_ID: &str = "APPWRITE_COLLECTION_ID";
pub const ENV_APPWRITE_API_KEY: &str = "APPWRITE_API_KEY";
pub const ENV_TRENDING_DB: &str = "REEL_TRENDING_DB";
pub const ENV_DEBOUNCE_MS: &str = "REEL_DEBOUNCE_MS";

/// Movie catalog API location and bearer token
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub token: String,
}

/// Hosted document collection holding trending rows
#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: Option<String>,
}

/// Where trending search counters are kept
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Appwrite(AppwriteConfig),
    Sqlite { path: PathBuf },
}

impl StoreConfig {
    /// Store settings alone, for commands that never touch the catalog
    pub fn from_env() -> Result<Self> {
        store_config(&|key: &str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }

    pub fn describe(&self) -> String {
        match self {
            StoreConfig::Appwrite(cfg) => {
                format!("appwrite {} ({})", cfg.endpoint, cfg.collection_id)
            }
            StoreConfig::Sqlite { path } => format!("sqlite {}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub store: StoreConfig,
    pub debounce: Duration,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = get(ENV_CATALOG_TOKEN).with_context(|| {
            format!(
                "{} is not set. Export a TMDB API read access token to search the catalog.",
                ENV_CATALOG_TOKEN
            )
        })?;
        let base_url = get(ENV_CATALOG_BASE_URL)
            .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let store = store_config(&get)?;

        let debounce_ms = match get(ENV_DEBOUNCE_MS) {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("{} must be a number of milliseconds", ENV_DEBOUNCE_MS))?,
            None => DEFAULT_DEBOUNCE_MS,
        };

        Ok(Self {
            catalog: CatalogConfig { base_url, token },
            store,
            debounce: Duration::from_millis(debounce_ms),
        })
    }
}

fn store_config(get: &dyn Fn(&str) -> Option<String>) -> Result<StoreConfig> {
    let project_id = get(ENV_APPWRITE_PROJECT_ID);
    let database_id = get(ENV_APPWRITE_DATABASE_ID);
    let collection_id = get(ENV_APPWRITE_COLLECTION_ID);

    match (project_id, database_id, collection_id) {
        (Some(project_id), Some(database_id), Some(collection_id)) => {
            let endpoint = get(ENV_APPWRITE_ENDPOINT)
                .unwrap_or_else(|| DEFAULT_APPWRITE_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string();
            Ok(StoreConfig::Appwrite(AppwriteConfig {
                endpoint,
                project_id,
                database_id,
                collection_id,
                api_key: get(ENV_APPWRITE_API_KEY),
            }))
        }
        (None, None, None) => {
            let path = match get(ENV_TRENDING_DB) {
                Some(path) => PathBuf::from(path),
                None => crate::reel_home_dir()?.join("trending.db"),
            };
            Ok(StoreConfig::Sqlite { path })
        }
        (project_id, database_id, collection_id) => {
            let missing: Vec<&str> = [
                (ENV_APPWRITE_PROJECT_ID, project_id.is_none()),
                (ENV_APPWRITE_DATABASE_ID, database_id.is_none()),
                (ENV_APPWRITE_COLLECTION_ID, collection_id.is_none()),
            ]
            .into_iter()
            .filter_map(|(key, is_missing)| is_missing.then_some(key))
            .collect();
            anyhow::bail!(
                "Trending store is partially configured, missing: {}",
                missing.join(", ")
            )
        }
    }
}
