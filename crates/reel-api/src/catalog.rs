//! Movie catalog client (TMDB v3 REST API)

use crate::config::CatalogConfig;
use crate::error::{DEFAULT_API_ERROR, FetchError};
use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Image CDN prefix for poster paths returned by the catalog
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Public web page for a movie id
pub const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A movie as returned by the catalog. The commonly displayed fields are typed,
/// everything else is carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Movie {
    /// Year part of `release_date` ("2021-10-22" -> "2021")
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }

    pub fn poster_url(&self) -> String {
        poster_url(self.poster_path.as_deref())
    }

    pub fn page_url(&self) -> String {
        format!("{}/{}", MOVIE_PAGE_BASE_URL, self.id)
    }
}

/// Full poster URL for a catalog poster path, empty when the movie has none
pub fn poster_url(poster_path: Option<&str>) -> String {
    match poster_path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}{}", POSTER_BASE_URL, path),
        None => String::new(),
    }
}

/// Endpoint for a query: the popularity listing when empty, text search otherwise
pub fn catalog_endpoint(base_url: &str, query: &str) -> String {
    if query.is_empty() {
        format!("{}/discover/movie?sort_by=popularity.desc", base_url)
    } else {
        format!(
            "{}/search/movie?query={}",
            base_url,
            urlencoding::encode(query)
        )
    }
}

/// Response body. Two failure conventions show up in the wild: the
/// `Response`/`Error` pair, and TMDB's own `success`/`status_message`.
#[derive(Debug, Default, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    results: Option<Vec<Movie>>,
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    status_message: Option<String>,
}

/// Decode a successful (2xx) response body into the movie list
pub fn parse_catalog_body(body: &str) -> Result<Vec<Movie>, FetchError> {
    let parsed: CatalogResponse = serde_json::from_str(body)?;

    if parsed.response.as_deref() == Some("False") {
        let message = parsed
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_API_ERROR.to_string());
        return Err(FetchError::Api(message));
    }

    if parsed.success == Some(false) {
        let message = parsed
            .status_message
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_API_ERROR.to_string());
        return Err(FetchError::Api(message));
    }

    Ok(parsed.results.unwrap_or_default())
}

/// Source of movie listings. Abstracted so the search worker can be driven by
/// an in-process fake in tests.
pub trait MovieCatalog: Send + Sync {
    /// Popular listing for an empty query, text search otherwise
    fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, FetchError>;
}

pub struct TmdbClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("reel/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }
}

impl MovieCatalog for TmdbClient {
    fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, FetchError> {
        let url = catalog_endpoint(&self.base_url, query);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        parse_catalog_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_endpoint() {
        assert_eq!(
            catalog_endpoint("https://api.themoviedb.org/3", ""),
            "https://api.themoviedb.org/3/discover/movie?sort_by=popularity.desc"
        );
        assert_eq!(
            catalog_endpoint("https://api.themoviedb.org/3", "dune"),
            "https://api.themoviedb.org/3/search/movie?query=dune"
        );
        assert_eq!(
            catalog_endpoint("http://localhost", "star wars & co/2?"),
            "http://localhost/search/movie?query=star%20wars%20%26%20co%2F2%3F"
        );
        // Whitespace is a real query, not the popular listing
        assert_eq!(
            catalog_endpoint("http://localhost", " "),
            "http://localhost/search/movie?query=%20"
        );
    }

    #[test]
    fn test_parse_results() {
        let body = r#"{
            "page": 1,
            "results": [
                {
                    "id": 438631,
                    "title": "Dune",
                    "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
                    "popularity": 120.5,
                    "vote_average": 7.8,
                    "release_date": "2021-09-15",
                    "original_language": "en",
                    "genre_ids": [878, 12],
                    "adult": false
                }
            ],
            "total_pages": 1
        }"#;

        let movies = parse_catalog_body(body).unwrap();
        assert_eq!(movies.len(), 1);

        let dune = &movies[0];
        assert_eq!(dune.id, 438631);
        assert_eq!(dune.title, "Dune");
        assert_eq!(dune.release_year(), Some("2021"));
        assert_eq!(
            dune.poster_url(),
            "https://image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg"
        );
        assert_eq!(dune.page_url(), "https://www.themoviedb.org/movie/438631");
        // Fields without a typed accessor are kept
        assert_eq!(dune.extra.get("adult"), Some(&serde_json::json!(false)));
        assert_eq!(
            dune.extra.get("genre_ids"),
            Some(&serde_json::json!([878, 12]))
        );
    }

    #[test]
    fn test_parse_empty_and_missing_results() {
        for body in [r#"{"results": []}"#, r#"{"page": 1}"#, r#"{"results": null}"#] {
            assert!(parse_catalog_body(body).unwrap().is_empty());
        }
    }

    #[test]
    fn test_parse_api_failure_flags() {
        let err = parse_catalog_body(r#"{"Response": "False", "Error": "Movie not found!"}"#)
            .unwrap_err();
        assert_eq!(err.user_message(), "Movie not found!");

        let err = parse_catalog_body(r#"{"Response": "False"}"#).unwrap_err();
        assert_eq!(err.user_message(), DEFAULT_API_ERROR);

        let err = parse_catalog_body(
            r#"{"success": false, "status_code": 34, "status_message": "The resource you requested could not be found."}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.user_message(),
            "The resource you requested could not be found."
        );

        // "True" is not a failure
        let movies = parse_catalog_body(r#"{"Response": "True", "results": []}"#).unwrap();
        assert!(movies.is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_catalog_body("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert_eq!(err.user_message(), crate::error::GENERIC_FETCH_ERROR);
    }

    #[test]
    fn test_poster_url_and_year_edge_cases() {
        assert_eq!(poster_url(None), "");
        assert_eq!(poster_url(Some("")), "");

        let movie: Movie =
            serde_json::from_str(r#"{"id": 1, "title": "Untitled", "release_date": ""}"#).unwrap();
        assert_eq!(movie.release_year(), None);
        assert_eq!(movie.poster_url(), "");
    }
}
