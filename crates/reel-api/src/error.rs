use thiserror::Error;

/// Message shown for transport, status and decode failures
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch movies. Please try again later.";

/// Message used when the API reports a failure without any text of its own
pub const DEFAULT_API_ERROR: &str = "Failed to fetch movies";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to fetch movies: HTTP {status}")]
    Status { status: u16, body: String },
    #[error("Failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Catalog API error: {0}")]
    Api(String),
}

impl FetchError {
    /// Text shown to the user. API-reported failures carry their own message,
    /// everything else collapses to the generic one.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Api(message) => message.clone(),
            _ => GENERIC_FETCH_ERROR.to_string(),
        }
    }
}
