//! Error types for fetching content, loading navigation and storing preferences.

use thiserror::Error;

/// Failure to fetch a file from a content source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} while fetching {path}")]
    Status { path: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid content path: {0}")]
    InvalidPath(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Failure to load the manifest. Fatal to navigation, never to the app.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Failed to fetch manifest: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to access preferences file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode preferences: {0}")]
    Json(#[from] serde_json::Error),
}
