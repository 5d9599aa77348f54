//! Content sources: where the manifest and markdown files come from.
//!
//! A site is a directory (or URL prefix) holding `manifest.json` and a
//! `content/` tree. [`FsSource`] reads it from disk and [`HttpSource`]
//! fetches it from a server, e.g. one started with `skilldocs serve`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::FetchError;

/// Fetches site files by relative path (`manifest.json`,
/// `content/<skill>/<topic>/<file>.md`).
#[async_trait]
pub trait ContentSource: Send + Sync + std::fmt::Debug {
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;

    /// Human readable location, for logs.
    fn describe(&self) -> String;
}

/// Reads site files from a local directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `path` onto the root, refusing anything that could escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ContentSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full = self.resolve(path)?;
        tracing::debug!(path = %full.display(), "Reading site file");

        tokio::fs::read_to_string(&full).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(path.to_string())
            } else {
                FetchError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Fetches site files over HTTP relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "Fetching site file");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        match status {
            s if s.is_success() => Ok(response.text().await?),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(path.to_string())),
            _ => Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
