//! Site configuration loaded from environment variables.
//!
//! - `SKILLDOCS_SITE_DIR` - site root holding `manifest.json` and `content/` (default: `.`)
//! - `SKILLDOCS_URL` - fetch the site from this base URL instead of the directory
//! - `SKILLDOCS_PORT` - port for `serve` (default: 4000)
//! - `SKILLDOCS_CORS_ORIGINS` - comma-separated allowed origins (default: any)
//! - `SKILLDOCS_HEADER_HEIGHT` / `SKILLDOCS_SCROLL_OFFSET` - scroll-spy threshold tuning
//!
//! Command-line flags override these.

use std::path::PathBuf;
use std::sync::Arc;

use crate::content::{ContentSource, FsSource, HttpSource};

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_HEADER_HEIGHT: f64 = 64.0;
pub const DEFAULT_SCROLL_OFFSET: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site_dir: PathBuf,
    pub base_url: Option<String>,
    pub port: u16,
    pub cors_origins: Option<Vec<String>>,
    pub header_height: f64,
    pub scroll_offset: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from("."),
            base_url: None,
            port: DEFAULT_PORT,
            cors_origins: None,
            header_height: DEFAULT_HEADER_HEIGHT,
            scroll_offset: DEFAULT_SCROLL_OFFSET,
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let site_dir = std::env::var("SKILLDOCS_SITE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.site_dir);

        let base_url = std::env::var("SKILLDOCS_URL")
            .ok()
            .filter(|s| !s.is_empty());

        let port = std::env::var("SKILLDOCS_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let cors_origins = std::env::var("SKILLDOCS_CORS_ORIGINS").ok().map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let header_height = env_f64("SKILLDOCS_HEADER_HEIGHT").unwrap_or(defaults.header_height);
        let scroll_offset = env_f64("SKILLDOCS_SCROLL_OFFSET").unwrap_or(defaults.scroll_offset);

        Self {
            site_dir,
            base_url,
            port,
            cors_origins,
            header_height,
            scroll_offset,
        }
    }

    /// Override the site location. A URL replaces any directory.
    pub fn with_site(mut self, dir: Option<PathBuf>, url: Option<String>) -> Self {
        if let Some(dir) = dir {
            self.site_dir = dir;
            self.base_url = None;
        }
        if let Some(url) = url {
            self.base_url = Some(url);
        }
        self
    }

    /// The content source this configuration points at.
    pub fn content_source(&self) -> Arc<dyn ContentSource> {
        match &self.base_url {
            Some(url) => Arc::new(HttpSource::new(url.clone())),
            None => Arc::new(FsSource::new(self.site_dir.clone())),
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
