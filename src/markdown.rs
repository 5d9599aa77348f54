//! Markdown renderer: fetches articles and keeps only the newest result.
//!
//! Every load gets a [`LoadTicket`]. A completion is applied only when its
//! ticket is still the newest one, so a slow fetch that finishes after a
//! later navigation cannot overwrite newer content. Superseded requests are
//! not cancelled, just ignored when they land.

use skilldocs_core::document::{escape_html, ArticleDocument};

use crate::content::ContentSource;
use crate::error::FetchError;

/// Identifies one article load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
pub enum RenderState {
    /// No article selected.
    Welcome,
    Loading { path: String },
    Ready { path: String, document: ArticleDocument },
    /// The article could not be resolved or fetched.
    NotFound { path: String, message: String },
}

/// Handed to the table of contents after a successful render.
#[derive(Debug)]
pub struct RenderComplete<'a> {
    pub path: &'a str,
    pub document: &'a mut ArticleDocument,
}

#[derive(Debug)]
pub struct MarkdownRenderer {
    generation: u64,
    state: RenderState,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: RenderState::Welcome,
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn document(&self) -> Option<&ArticleDocument> {
        match &self.state {
            RenderState::Ready { document, .. } => Some(document),
            _ => None,
        }
    }

    /// Start loading `path`, superseding any load still in flight.
    pub fn begin_load(&mut self, path: &str) -> LoadTicket {
        self.generation += 1;
        self.state = RenderState::Loading {
            path: path.to_string(),
        };
        LoadTicket(self.generation)
    }

    /// Whether `ticket` is the newest load.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a finished fetch.
    ///
    /// Stale tickets are discarded. Failures become the not-found
    /// placeholder and are never returned to the caller. On success the
    /// rendered document is handed back for the table of contents.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, FetchError>,
    ) -> Option<RenderComplete<'_>> {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, current = self.generation, "Discarding stale article");
            return None;
        }

        let path = match &self.state {
            RenderState::Loading { path } => path.clone(),
            _ => return None,
        };

        match result {
            Ok(markdown) => {
                self.state = RenderState::Ready {
                    path,
                    document: ArticleDocument::parse(&markdown),
                };
                match &mut self.state {
                    RenderState::Ready { path, document } => Some(RenderComplete {
                        path: path.as_str(),
                        document,
                    }),
                    _ => None,
                }
            }
            Err(e) => {
                tracing::warn!(path = %path, "Failed to load article: {}", e);
                self.state = RenderState::NotFound {
                    path,
                    message: e.to_string(),
                };
                None
            }
        }
    }

    /// Fetch and render in one step, for callers without an event loop.
    pub async fn load(
        &mut self,
        source: &dyn ContentSource,
        path: &str,
    ) -> Option<RenderComplete<'_>> {
        let ticket = self.begin_load(path);
        let result = source.fetch(path).await;
        self.complete(ticket, result)
    }

    /// Show the home state. Any load in flight is abandoned.
    pub fn show_welcome(&mut self) {
        self.generation += 1;
        self.state = RenderState::Welcome;
    }

    /// Show the placeholder for a route that resolves to nothing.
    pub fn show_not_found(&mut self, path: &str) {
        self.generation += 1;
        self.state = RenderState::NotFound {
            path: path.to_string(),
            message: "Article not found".to_string(),
        };
    }

    /// HTML for the current state.
    pub fn render_html(&self) -> String {
        match &self.state {
            RenderState::Welcome => concat!(
                "<div class=\"welcome\">\n",
                "<h1>Welcome</h1>\n",
                "<p>Pick a skill from the sidebar or press <kbd>/</kbd> to search.</p>\n",
                "</div>\n"
            )
            .to_string(),
            RenderState::Loading { .. } => "<div class=\"loading\">Loading...</div>\n".to_string(),
            RenderState::Ready { document, .. } => {
                format!("{}{}", document.meta_html(), document.to_html())
            }
            RenderState::NotFound { path, .. } => format!(
                "<div class=\"not-found\">\n<h1>Article not found</h1>\n<p>Could not load <code>{}</code>.</p>\n</div>\n",
                escape_html(path)
            ),
        }
    }
}
