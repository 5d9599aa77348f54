//! Ranked search over article metadata and the search panel state machine.
//!
//! Only titles, skill names and topic names are searched. Article bodies are
//! never fetched for indexing, so a word that appears only in the text of an
//! article will not find it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::models::FlatArticleRecord;

/// Maximum number of results returned by a search.
pub const MAX_RESULTS: usize = 10;

/// Shortest query (in characters) that opens the results panel.
pub const MIN_QUERY_LEN: usize = 2;

/// How long the panel stays open after losing focus, so a click on a result
/// still lands.
pub const BLUR_GRACE: Duration = Duration::from_millis(200);

const TITLE_TERM_SCORE: u32 = 10;
const TITLE_PREFIX_SCORE: u32 = 5;
const SKILL_SCORE: u32 = 3;
const TOPIC_SCORE: u32 = 2;

/// A scored article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub score: u32,
    /// Position of the article in the flat index.
    pub index: usize,
    pub article: FlatArticleRecord,
}

/// Scores the flat article index against queries.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    articles: Arc<[FlatArticleRecord]>,
}

impl SearchIndex {
    pub fn new(articles: Arc<[FlatArticleRecord]>) -> Self {
        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Rank articles for `query`, best first, at most [`MAX_RESULTS`].
    ///
    /// Titles are matched per whitespace-separated term; skill and topic names
    /// are matched against the whole query. Ties keep index order.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let raw = query.trim().to_lowercase();
        if raw.is_empty() {
            return Vec::new();
        }
        let terms: Vec<&str> = raw.split_whitespace().collect();

        let mut results: Vec<SearchResult> = self
            .articles
            .iter()
            .enumerate()
            .filter_map(|(index, article)| {
                let score = score_article(article, &terms, &raw);
                (score > 0).then(|| SearchResult {
                    score,
                    index,
                    article: article.clone(),
                })
            })
            .collect();

        // sort_by is stable, so equal scores stay in index order
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(MAX_RESULTS);
        results
    }
}

/// Additive relevance score. `terms` and `raw` must already be lowercase.
pub fn score_article(article: &FlatArticleRecord, terms: &[&str], raw: &str) -> u32 {
    let title = article.title.to_lowercase();
    let mut score = 0;

    for term in terms {
        if title.contains(term) {
            score += TITLE_TERM_SCORE;
            if title.starts_with(term) {
                score += TITLE_PREFIX_SCORE;
            }
        }
    }

    if article.skill.to_lowercase().contains(raw) {
        score += SKILL_SCORE;
    }
    if article.topic.to_lowercase().contains(raw) {
        score += TOPIC_SCORE;
    }

    score
}

/// Keys the results panel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKey {
    Up,
    Down,
    Enter,
    Escape,
}

/// State of the search results dropdown.
///
/// The panel is open whenever the query is long enough, even when nothing
/// matched (a "no results" placeholder still occupies the panel).
#[derive(Debug, Default)]
pub struct SearchPanel {
    query: String,
    results: Vec<SearchResult>,
    open: bool,
    cursor: Option<usize>,
    close_at: Option<Instant>,
}

impl SearchPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Index of the highlighted result, if any.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// True when the panel is showing the "no results" placeholder.
    pub fn shows_no_results(&self) -> bool {
        self.open && self.results.is_empty()
    }

    /// Handle a change of the query text.
    pub fn input(&mut self, index: &SearchIndex, query: &str) {
        self.query = query.to_string();
        self.cursor = None;
        self.close_at = None;

        if query.trim().chars().count() < MIN_QUERY_LEN {
            self.close();
            return;
        }

        self.results = index.search(query);
        self.open = true;
        tracing::trace!(query, results = self.results.len(), "Search panel updated");
    }

    /// Handle a key press while the search input has focus.
    ///
    /// Returns the fragment path to navigate to when Enter activates a result.
    pub fn key(&mut self, key: PanelKey) -> Option<String> {
        match key {
            PanelKey::Escape => {
                self.close();
                None
            }
            _ if !self.open || self.results.is_empty() => None,
            PanelKey::Down => {
                let last = self.results.len() - 1;
                self.cursor = Some(self.cursor.map_or(0, |i| (i + 1).min(last)));
                None
            }
            PanelKey::Up => {
                self.cursor = Some(self.cursor.map_or(0, |i| i.saturating_sub(1)));
                None
            }
            PanelKey::Enter => self.cursor.and_then(|i| self.select(i)),
        }
    }

    /// Activate the result at `position`, closing the panel.
    pub fn select(&mut self, position: usize) -> Option<String> {
        let path = self.results.get(position)?.article.route_path();
        self.close();
        self.query.clear();
        Some(path)
    }

    /// The input lost focus; close once the grace period has passed.
    pub fn blur(&mut self, now: Instant) {
        if self.open {
            self.close_at = Some(now + BLUR_GRACE);
        }
    }

    /// The input regained focus before the grace period ended.
    pub fn focus(&mut self) {
        self.close_at = None;
    }

    /// Apply a pending blur close whose deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.close_at.is_some_and(|deadline| now >= deadline) {
            self.close();
        }
    }

    /// A click landed outside both the input and the panel.
    pub fn outside_click(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.open = false;
        self.cursor = None;
        self.close_at = None;
        self.results.clear();
    }
}
