use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use skilldocs_core::document::{ArticleDocument, FrontMatter};
use skilldocs_core::models::{FlatArticleRecord, Manifest, Route};
use skilldocs_core::routing::parse_hash;
use skilldocs_core::search::SearchResult;
use skilldocs_core::toc::{TableOfContents, TocEntry};

use super::SiteState;
use crate::error::FetchError;

// ============================================================
// Error Handling
// ============================================================

/// Map a fetch failure to a response. Missing files are a plain 404; other
/// failures are logged and reported without internal detail.
fn fetch_error(e: FetchError) -> (StatusCode, String) {
    if e.is_not_found() {
        tracing::warn!("Article missing: {}", e);
        return (StatusCode::NOT_FOUND, "Article not found".to_string());
    }

    tracing::error!("Failed to fetch article: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health(State(state): State<SiteState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "articles": state.search().len(),
        "generated": state.manifest().generated,
    }))
}

// ============================================================
// Manifest & Index
// ============================================================

pub async fn get_manifest(State(state): State<SiteState>) -> Json<Manifest> {
    Json(state.manifest().clone())
}

pub async fn list_articles(State(state): State<SiteState>) -> Json<Vec<FlatArticleRecord>> {
    Json(state.tree().articles().to_vec())
}

// ============================================================
// Search
// ============================================================

/// Query parameters for searching articles.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search text matched against titles, skills and topics.
    #[serde(default)]
    pub q: String,
}

/// Rank articles by title, skill and topic. At most ten results.
pub async fn search(
    State(state): State<SiteState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<SearchResult>> {
    Json(state.search().search(&query.q))
}

// ============================================================
// Routing
// ============================================================

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Fragment such as `#/sf/admin/user-management`.
    pub hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub route: Route,
    pub path: String,
}

/// Resolve a fragment to the content path it loads.
pub async fn resolve(
    State(state): State<SiteState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, (StatusCode, String)> {
    let route = parse_hash(&query.hash);
    let path = route
        .article_slugs()
        .and_then(|(s, t, a)| state.tree().get_article_path(s, t, a))
        .ok_or((StatusCode::NOT_FOUND, "Article not found".to_string()))?;

    Ok(Json(ResolveResponse { route, path }))
}

// ============================================================
// Rendering
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RenderedArticle {
    pub path: String,
    pub title: Option<String>,
    pub meta: FrontMatter,
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub toc_html: String,
}

/// Fetch, render and index one article.
pub async fn render_article(
    State(state): State<SiteState>,
    Path((skill, topic, article)): Path<(String, String, String)>,
) -> Result<Json<RenderedArticle>, (StatusCode, String)> {
    let path = state
        .tree()
        .get_article_path(&skill, &topic, &article)
        .ok_or((StatusCode::NOT_FOUND, "Article not found".to_string()))?;

    let markdown = state.source().fetch(&path).await.map_err(fetch_error)?;
    let mut document = ArticleDocument::parse(&markdown);

    let mut toc = TableOfContents::default();
    let entries = toc.generate(&mut document).to_vec();

    Ok(Json(RenderedArticle {
        title: document.title().map(str::to_string),
        html: format!("{}{}", document.meta_html(), document.to_html()),
        meta: document.meta,
        toc: entries,
        toc_html: toc.render_html(),
        path,
    }))
}
