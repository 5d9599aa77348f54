pub mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use skilldocs_core::models::Manifest;
use skilldocs_core::navigation::NavigationTree;
use skilldocs_core::search::SearchIndex;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::content::ContentSource;
use crate::error::NavigationError;
use crate::navigation::load_manifest;

/// Shared, read-only state behind the preview API.
#[derive(Debug, Clone)]
pub struct SiteState {
    inner: Arc<SiteInner>,
}

#[derive(Debug)]
struct SiteInner {
    manifest: Manifest,
    tree: NavigationTree,
    search: SearchIndex,
    source: Arc<dyn ContentSource>,
}

impl SiteState {
    /// Load the manifest from `source` and build the indexes once.
    pub async fn load(source: Arc<dyn ContentSource>) -> Result<Self, NavigationError> {
        let manifest = load_manifest(source.as_ref()).await?;
        Ok(Self::new(manifest, source))
    }

    pub fn new(manifest: Manifest, source: Arc<dyn ContentSource>) -> Self {
        let tree = NavigationTree::build(&manifest);
        let search = SearchIndex::new(tree.articles());
        Self {
            inner: Arc::new(SiteInner {
                manifest,
                tree,
                search,
                source,
            }),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.inner.manifest
    }

    pub fn tree(&self) -> &NavigationTree {
        &self.inner.tree
    }

    pub fn search(&self) -> &SearchIndex {
        &self.inner.search
    }

    pub fn source(&self) -> &dyn ContentSource {
        self.inner.source.as_ref()
    }
}

/// Build the preview server.
///
/// `/api/*` answers from `state`; everything else is served from
/// `site_dir` when given. `cors_origins` of `None` allows any origin.
pub fn create_router(
    state: SiteState,
    site_dir: Option<PathBuf>,
    cors_origins: Option<&[String]>,
) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/manifest", get(handlers::get_manifest))
        .route("/articles", get(handlers::list_articles))
        .route("/search", get(handlers::search))
        .route("/resolve", get(handlers::resolve))
        .route(
            "/render/{skill}/{topic}/{article}",
            get(handlers::render_article),
        );

    let mut app = Router::new().nest("/api", api).with_state(state);
    if let Some(dir) = site_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors_origins)),
    )
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        None => CorsLayer::permissive(),
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", o);
                        None
                    }
                })
                .collect();
            CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
        }
    }
}
