//! Navigation: loads the manifest and answers path and tree queries.

use std::sync::Arc;

use skilldocs_core::models::{FlatArticleRecord, Manifest};
use skilldocs_core::navigation::{NavSkill, NavigationTree};
use skilldocs_core::tree_render::render_tree;

use crate::content::ContentSource;
use crate::error::NavigationError;
use crate::router::Router;

/// Manifest location relative to the site root.
pub const MANIFEST_PATH: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavStatus {
    Loading,
    Ready,
    /// The manifest could not be loaded. The tree stays empty.
    Failed(String),
}

#[derive(Debug)]
pub struct Navigation {
    tree: NavigationTree,
    manifest: Option<Arc<Manifest>>,
    status: NavStatus,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigation {
    pub fn new() -> Self {
        Self {
            tree: NavigationTree::default(),
            manifest: None,
            status: NavStatus::Loading,
        }
    }

    /// Build navigation from an already loaded manifest.
    pub fn from_manifest(manifest: Manifest) -> Self {
        Self {
            tree: NavigationTree::build(&manifest),
            manifest: Some(Arc::new(manifest)),
            status: NavStatus::Ready,
        }
    }

    /// Fetch and parse the manifest, then build the tree and flat index.
    ///
    /// On failure navigation is left empty in the `Failed` state; the error
    /// is returned for logging only. There is no retry.
    pub async fn init(&mut self, source: &dyn ContentSource) -> Result<(), NavigationError> {
        self.status = NavStatus::Loading;

        match load_manifest(source).await {
            Ok(manifest) => {
                *self = Self::from_manifest(manifest);
                tracing::info!(
                    source = %source.describe(),
                    articles = self.tree.articles().len(),
                    "Navigation loaded"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(source = %source.describe(), "Failed to load navigation: {}", e);
                self.tree = NavigationTree::default();
                self.manifest = None;
                self.status = NavStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn status(&self) -> &NavStatus {
        &self.status
    }

    pub fn manifest(&self) -> Option<Arc<Manifest>> {
        self.manifest.clone()
    }

    pub fn skills(&self) -> &[NavSkill] {
        self.tree.skills()
    }

    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    /// Resolve route slugs to a fetchable content path.
    pub fn get_article_path(&self, skill: &str, topic: &str, article: &str) -> Option<String> {
        self.tree.get_article_path(skill, topic, article)
    }

    /// The flat article index, shared read-only.
    pub fn get_all_articles(&self) -> Arc<[FlatArticleRecord]> {
        self.tree.articles()
    }

    pub fn update_active_state(&mut self, router: &Router) {
        self.tree.update_active_state(router.current());
    }

    /// ASCII rendering of the tree, or a note when loading failed.
    pub fn render(&self) -> String {
        match &self.status {
            NavStatus::Failed(message) => format!("Navigation unavailable: {}\n", message),
            NavStatus::Loading => "Loading navigation...\n".to_string(),
            NavStatus::Ready if self.tree.is_empty() => "No skills yet.\n".to_string(),
            NavStatus::Ready => render_tree(self.tree.skills()),
        }
    }
}

/// Fetch and parse `manifest.json` from a content source.
pub async fn load_manifest(source: &dyn ContentSource) -> Result<Manifest, NavigationError> {
    let text = source.fetch(MANIFEST_PATH).await?;
    Ok(Manifest::from_json(&text)?)
}
