mod common;

use std::sync::Arc;

use axum_test::TestServer;
use common::{empty_site, site, USER_MANAGEMENT_PATH};
use skilldocs::api::{create_router, handlers::RenderedArticle, handlers::ResolveResponse, SiteState};
use skilldocs::content::{ContentSource, FsSource};
use skilldocs::models::{FlatArticleRecord, Manifest};
use skilldocs::search::SearchResult;
use tempfile::TempDir;

async fn setup() -> (TestServer, TempDir) {
    let dir = site();
    let source: Arc<dyn ContentSource> = Arc::new(FsSource::new(dir.path()));
    let state = SiteState::load(source)
        .await
        .expect("Failed to load site");
    let app = create_router(state, Some(dir.path().to_path_buf()), None);
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, dir)
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_article_count() {
        let (server, _dir) = setup().await;

        let response = server.get("/api/health").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["articles"], 4);
        assert_eq!(body["generated"], "2026-01-15T10:30:00Z");
    }
}

mod manifest {
    use super::*;

    #[tokio::test]
    async fn returns_the_manifest() {
        let (server, _dir) = setup().await;

        let manifest: Manifest = server.get("/api/manifest").await.json();

        assert_eq!(manifest.skills.len(), 2);
        assert_eq!(manifest.article_count(), 4);
    }

    #[tokio::test]
    async fn lists_articles_in_tree_order() {
        let (server, _dir) = setup().await;

        let articles: Vec<FlatArticleRecord> = server.get("/api/articles").await.json();

        let slugs: Vec<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, ["user-management", "gone", "apex-basics", "async-await"]);
        assert_eq!(articles[2].topic, "Development");
    }

    #[tokio::test]
    async fn fails_to_load_without_a_manifest() {
        let dir = empty_site();
        let source: Arc<dyn ContentSource> = Arc::new(FsSource::new(dir.path()));
        assert!(SiteState::load(source).await.is_err());
    }
}

mod search {
    use super::*;

    #[tokio::test]
    async fn ranks_matches() {
        let (server, _dir) = setup().await;

        let response = server.get("/api/search").add_query_param("q", "apex").await;

        response.assert_status_ok();
        let results: Vec<SearchResult> = response.json();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].article.title, "Apex Programming Basics");
        assert_eq!(results[0].score, 15);
    }

    #[tokio::test]
    async fn empty_query_returns_nothing() {
        let (server, _dir) = setup().await;

        let results: Vec<SearchResult> = server.get("/api/search").await.json();

        assert!(results.is_empty());
    }
}

mod resolve {
    use super::*;

    #[tokio::test]
    async fn resolves_a_fragment() {
        let (server, _dir) = setup().await;

        let response = server
            .get("/api/resolve")
            .add_query_param("hash", "#/sf/admin/user-management")
            .await;

        response.assert_status_ok();
        let resolved: ResolveResponse = response.json();
        assert_eq!(resolved.path, USER_MANAGEMENT_PATH);
        assert_eq!(resolved.route.topic.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn returns_404_for_unknown_articles() {
        let (server, _dir) = setup().await;

        server
            .get("/api/resolve")
            .add_query_param("hash", "#/sf/admin/nope")
            .await
            .assert_status_not_found();

        server
            .get("/api/resolve")
            .add_query_param("hash", "#/sf")
            .await
            .assert_status_not_found();
    }
}

mod render {
    use super::*;

    #[tokio::test]
    async fn renders_html_and_toc() {
        let (server, _dir) = setup().await;

        let response = server.get("/api/render/sf/admin/user-management").await;

        response.assert_status_ok();
        let article: RenderedArticle = response.json();
        assert_eq!(article.path, USER_MANAGEMENT_PATH);
        assert_eq!(article.title.as_deref(), Some("User Management in Salesforce"));
        assert_eq!(article.meta["difficulty"], "beginner");
        assert!(article.html.contains("<h2 id=\"creating-users\">"));
        assert!(!article.html.contains("<script>"));
        assert_eq!(article.toc.len(), 3);
        assert!(article.toc_html.contains("data-target=\"profiles\""));
    }

    #[tokio::test]
    async fn shows_the_empty_toc_state() {
        let (server, _dir) = setup().await;

        let article: RenderedArticle = server.get("/api/render/fe/js/async-await").await.json();

        assert!(article.toc.is_empty());
        assert!(article.toc_html.contains("No headings in this article"));
    }

    #[tokio::test]
    async fn returns_404_for_unknown_routes() {
        let (server, _dir) = setup().await;

        server
            .get("/api/render/sf/admin/nope")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn returns_404_for_missing_files() {
        let (server, _dir) = setup().await;

        server
            .get("/api/render/sf/admin/gone")
            .await
            .assert_status_not_found();
    }
}

mod static_files {
    use super::*;

    #[tokio::test]
    async fn serves_site_files() {
        let (server, _dir) = setup().await;

        let response = server.get("/manifest.json").await;

        response.assert_status_ok();
        assert!(response.text().contains("\"slug\": \"sf\""));
    }
}
