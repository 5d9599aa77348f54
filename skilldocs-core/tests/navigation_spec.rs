use skilldocs_core::models::{Manifest, DEFAULT_ORDER};
use skilldocs_core::navigation::NavigationTree;
use skilldocs_core::routing::parse_hash;
use skilldocs_core::tree_render::render_tree;
use speculate2::speculate;

const SALESFORCE: &str = r#"{
    "skills": [{
        "slug": "sf",
        "folder": "Salesforce",
        "topics": [{
            "slug": "admin",
            "folder": "Admin",
            "articles": [{
                "slug": "user-management",
                "file": "user-management",
                "title": "User Management in Salesforce"
            }]
        }]
    }]
}"#;

const UNORDERED: &str = r#"{
    "generated": "2026-01-15T10:30:00Z",
    "skills": [
        {"slug": "zz", "name": "Zebra", "folder": "zebra", "order": 1, "topics": []},
        {"slug": "fe", "name": "Frontend", "folder": "02-frontend", "topics": [
            {"slug": "b", "name": "Beta", "folder": "beta", "order": 2, "articles": [
                {"slug": "second", "file": "second", "title": "Second"},
                {"slug": "first", "file": "first", "title": "First"}
            ]},
            {"slug": "a", "name": "Alpha", "folder": "alpha", "order": 2, "articles": []},
            {"slug": "c", "folder": "01-getting-started", "order": 1, "articles": [
                {"slug": "intro", "file": "intro"}
            ]}
        ]},
        {"slug": "be", "name": "Backend", "folder": "backend", "order": 1, "topics": []}
    ]
}"#;

fn tree(json: &str) -> NavigationTree {
    NavigationTree::build(&Manifest::from_json(json).expect("valid manifest"))
}

speculate! {
    describe "get_article_path" {
        it "resolves slugs to folder paths" {
            let tree = tree(SALESFORCE);
            assert_eq!(
                tree.get_article_path("sf", "admin", "user-management").as_deref(),
                Some("content/Salesforce/Admin/user-management.md")
            );
        }

        it "returns None for an unknown level" {
            let tree = tree(SALESFORCE);
            assert!(tree.get_article_path("nope", "admin", "user-management").is_none());
            assert!(tree.get_article_path("sf", "nope", "user-management").is_none());
            assert!(tree.get_article_path("sf", "admin", "nope").is_none());
        }

        it "returns None on an empty tree" {
            assert!(NavigationTree::default().get_article_path("sf", "admin", "x").is_none());
        }
    }

    describe "build" {
        it "sorts skills by order then name" {
            let tree = tree(UNORDERED);
            let slugs: Vec<&str> = tree.skills().iter().map(|s| s.slug.as_str()).collect();
            assert_eq!(slugs, ["be", "zz", "fe"]);
            assert_eq!(tree.skills()[2].order, DEFAULT_ORDER);
        }

        it "sorts topics by order then name" {
            let tree = tree(UNORDERED);
            let topics: Vec<&str> = tree.skills()[2].topics.iter().map(|t| t.slug.as_str()).collect();
            assert_eq!(topics, ["c", "a", "b"]);
        }

        it "keeps article order from the manifest" {
            let tree = tree(UNORDERED);
            let beta = &tree.skills()[2].topics[2];
            let slugs: Vec<&str> = beta.articles.iter().map(|a| a.slug.as_str()).collect();
            assert_eq!(slugs, ["second", "first"]);
        }

        it "derives missing names and titles" {
            let tree = tree(UNORDERED);
            let topic = &tree.skills()[2].topics[0];
            assert_eq!(topic.name, "Getting Started");
            assert_eq!(topic.articles[0].title, "Intro");
        }

        it "builds the flat index in tree order" {
            let tree = tree(UNORDERED);
            let titles: Vec<String> = tree.articles().iter().map(|a| a.title.clone()).collect();
            assert_eq!(titles, ["Intro", "Second", "First"]);
            assert_eq!(tree.articles()[0].skill, "Frontend");
            assert_eq!(tree.articles()[0].route_path(), "fe/c/intro");
        }
    }

    describe "update_active_state" {
        it "expands ancestors and marks the article" {
            let mut tree = tree(SALESFORCE);
            tree.update_active_state(&parse_hash("#/sf/admin/user-management"));

            let skill = &tree.skills()[0];
            assert!(skill.expanded && !skill.active);
            assert!(skill.topics[0].expanded && !skill.topics[0].active);
            assert!(skill.topics[0].articles[0].active);
        }

        it "clears state when navigating home" {
            let mut tree = tree(SALESFORCE);
            tree.update_active_state(&parse_hash("#/sf/admin/user-management"));
            tree.update_active_state(&parse_hash("#/"));

            let skill = &tree.skills()[0];
            assert!(!skill.expanded);
            assert!(!skill.topics[0].articles[0].active);
        }

        it "finds the routed article" {
            let tree = tree(SALESFORCE);
            let found = tree.find_article(&parse_hash("#/sf/admin/user-management"));
            assert_eq!(found.map(|a| a.title.as_str()), Some("User Management in Salesforce"));
        }
    }

    describe "render_tree" {
        it "hides collapsed topics" {
            let tree = tree(SALESFORCE);
            let text = render_tree(tree.skills());
            assert!(text.contains("Salesforce"));
            assert!(!text.contains("User Management"));
        }

        it "shows the active path" {
            let mut tree = tree(SALESFORCE);
            tree.update_active_state(&parse_hash("#/sf/admin/user-management"));
            let text = render_tree(tree.skills());
            assert!(text.contains("User Management in Salesforce"));
        }
    }
}
