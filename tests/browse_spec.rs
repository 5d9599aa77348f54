mod common;

use common::{site, Harness};
use skilldocs::browse;

async fn session(input: &str) -> String {
    let dir = site();
    let mut h = Harness::new(dir.path()).await;
    let mut out = Vec::new();

    browse::run(&mut h.app, &mut h.rx, input.as_bytes(), &mut out)
        .await
        .expect("session runs");

    String::from_utf8(out).expect("utf-8 output")
}

mod commands {
    use super::*;

    #[tokio::test]
    async fn info_reports_the_manifest() {
        let out = session("info\nquit\n").await;
        assert!(out.contains("2 skills, 4 articles, generated 2026-01-15 10:30 UTC"));
    }

    #[tokio::test]
    async fn search_lists_results() {
        let out = session("search apex\nquit\n").await;
        assert!(out.contains("1. Apex Programming Basics  [Salesforce / Development]"));
    }

    #[tokio::test]
    async fn tree_shows_skills() {
        let out = session("tree\nquit\n").await;
        assert!(out.contains("▸ Salesforce"));
        assert!(out.contains("▸ Frontend"));
    }

    #[tokio::test]
    async fn reports_bad_commands() {
        let out = session("dance\nkey\nquit\n").await;
        assert!(out.contains("error: unknown command: dance"));
        assert!(out.contains("error: key needs exactly one character"));
    }

    #[tokio::test]
    async fn theme_key_announces_the_change() {
        let out = session("key t\n").await;
        assert!(out.contains("Theme: light"));
    }

    #[tokio::test]
    async fn typing_in_search_does_not_fire_shortcuts() {
        let out = session("search apex\nkey t\nesc\nkey b\nquit\n").await;
        assert!(!out.contains("Theme: light"));
        assert!(out.contains("Sidebar hidden"));
    }
}

mod article {
    use super::*;

    #[tokio::test]
    async fn scrolling_highlights_the_heading_in_view() {
        let out = session("go #/sf/dev/apex-basics\nscroll 100\nquit\n").await;
        assert!(out.contains("Reading #classes"));
    }

    #[tokio::test]
    async fn end_of_input_waits_for_the_article() {
        let out = session("go #/sf/dev/apex-basics\n").await;
        assert!(out.contains("(content/Salesforce/02-development/apex.md), 4 headings"));

        let out = session("go #/sf/dev/apex-basics\nshow\n").await;
        assert!(out.contains("<h2 id=\"variables\">Variables</h2>"));
    }
}
