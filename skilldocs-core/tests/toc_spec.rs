use skilldocs_core::document::ArticleDocument;
use skilldocs_core::toc::{PanelViewport, TableOfContents, TocLayout, EMPTY_MESSAGE};
use speculate2::speculate;

const ARTICLE: &str = "\
# Overview

Intro text.

## Setup {#custom-setup}

### Step One

#### Details

##### Too Deep

## ???

## Wrap Up
";

fn layout() -> TocLayout {
    TocLayout {
        heading_tops: vec![0.0, 400.0, 800.0, 1200.0, 1600.0, 2000.0],
        links: (0..6).map(|i| (f64::from(i) * 30.0, 30.0)).collect(),
        panel: PanelViewport {
            scroll_top: 0.0,
            height: 90.0,
        },
    }
}

speculate! {
    before {
        let mut toc = TableOfContents::new(64.0, 20.0);
        let mut document = ArticleDocument::parse(ARTICLE);
    }

    describe "generate" {
        it "collects headings up to level four" {
            let entries = toc.generate(&mut document);
            let levels: Vec<u8> = entries.iter().map(|e| e.level).collect();
            assert_eq!(levels, [1, 2, 3, 4, 2, 2]);
        }

        it "assigns ids from text, existing ids or position" {
            let ids: Vec<String> = toc.generate(&mut document).iter().map(|e| e.id.clone()).collect();
            assert_eq!(
                ids,
                ["overview", "custom-setup", "step-one", "details", "heading-4", "wrap-up"]
            );
        }

        it "writes the ids into the rendered article" {
            toc.generate(&mut document);
            let html = document.to_html();
            assert!(html.contains("id=\"overview\""));
            assert!(html.contains("id=\"step-one\""));
            assert!(html.contains("id=\"heading-4\""));
        }

        it "discards the previous article" {
            toc.generate(&mut document);
            toc.set_layout(layout());
            toc.on_scroll(900.0);
            toc.on_frame();
            assert!(toc.active().is_some());

            let mut next = ArticleDocument::parse("## Only One\n");
            let entries = toc.generate(&mut next);
            assert_eq!(entries.len(), 1);
            assert_eq!(toc.active(), None);
        }

        it "shows the empty state without headings" {
            let mut plain = ArticleDocument::parse("Just a paragraph.\n");
            toc.generate(&mut plain);
            assert!(toc.is_empty());
            assert!(toc.render_html().contains(EMPTY_MESSAGE));
        }
    }

    describe "scroll spy" {
        before {
            toc.generate(&mut document);
            toc.set_layout(layout());
        }

        it "requests one frame per burst of scrolls" {
            assert!(toc.on_scroll(10.0));
            assert!(!toc.on_scroll(20.0));
            assert!(!toc.on_scroll(30.0));
            toc.on_frame();
            assert!(toc.on_scroll(40.0));
        }

        it "evaluates the latest scroll position" {
            toc.on_scroll(0.0);
            toc.on_scroll(1150.0);
            let change = toc.on_frame().expect("active heading changes");
            // threshold 1150 + 64 + 20 = 1234 is past the fourth heading
            assert_eq!(change.current, 3);
            assert_eq!(change.id, "details");
            assert_eq!(change.previous, None);
        }

        it "does nothing without a pending frame" {
            assert_eq!(toc.on_frame(), None);
        }

        it "reports only changes" {
            toc.on_scroll(0.0);
            assert!(toc.on_frame().is_some());
            toc.on_scroll(5.0);
            assert_eq!(toc.on_frame(), None);
        }

        it "falls back to the first heading near the top" {
            let mut layout = layout();
            layout.heading_tops = vec![500.0, 900.0];
            layout.links.truncate(2);
            toc.set_layout(layout);
            toc.on_scroll(0.0);
            assert_eq!(toc.on_frame().map(|c| c.current), Some(0));
        }

        it "scrolls the panel to reveal the active link" {
            toc.on_scroll(1950.0);
            let change = toc.on_frame().expect("active heading changes");
            assert_eq!(change.current, 5);
            // link at 150..180 centred in a 90px panel
            assert_eq!(change.panel_scroll, Some(120.0));
            assert_eq!(toc.panel().scroll_top, 120.0);
        }

        it "marks the active link" {
            toc.on_scroll(420.0);
            toc.on_frame();
            assert_eq!(toc.active_entry().map(|e| e.id.as_str()), Some("custom-setup"));
            assert!(toc.render_html().contains("toc-level-2 active"));
        }
    }
}
