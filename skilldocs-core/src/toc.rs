//! Table of contents generation and scroll-spy.
//!
//! [`TableOfContents::generate`] runs once per rendered article and throws
//! away everything from the previous one. Layout (heading positions, link
//! positions, panel size) is supplied by whatever renders the page, via
//! [`TableOfContents::set_layout`].

use serde::{Deserialize, Serialize};

use crate::document::{escape_html, ArticleDocument};

/// Deepest heading level included in the table of contents.
pub const MAX_LEVEL: u8 = 4;

/// Shown instead of an empty list when an article has no headings.
pub const EMPTY_MESSAGE: &str = "No headings in this article";

/// Turn heading text into an anchor id.
///
/// Lowercases, drops everything that is not an ASCII word character,
/// whitespace or `-`, turns whitespace runs into `-` and collapses repeated
/// hyphens. May return an empty string.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_space = false;

    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;

        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            if c == '-' && slug.ends_with('-') {
                continue;
            }
            slug.push(c);
        }
    }

    // Whitespace next to stripped characters can leave doubled hyphens.
    while slug.contains("--") {
        slug = slug.replace("--", "-");
    }
    slug
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Visible portion of the scrollable TOC panel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelViewport {
    pub scroll_top: f64,
    pub height: f64,
}

/// Positions measured after the article and TOC have been laid out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TocLayout {
    /// Document top of each heading, parallel to the entries.
    pub heading_tops: Vec<f64>,
    /// Top and height of each link inside the panel, parallel to the entries.
    pub links: Vec<(f64, f64)>,
    pub panel: PanelViewport,
}

/// Result of a scroll-spy evaluation that moved the active heading.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveChange {
    pub previous: Option<usize>,
    pub current: usize,
    pub id: String,
    /// New panel scroll offset, when the active link was out of view.
    pub panel_scroll: Option<f64>,
}

/// Index of the heading the reader is currently under.
///
/// Scans from the last heading to the first and picks the first whose top
/// is at or above `threshold`. When every heading is below the threshold
/// the first heading is reported.
pub fn active_heading(heading_tops: &[f64], threshold: f64) -> Option<usize> {
    if heading_tops.is_empty() {
        return None;
    }
    Some(
        heading_tops
            .iter()
            .rposition(|&top| top <= threshold)
            .unwrap_or(0),
    )
}

/// New panel scroll offset that brings a link into view, or `None` when the
/// link is already fully visible. The link is centred when moved.
pub fn reveal_link(panel: PanelViewport, link_top: f64, link_height: f64) -> Option<f64> {
    let visible_bottom = panel.scroll_top + panel.height;
    if link_top >= panel.scroll_top && link_top + link_height <= visible_bottom {
        return None;
    }
    Some((link_top - (panel.height - link_height) / 2.0).max(0.0))
}

#[derive(Debug, Default)]
pub struct TableOfContents {
    entries: Vec<TocEntry>,
    layout: TocLayout,
    header_height: f64,
    offset: f64,
    active: Option<usize>,
    pending_scroll: Option<f64>,
    frame_requested: bool,
}

impl TableOfContents {
    /// `header_height` and `offset` shift the scroll-spy threshold below the
    /// top of the viewport.
    pub fn new(header_height: f64, offset: f64) -> Self {
        Self {
            header_height,
            offset,
            ..Self::default()
        }
    }

    /// Build anchors for headings of levels 1–4, assigning ids in `document`.
    ///
    /// Existing ids are reused; otherwise the id is slugified from the
    /// heading text, falling back to `heading-<index>`.
    pub fn generate(&mut self, document: &mut ArticleDocument) -> &[TocEntry] {
        self.clear();

        let headings = document.headings();
        for (index, heading) in headings
            .into_iter()
            .filter(|h| h.level <= MAX_LEVEL)
            .enumerate()
        {
            let id = heading
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| {
                    let slug = slugify(&heading.text);
                    if slug.is_empty() {
                        format!("heading-{}", index)
                    } else {
                        slug
                    }
                });

            document.set_heading_id(heading.position, &id);
            self.entries.push(TocEntry {
                id,
                text: heading.text,
                level: heading.level,
            });
        }

        tracing::debug!(headings = self.entries.len(), "Generated table of contents");
        &self.entries
    }

    /// Drop all entries, layout and scroll-spy state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.layout = TocLayout::default();
        self.active = None;
        self.pending_scroll = None;
        self.frame_requested = false;
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_entry(&self) -> Option<&TocEntry> {
        self.active.and_then(|i| self.entries.get(i))
    }

    pub fn panel(&self) -> PanelViewport {
        self.layout.panel
    }

    pub fn set_layout(&mut self, layout: TocLayout) {
        self.layout = layout;
    }

    /// Record a scroll position.
    ///
    /// Returns true when the caller must schedule an animation frame; further
    /// scrolls before that frame only update the position to evaluate.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        self.pending_scroll = Some(scroll_y);
        if self.frame_requested {
            return false;
        }
        self.frame_requested = true;
        true
    }

    /// True between a scroll that requested a frame and that frame.
    pub fn frame_pending(&self) -> bool {
        self.frame_requested
    }

    /// Evaluate the latest scroll position. Runs at most once per request.
    pub fn on_frame(&mut self) -> Option<ActiveChange> {
        if !self.frame_requested {
            return None;
        }
        self.frame_requested = false;
        let scroll_y = self.pending_scroll.take()?;

        let threshold = scroll_y + self.header_height + self.offset;
        let current = active_heading(&self.layout.heading_tops, threshold)?;
        if self.active == Some(current) {
            return None;
        }

        let previous = self.active.replace(current);
        let panel_scroll = self.layout.links.get(current).and_then(|&(top, height)| {
            let scroll = reveal_link(self.layout.panel, top, height)?;
            self.layout.panel.scroll_top = scroll;
            Some(scroll)
        });

        let id = self.entries.get(current).map(|e| e.id.clone()).unwrap_or_default();
        tracing::trace!(current, id = %id, "Active heading changed");

        Some(ActiveChange {
            previous,
            current,
            id,
            panel_scroll,
        })
    }

    /// Render the anchor list, or the empty state when there are no headings.
    pub fn render_html(&self) -> String {
        if self.entries.is_empty() {
            return format!("<p class=\"toc-empty\">{}</p>\n", EMPTY_MESSAGE);
        }

        let mut out = String::from("<ul class=\"toc-list\">\n");
        for (i, entry) in self.entries.iter().enumerate() {
            let active = if self.active == Some(i) { " active" } else { "" };
            out.push_str(&format!(
                "<li class=\"toc-item toc-level-{}{}\"><a class=\"toc-link\" data-target=\"{}\">{}</a></li>\n",
                entry.level,
                active,
                escape_html(&entry.id),
                escape_html(&entry.text)
            ));
        }
        out.push_str("</ul>\n");
        out
    }
}
