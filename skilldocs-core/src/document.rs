//! Markdown article documents: front-matter, sanitised events, headings.
//!
//! An [`ArticleDocument`] plays the role of the rendered content node. It
//! keeps the parsed markdown as an owned event stream so the table of
//! contents can assign heading anchors before the HTML is produced.

use std::collections::BTreeMap;

use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;

/// Flat `key: value` metadata from the top of an article.
pub type FrontMatter = BTreeMap<String, String>;

const FENCE: &str = "---";

/// Link schemes that never survive sanitisation.
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Front-matter keys shown in the metadata block, with their labels.
const META_LABELS: &[(&str, &str)] = &[
    ("author", "Author"),
    ("date", "Date"),
    ("difficulty", "Difficulty"),
    ("readingTime", "Reading time"),
    ("tags", "Tags"),
];

/// Split a document into front-matter and body.
///
/// Front-matter is a block at the very top delimited by `---` lines. Each
/// line is split at its first `:`; keys and values are trimmed and a single
/// pair of matching quotes is stripped from values. Lines without a colon
/// are skipped. Without a closing fence the whole input is body.
pub fn parse_front_matter(input: &str) -> (FrontMatter, &str) {
    let text = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut lines = text.split_inclusive('\n');

    let mut offset = match lines.next() {
        Some(first) if first.trim_end() == FENCE => first.len(),
        _ => return (FrontMatter::new(), text),
    };

    let mut meta = FrontMatter::new();

    for line in lines {
        offset += line.len();
        let trimmed = line.trim();
        if trimmed == FENCE {
            return (meta, &text[offset..]);
        }

        if let Some((key, value)) = trimmed.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                meta.insert(key.to_string(), strip_quotes(value.trim()).to_string());
            }
        }
    }

    (FrontMatter::new(), text)
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// A heading found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingRef {
    /// Position of the heading's start event, used to assign its id.
    #[serde(skip)]
    pub position: usize,
    pub level: u8,
    pub text: String,
    pub id: Option<String>,
}

/// A parsed, sanitised markdown article.
#[derive(Debug, Clone)]
pub struct ArticleDocument {
    pub meta: FrontMatter,
    events: Vec<Event<'static>>,
}

impl ArticleDocument {
    /// Parse a markdown file including its front-matter.
    pub fn parse(markdown: &str) -> Self {
        let (meta, body) = parse_front_matter(markdown);

        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        let events = Parser::new_ext(body, options)
            .map(sanitize)
            .map(Event::into_static)
            .collect();

        Self { meta, events }
    }

    /// The `title` front-matter value, if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        self.meta
            .get("title")
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    /// Every heading in document order, with its plain text.
    pub fn headings(&self) -> Vec<HeadingRef> {
        let mut headings = Vec::new();
        let mut current: Option<HeadingRef> = None;

        for (position, event) in self.events.iter().enumerate() {
            match event {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    current = Some(HeadingRef {
                        position,
                        level: heading_rank(*level),
                        text: String::new(),
                        id: id.as_ref().map(|s| s.to_string()),
                    });
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some(heading) = current.as_mut() {
                        heading.text.push_str(text);
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(mut heading) = current.take() {
                        heading.text = heading.text.trim().to_string();
                        headings.push(heading);
                    }
                }
                _ => {}
            }
        }

        headings
    }

    /// Set the anchor id of the heading starting at `position`.
    ///
    /// Returns false when `position` is not a heading start.
    pub fn set_heading_id(&mut self, position: usize, new_id: &str) -> bool {
        match self.events.get_mut(position) {
            Some(Event::Start(Tag::Heading { id, .. })) => {
                *id = Some(CowStr::from(new_id.to_string()));
                true
            }
            _ => false,
        }
    }

    /// Render the body to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        html::push_html(&mut out, self.events.iter().cloned());
        out
    }

    /// Render the metadata block shown above the article body.
    ///
    /// Empty when none of the known keys are present.
    pub fn meta_html(&self) -> String {
        let items: Vec<String> = META_LABELS
            .iter()
            .filter_map(|(key, label)| {
                let value = self.meta.get(*key).filter(|v| !v.is_empty())?;
                Some(format!(
                    "<span class=\"meta-item meta-{}\"><span class=\"meta-label\">{}</span> {}</span>",
                    key,
                    label,
                    escape_html(value)
                ))
            })
            .collect();

        if items.is_empty() {
            String::new()
        } else {
            format!("<div class=\"article-meta\">{}</div>\n", items.join(""))
        }
    }
}

fn heading_rank(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Raw HTML becomes escaped text and script-capable link targets are blanked.
fn sanitize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        // Custom `{key=value}` attributes would land verbatim in the tag.
        Event::Start(Tag::Heading {
            level, id, classes, ..
        }) => Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs: Vec::new(),
        }),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();

    if BLOCKED_SCHEMES.iter().any(|s| normalized.starts_with(s)) {
        tracing::warn!(url = %url, "Dropped unsafe link target");
        CowStr::Borrowed("")
    } else {
        url
    }
}

/// Minimal escaping for text placed into generated markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
