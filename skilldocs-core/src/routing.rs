//! Fragment parsing and path building.
//!
//! Fragments look like `#/<skill>/<topic>/<article>`. Parsing is lenient:
//! empty segments are dropped and anything past the third segment is kept in
//! [`Route::parts`] but otherwise ignored.

use crate::models::Route;

/// Parse a URL fragment into a [`Route`].
///
/// Accepts the fragment with or without the leading `#`.
pub fn parse_hash(hash: &str) -> Route {
    let trimmed = hash.strip_prefix('#').unwrap_or(hash);

    let parts: Vec<String> = trimmed
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Route {
        skill: parts.first().cloned(),
        topic: parts.get(1).cloned(),
        article: parts.get(2).cloned(),
        path: parts.join("/"),
        parts,
    }
}

/// Join the present parts with `/`, stopping at the first absent one.
///
/// `build_path(Some("sf"), None, Some("x"))` yields `"sf"`: a level can only
/// be selected when its parent is.
pub fn build_path(skill: Option<&str>, topic: Option<&str>, article: Option<&str>) -> String {
    [skill, topic, article]
        .into_iter()
        .map_while(|p| p)
        .collect::<Vec<_>>()
        .join("/")
}

/// The fragment (`#/...`) for a path produced by [`build_path`].
pub fn to_hash(path: &str) -> String {
    format!("#/{}", path.trim_start_matches('/'))
}

impl Route {
    /// Whether the route selects exactly this node.
    ///
    /// Pass `None` for the levels below the node being checked, e.g.
    /// `is_active("sf", None, None)` is true only on `#/sf`.
    pub fn is_active(&self, skill: &str, topic: Option<&str>, article: Option<&str>) -> bool {
        self.skill.as_deref() == Some(skill)
            && self.topic.as_deref() == topic
            && self.article.as_deref() == article
    }

    /// A skill is expanded whenever the route is inside it.
    pub fn should_expand_skill(&self, skill: &str) -> bool {
        self.skill.as_deref() == Some(skill)
    }

    /// A topic is expanded whenever the route is inside it.
    pub fn should_expand_topic(&self, skill: &str, topic: &str) -> bool {
        self.should_expand_skill(skill) && self.topic.as_deref() == Some(topic)
    }
}
