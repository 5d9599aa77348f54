use serde::{Deserialize, Serialize};

/// A parsed URL fragment.
///
/// Derived fresh on every navigation event; there is no identity carried
/// across navigations. `None` at a level means "not yet selected".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Route {
    pub skill: Option<String>,
    pub topic: Option<String>,
    pub article: Option<String>,
    /// Normalised path, segments joined by `/` (no leading `#/`).
    pub path: String,
    /// Every non-empty segment, including any beyond the third.
    pub parts: Vec<String>,
}

impl Route {
    /// True when no segment is present (the home/welcome state).
    pub fn is_home(&self) -> bool {
        self.skill.is_none() && self.topic.is_none() && self.article.is_none()
    }

    /// The three slugs when the route points at an article.
    pub fn article_slugs(&self) -> Option<(&str, &str, &str)> {
        match (&self.skill, &self.topic, &self.article) {
            (Some(s), Some(t), Some(a)) => Some((s, t, a)),
            _ => None,
        }
    }
}
