use serde::{Deserialize, Serialize};

/// One entry of the flat article index derived from the manifest.
///
/// Built once per manifest load in tree traversal order and read-only
/// thereafter. Search scores against these records; it never sees the tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlatArticleRecord {
    pub title: String,
    /// Display name of the owning skill.
    pub skill: String,
    pub skill_slug: String,
    /// Display name of the owning topic.
    pub topic: String,
    pub topic_slug: String,
    pub slug: String,
    pub file: String,
}

impl FlatArticleRecord {
    /// Fragment path (`skill/topic/article`) that routes to this article.
    pub fn route_path(&self) -> String {
        format!("{}/{}/{}", self.skill_slug, self.topic_slug, self.slug)
    }
}
