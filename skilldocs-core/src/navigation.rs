//! The navigation tree and flat article index built from a [`Manifest`].

use std::sync::Arc;

use serde::Serialize;

use crate::models::{FlatArticleRecord, Manifest, Route};

/// Root directory of article content, relative to the site root.
pub const CONTENT_DIR: &str = "content";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NavSkill {
    pub slug: String,
    pub name: String,
    pub folder: String,
    pub order: i64,
    pub topics: Vec<NavTopic>,
    pub active: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NavTopic {
    pub slug: String,
    pub name: String,
    pub folder: String,
    pub order: i64,
    pub articles: Vec<NavArticle>,
    pub active: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NavArticle {
    pub slug: String,
    pub title: String,
    pub file: String,
    pub active: bool,
}

/// Sorted skill/topic tree plus the flat index derived in the same pass.
#[derive(Debug, Clone)]
pub struct NavigationTree {
    skills: Vec<NavSkill>,
    articles: Arc<[FlatArticleRecord]>,
}

impl Default for NavigationTree {
    fn default() -> Self {
        Self {
            skills: Vec::new(),
            articles: Vec::new().into(),
        }
    }
}

impl NavigationTree {
    /// Build the tree, sorting skills and topics by `(order, name)`.
    ///
    /// Articles keep the order the manifest lists them in. The flat index is
    /// filled during the same traversal so its order matches the tree.
    pub fn build(manifest: &Manifest) -> Self {
        let mut skills: Vec<NavSkill> = manifest
            .skills
            .iter()
            .map(|skill| {
                let mut topics: Vec<NavTopic> = skill
                    .topics
                    .iter()
                    .map(|topic| NavTopic {
                        slug: topic.slug.clone(),
                        name: topic.display_name(),
                        folder: topic.folder.clone(),
                        order: topic.order,
                        articles: topic
                            .articles
                            .iter()
                            .map(|a| NavArticle {
                                slug: a.slug.clone(),
                                title: a.display_title(),
                                file: a.file.clone(),
                                active: false,
                            })
                            .collect(),
                        active: false,
                        expanded: false,
                    })
                    .collect();
                topics.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

                NavSkill {
                    slug: skill.slug.clone(),
                    name: skill.display_name(),
                    folder: skill.folder.clone(),
                    order: skill.order,
                    topics,
                    active: false,
                    expanded: false,
                }
            })
            .collect();
        skills.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

        let mut articles = Vec::with_capacity(manifest.article_count());
        for skill in &skills {
            for topic in &skill.topics {
                for article in &topic.articles {
                    articles.push(FlatArticleRecord {
                        title: article.title.clone(),
                        skill: skill.name.clone(),
                        skill_slug: skill.slug.clone(),
                        topic: topic.name.clone(),
                        topic_slug: topic.slug.clone(),
                        slug: article.slug.clone(),
                        file: article.file.clone(),
                    });
                }
            }
        }

        tracing::debug!(
            skills = skills.len(),
            articles = articles.len(),
            "Built navigation tree"
        );

        Self {
            skills,
            articles: articles.into(),
        }
    }

    pub fn skills(&self) -> &[NavSkill] {
        &self.skills
    }

    /// The flat index. Shared, never mutated after [`build`](Self::build).
    pub fn articles(&self) -> Arc<[FlatArticleRecord]> {
        Arc::clone(&self.articles)
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Resolve route slugs to `content/<skillFolder>/<topicFolder>/<file>.md`.
    ///
    /// Returns `None` when any level is unknown rather than guessing.
    pub fn get_article_path(&self, skill: &str, topic: &str, article: &str) -> Option<String> {
        let skill = self.skills.iter().find(|s| s.slug == skill)?;
        let topic = skill.topics.iter().find(|t| t.slug == topic)?;
        let article = topic.articles.iter().find(|a| a.slug == article)?;

        Some(format!(
            "{}/{}/{}/{}.md",
            CONTENT_DIR, skill.folder, topic.folder, article.file
        ))
    }

    /// Look up the article node a route points at.
    pub fn find_article(&self, route: &Route) -> Option<&NavArticle> {
        let (skill, topic, article) = route.article_slugs()?;
        self.skills
            .iter()
            .find(|s| s.slug == skill)?
            .topics
            .iter()
            .find(|t| t.slug == topic)?
            .articles
            .iter()
            .find(|a| a.slug == article)
    }

    /// Recompute every node's `active`/`expanded` flags from `route`.
    pub fn update_active_state(&mut self, route: &Route) {
        for skill in &mut self.skills {
            skill.expanded = route.should_expand_skill(&skill.slug);
            skill.active = route.is_active(&skill.slug, None, None);

            for topic in &mut skill.topics {
                topic.expanded = route.should_expand_topic(&skill.slug, &topic.slug);
                topic.active = route.is_active(&skill.slug, Some(&topic.slug), None);

                for article in &mut topic.articles {
                    article.active =
                        route.is_active(&skill.slug, Some(&topic.slug), Some(&article.slug));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::parse_hash;

    fn manifest() -> Manifest {
        Manifest::from_json(
            r#"{"skills":[
                {"slug":"fe","name":"Frontend","folder":"frontend","order":2,"topics":[
                    {"slug":"js","name":"JavaScript","folder":"javascript","order":1,"articles":[
                        {"slug":"async","title":"Async/Await in JavaScript","file":"async-await"}
                    ]}
                ]},
                {"slug":"sf","name":"Salesforce","folder":"Salesforce","order":1,"topics":[
                    {"slug":"dev","name":"Development","folder":"Dev","order":1,"articles":[]},
                    {"slug":"admin","name":"Admin","folder":"Admin","order":1,"articles":[
                        {"slug":"user-management","title":"User Management","file":"user-management"}
                    ]}
                ]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn sorts_by_order_then_name() {
        let tree = NavigationTree::build(&manifest());
        let skills: Vec<_> = tree.skills().iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(skills, ["sf", "fe"]);

        let topics: Vec<_> = tree.skills()[0].topics.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(topics, ["admin", "dev"]);
    }

    #[test]
    fn flat_index_follows_tree_order() {
        let tree = NavigationTree::build(&manifest());
        let slugs: Vec<_> = tree.articles().iter().map(|a| a.slug.clone()).collect();
        assert_eq!(slugs, ["user-management", "async"]);
        assert_eq!(tree.articles()[0].skill, "Salesforce");
    }

    #[test]
    fn active_state_follows_route() {
        let mut tree = NavigationTree::build(&manifest());
        tree.update_active_state(&parse_hash("#/sf/admin/user-management"));

        let sf = &tree.skills()[0];
        assert!(sf.expanded);
        assert!(!sf.active);
        assert!(sf.topics[0].expanded);
        assert!(!sf.topics[1].expanded);
        assert!(sf.topics[0].articles[0].active);
        assert!(!tree.skills()[1].expanded);

        tree.update_active_state(&parse_hash("#/"));
        assert!(!tree.skills()[0].expanded);
        assert!(!tree.skills()[0].topics[0].articles[0].active);
    }
}
