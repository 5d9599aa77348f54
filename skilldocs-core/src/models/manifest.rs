use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordering value used when a skill or topic does not declare one.
pub const DEFAULT_ORDER: i64 = 999;

fn default_order() -> i64 {
    DEFAULT_ORDER
}

/// The site manifest: a static tree of skills, topics and articles.
///
/// Produced offline by scanning the content directory and consumed read-only
/// for the lifetime of a load. Nothing in this crate ever mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// When the manifest was generated. Older manifests omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub skills: Vec<ManifestSkill>,
}

impl Manifest {
    /// Parse a manifest from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Total number of articles across all skills and topics.
    pub fn article_count(&self) -> usize {
        self.skills
            .iter()
            .flat_map(|s| &s.topics)
            .map(|t| t.articles.len())
            .sum()
    }
}

/// Top level of the content hierarchy (e.g. "Salesforce", "Frontend").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestSkill {
    /// URL-facing identifier, unique across skills.
    pub slug: String,
    #[serde(default)]
    pub name: String,
    /// Directory name on disk, distinct from the slug.
    pub folder: String,
    #[serde(default = "default_order")]
    pub order: i64,
    #[serde(default)]
    pub topics: Vec<ManifestTopic>,
}

impl ManifestSkill {
    /// The name to show, falling back to one derived from the folder.
    pub fn display_name(&self) -> String {
        non_empty_or_derived(&self.name, &self.folder)
    }
}

/// Second level of the hierarchy, grouping articles within a skill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestTopic {
    /// Unique within the parent skill.
    pub slug: String,
    #[serde(default)]
    pub name: String,
    pub folder: String,
    #[serde(default = "default_order")]
    pub order: i64,
    #[serde(default)]
    pub articles: Vec<ManifestArticle>,
}

impl ManifestTopic {
    pub fn display_name(&self) -> String {
        non_empty_or_derived(&self.name, &self.folder)
    }
}

/// A single markdown article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestArticle {
    /// Unique within the parent topic. Need not equal `file`.
    pub slug: String,
    #[serde(default)]
    pub title: String,
    /// On-disk filename stem (no `.md`), used to build the fetch path.
    pub file: String,
}

impl ManifestArticle {
    pub fn display_title(&self) -> String {
        non_empty_or_derived(&self.title, &self.file)
    }
}

fn non_empty_or_derived(value: &str, folder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        display_name_from_folder(folder)
    } else {
        trimmed.to_string()
    }
}

/// Derive a human readable name from a folder or file name.
///
/// A leading ordering prefix (`01-`, `2_`) is dropped, separators become
/// spaces and each word is capitalised: `01-data-modeling` → `Data Modeling`.
pub fn display_name_from_folder(folder: &str) -> String {
    let without_prefix = match folder.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) if idx > 0 => {
            let rest = &folder[idx..];
            rest.strip_prefix(['-', '_', '.', ' ']).unwrap_or(folder)
        }
        _ => folder,
    };

    without_prefix
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
