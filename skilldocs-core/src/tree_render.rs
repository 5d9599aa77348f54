//! ASCII rendering of the navigation tree for terminal output.

use crate::navigation::{NavSkill, NavTopic};

const COLLAPSED: char = '▸';
const EXPANDED: char = '▾';
const ARTICLE: char = '·';
const ACTIVE: char = '●';

fn branch_symbol(expanded: bool) -> char {
    if expanded {
        EXPANDED
    } else {
        COLLAPSED
    }
}

/// Render the navigation tree as ASCII art.
///
/// Collapsed nodes hide their children, matching what a sidebar would show.
///
/// Example output:
/// ```text
/// ▾ Salesforce
/// ├── ▾ Admin
/// │   └── ● User Management
/// └── ▸ Development
/// ▸ Frontend
/// ```
pub fn render_tree(skills: &[NavSkill]) -> String {
    let mut output = String::new();
    for skill in skills {
        output.push(branch_symbol(skill.expanded));
        output.push(' ');
        output.push_str(&skill.name);
        output.push('\n');

        if skill.expanded {
            for (i, topic) in skill.topics.iter().enumerate() {
                let is_last = i == skill.topics.len() - 1;
                render_topic(&mut output, topic, is_last);
            }
        }
    }
    output
}

fn render_topic(output: &mut String, topic: &NavTopic, is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    output.push_str(branch);
    output.push(branch_symbol(topic.expanded));
    output.push(' ');
    output.push_str(&topic.name);
    output.push('\n');

    if !topic.expanded {
        return;
    }

    let prefix = if is_last { "    " } else { "│   " };
    for (i, article) in topic.articles.iter().enumerate() {
        let article_is_last = i == topic.articles.len() - 1;
        let branch = if article_is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push(if article.active { ACTIVE } else { ARTICLE });
        output.push(' ');
        output.push_str(&article.title);
        output.push('\n');
    }
}
