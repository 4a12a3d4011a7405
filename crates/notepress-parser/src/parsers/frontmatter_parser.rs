//! Front matter: reading the block a note may already carry, and rendering
//! the block a generated post gets.

use notepress_core::PostFrontMatter;
use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;

/// Matches YAML front matter at the very start: `---` ... `---`
static FRONTMATTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---[ \t]*\r?\n(?:(?P<yaml>[\s\S]*?)\r?\n)?---[ \t]*(?:\r?\n|\z)").unwrap()
});

/// Fields honoured from a note's own front matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFrontMatter {
    pub title: Option<String>,
    /// `tags` followed by `categories`, each a string or a list
    pub tags: Vec<String>,
    /// Only meaningful for posts already in the posts directory
    pub permalink: Option<String>,
}

/// Split a note into its YAML front matter (if any) and body.
///
/// Only a block that parses as a YAML mapping counts as front matter; an
/// opening thematic break followed by prose is left in the body.
///
/// Returns `(front_matter, body_offset)`.
pub fn split_front_matter(content: &str) -> (Option<SourceFrontMatter>, usize) {
    let Some(caps) = FRONTMATTER_PATTERN.captures(content) else {
        return (None, 0);
    };
    let Some(whole) = caps.get(0) else {
        return (None, 0);
    };
    let yaml = caps.name("yaml").map(|m| m.as_str()).unwrap_or("");

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(map)) => (Some(from_mapping(&map)), whole.end()),
        Ok(Value::Null) => (Some(SourceFrontMatter::default()), whole.end()),
        Ok(_) | Err(_) => {
            log::debug!("Leading '---' block is not a YAML mapping, keeping it in the body");
            (None, 0)
        }
    }
}

fn from_mapping(map: &serde_yaml::Mapping) -> SourceFrontMatter {
    let title = map
        .get("title")
        .and_then(scalar_to_string)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let mut tags = Vec::new();
    for key in ["tags", "categories"] {
        match map.get(key) {
            Some(Value::Sequence(items)) => {
                tags.extend(items.iter().filter_map(scalar_to_string));
            }
            Some(Value::String(s)) => {
                tags.extend(s.split([',', ' ']).map(str::to_string));
            }
            _ => {}
        }
    }
    let tags = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let permalink = map
        .get("permalink")
        .and_then(scalar_to_string)
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    SourceFrontMatter {
        title,
        tags,
        permalink,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render the front matter block of a generated post, trailing blank line included.
///
/// ```
/// use notepress_parser::render_front_matter;
/// use notepress_core::PostFrontMatter;
/// # let date = "2025-08-03".parse().unwrap();
///
/// let fm = PostFrontMatter {
///     title: "Python Basics".to_string(),
///     date,
///     permalink: "/posts/2025/08/python-basics/".to_string(),
///     tags: vec!["python".to_string()],
/// };
/// let block = render_front_matter(&fm);
/// assert!(block.starts_with("---\ntitle: 'Python Basics'\ndate: 2025-08-03\n"));
/// ```
pub fn render_front_matter(front_matter: &PostFrontMatter) -> String {
    let mut out = String::from("---\n");
    out.push_str(&format!("title: {}\n", single_quoted(&front_matter.title)));
    out.push_str(&format!("date: {}\n", front_matter.date.format("%Y-%m-%d")));
    out.push_str(&format!("permalink: {}\n", front_matter.permalink));

    if front_matter.tags.is_empty() {
        out.push_str("tags: []\n");
    } else {
        out.push_str("tags:\n");
        for tag in &front_matter.tags {
            out.push_str(&format!("  - {}\n", yaml_scalar(tag)));
        }
    }

    out.push_str("---\n\n");
    out
}

/// YAML single-quoted scalar: quotes are escaped by doubling.
fn single_quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Plain scalar when safe, single-quoted otherwise.
fn yaml_scalar(text: &str) -> String {
    let plain_safe = text
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ' '))
        && text.chars().next().is_some_and(char::is_alphabetic)
        && !text.ends_with(' ');
    let reserved = matches!(
        text.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "null" | "y" | "n"
    );

    if plain_safe && !reserved {
        text.to_string()
    } else {
        single_quoted(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn front_matter(title: &str, tags: &[&str]) -> PostFrontMatter {
        PostFrontMatter {
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 8, 3).unwrap(),
            permalink: "/posts/2025/08/python-basics/".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_split_simple_front_matter() {
        let content = "---\ntitle: Existing\ntags: [rust, cli]\n---\n# Heading\n";
        let (fm, offset) = split_front_matter(content);
        let fm = fm.unwrap();
        assert_eq!(fm.title.as_deref(), Some("Existing"));
        assert_eq!(fm.tags, vec!["rust", "cli"]);
        assert_eq!(&content[offset..], "# Heading\n");
    }

    #[test]
    fn test_split_string_tags_and_categories() {
        let content = "---\ntags: a, b\ncategories:\n  - notes\n---\nbody";
        let (fm, _) = split_front_matter(content);
        assert_eq!(fm.unwrap().tags, vec!["a", "b", "notes"]);
    }

    #[test]
    fn test_split_reads_existing_permalink() {
        let content = "---\ntitle: Old\npermalink: /posts/2025/08/old/\n---\n";
        let (fm, _) = split_front_matter(content);
        assert_eq!(fm.unwrap().permalink.as_deref(), Some("/posts/2025/08/old/"));
    }

    #[test]
    fn test_no_front_matter() {
        let content = "# Just a note\n---\nnot: front matter\n---\n";
        let (fm, offset) = split_front_matter(content);
        assert!(fm.is_none());
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_thematic_break_is_not_front_matter() {
        let content = "---\nJust a sentence, not YAML: really - no\n- list item\n---\nbody";
        let (fm, offset) = split_front_matter(content);
        assert!(fm.is_none());
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_empty_front_matter() {
        let content = "---\n---\nbody";
        let (fm, offset) = split_front_matter(content);
        assert_eq!(fm, Some(SourceFrontMatter::default()));
        assert_eq!(&content[offset..], "body");
    }

    #[test]
    fn test_render_front_matter() {
        let block =
            render_front_matter(&front_matter("Python Basics", &["python", "basics", "variables"]));
        insta::assert_snapshot!(block, @r"
        ---
        title: 'Python Basics'
        date: 2025-08-03
        permalink: /posts/2025/08/python-basics/
        tags:
          - python
          - basics
          - variables
        ---
        ");
        assert!(block.ends_with("---\n\n"));
    }

    #[test]
    fn test_render_escapes_quotes() {
        let block = render_front_matter(&front_matter("Don't Panic", &[]));
        assert!(block.contains("title: 'Don''t Panic'\n"));
        assert!(block.contains("tags: []\n"));
    }

    #[test]
    fn test_rendered_block_is_valid_yaml() {
        let tags = ["c++", "yes", "数据库", "2024"];
        let block = render_front_matter(&front_matter("It's: #1", &tags));
        let yaml = block.trim_start_matches("---\n").trim_end().trim_end_matches("---");
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(value["title"].as_str(), Some("It's: #1"));
        let tags: Vec<&str> = value["tags"]
            .as_sequence()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(tags, vec!["c++", "yes", "数据库", "2024"]);
    }
}
