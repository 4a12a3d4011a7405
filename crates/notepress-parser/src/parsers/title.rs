//! Titles and slugs.

use notepress_core::title_case;
use std::path::Path;

/// Title used when neither the note nor its filename yields one.
pub const UNTITLED: &str = "Untitled Post";

/// Slug used when a title has no alphanumeric character at all.
pub const FALLBACK_SLUG: &str = "post";

/// Derive a human-readable title from a filename stem:
/// `python_basics-notes.md` becomes `Python Basics Notes`.
pub fn title_from_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let spaced: String = stem
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();

    let title = title_case(&spaced);
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// Generate a URL slug: lowercase, whitespace and hyphens become a single
/// hyphen, anything else that is not alphanumeric is dropped. Letters of any
/// script are kept.
pub fn slugify(text: &str) -> String {
    let slug = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
