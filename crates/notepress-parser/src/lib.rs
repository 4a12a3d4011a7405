//! # notepress parser
//!
//! Markdown note analysis built on `pulldown-cmark`.
//!
//! This crate provides:
//! - Front matter splitting (a note may already carry YAML front matter)
//! - Title extraction: front matter `title`, then a leading `# Heading`, then the filename
//! - Image reference discovery (`![alt](path)` and `<img src>`) with exact byte spans
//! - **Code block awareness**: references inside code blocks/inline code are ignored
//! - Keyword extraction for tags, with jieba word segmentation for CJK text
//! - Front matter rendering and body rewriting for the generated post
//!
//! ## Quick Start
//!
//! ```
//! use notepress_parser::{KeywordExtractor, analyze};
//! use std::path::Path;
//!
//! let content = "# Python Basics\n\n\
//!                Python variables and Python functions.\n\n\
//!                ![diagram](./img/diagram.png)\n";
//! let analysis = analyze(content);
//!
//! assert_eq!(analysis.title(Path::new("notes/python_basics.md")), "Python Basics");
//! assert_eq!(analysis.images.len(), 1);
//! assert_eq!(analysis.images[0].original, "./img/diagram.png");
//!
//! let extractor = KeywordExtractor::new();
//! let tags = analysis.tags(&extractor, 3);
//! assert_eq!(tags[0], "python");
//! ```

mod engine;
pub mod parsers;
mod rewrite;

use notepress_core::ImageReference;
use std::collections::HashSet;
use std::path::Path;

pub use parsers::{
    KeywordExtractor, SourceFrontMatter, render_front_matter, slugify, split_front_matter,
    title_from_filename,
};
pub use rewrite::{Replacement, rewrite_body};

/// Everything the migrator needs to know about one note.
#[derive(Debug, Clone)]
pub struct NoteAnalysis<'a> {
    /// The note's own front matter, if it had one
    pub front_matter: Option<SourceFrontMatter>,
    /// Body text, front matter removed; image spans are relative to this
    pub body: &'a str,
    /// Text of the level-1 heading the body opens with
    pub leading_title: Option<String>,
    /// Prose used for keyword extraction
    pub plain_text: String,
    /// Image references in order of appearance
    pub images: Vec<ImageReference>,
}

impl NoteAnalysis<'_> {
    /// Title: front matter `title`, else leading heading, else derived from `path`.
    pub fn title(&self, path: &Path) -> String {
        self.front_matter
            .as_ref()
            .and_then(|fm| fm.title.clone())
            .or_else(|| self.leading_title.clone())
            .unwrap_or_else(|| title_from_filename(path))
    }

    /// Tags: the note's own front matter tags first, then inferred keywords,
    /// de-duplicated case-insensitively and bounded by `max`. Declared tags go
    /// through the same filters as inferred ones.
    pub fn tags(&self, extractor: &KeywordExtractor, max: usize) -> Vec<String> {
        let declared = self
            .front_matter
            .as_ref()
            .map(|fm| fm.tags.clone())
            .unwrap_or_default();
        let inferred = extractor.extract(&self.plain_text, max);

        let mut seen = HashSet::new();
        declared
            .into_iter()
            .filter(|tag| extractor.accepts(tag))
            .chain(inferred)
            .filter(|tag| seen.insert(tag.to_lowercase()))
            .take(max)
            .collect()
    }
}

/// Analyze a note's full text.
pub fn analyze(content: &str) -> NoteAnalysis<'_> {
    let (front_matter, body_offset) = split_front_matter(content);
    let body = &content[body_offset..];
    let scan = engine::ParseEngine::new(body).scan();

    NoteAnalysis {
        front_matter,
        body,
        leading_title: scan.leading_title,
        plain_text: scan.plain_text,
        images: scan.images,
    }
}

/// Convenient prelude for common imports.
pub mod prelude {
    pub use notepress_core::{ImageReference, ImageSyntax, LineIndex, SourcePosition};

    pub use crate::{
        KeywordExtractor, NoteAnalysis, Replacement, SourceFrontMatter, analyze,
        render_front_matter, rewrite_body, slugify, split_front_matter, title_from_filename,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    static EXTRACTOR: LazyLock<KeywordExtractor> = LazyLock::new(KeywordExtractor::new);

    #[test]
    fn test_title_precedence() {
        let path = Path::new("notes/file_name.md");

        let with_fm = analyze("---\ntitle: From Front Matter\n---\n# From Heading\n");
        assert_eq!(with_fm.title(path), "From Front Matter");

        let with_heading = analyze("# From Heading\n\ntext");
        assert_eq!(with_heading.title(path), "From Heading");

        let plain = analyze("Just text, no heading.");
        assert_eq!(plain.title(path), "File Name");
    }

    #[test]
    fn test_body_excludes_source_front_matter() {
        let content = "---\ntitle: T\n---\n![a](a.png)\n";
        let analysis = analyze(content);
        assert_eq!(analysis.body, "![a](a.png)\n");
        let img = &analysis.images[0];
        assert_eq!(&analysis.body[img.position.offset..img.position.end()], "a.png");
    }

    #[test]
    fn test_declared_tags_come_first() {
        let analysis = analyze("---\ntags: [Rust, notes]\n---\nrust rust cargo cargo cargo build");
        let tags = analysis.tags(&EXTRACTOR, 3);
        assert_eq!(tags, vec!["Rust", "notes", "cargo"]);
    }

    #[test]
    fn test_declared_stopwords_dropped() {
        let analysis = analyze("---\ntags: [the, and, 的, x, Rust]\n---\n# A\n\ndatabase index");
        let tags = analysis.tags(&EXTRACTOR, 5);
        assert_eq!(tags, vec!["Rust", "database", "index"]);
    }

    #[test]
    fn test_urls_do_not_become_tags() {
        let analysis = analyze(
            "See <https://docs.example.org/guide> and https://docs.example.org/guide \
             for notes details",
        );
        assert_eq!(analysis.tags(&EXTRACTOR, 5), vec!["notes", "details"]);
    }

    #[test]
    fn test_tags_bounded() {
        let analysis =
            analyze("one1 two2 three3 four4 five5 six6 seven7 alpha beta gamma delta epsilon");
        assert!(analysis.tags(&EXTRACTOR, 5).len() <= 5);
        assert_eq!(analysis.tags(&EXTRACTOR, 2).len(), 2);
    }
}
