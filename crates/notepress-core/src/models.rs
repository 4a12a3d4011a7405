//! Core data models for note migration.
//!
//! These types are designed to be:
//! - **Serializable**: All types derive Serialize/Deserialize
//! - **Debuggable**: Derive Debug for easy inspection
//! - **Type-Safe**: Enums replace magic strings

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Position in source text (line, column, byte offset)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub length: usize,
}

impl SourcePosition {
    /// Create a new source position
    pub fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }

    /// Create position from byte offset using a pre-computed line index.
    pub fn from_offset_indexed(index: &LineIndex, offset: usize, length: usize) -> Self {
        let (line, column) = index.line_col(offset);
        Self {
            line,
            column,
            offset,
            length,
        }
    }

    /// Byte offset one past the end of the span
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Pre-computed line starts for O(log n) line/column lookup.
///
/// # Example
/// ```
/// use notepress_core::{LineIndex, SourcePosition};
///
/// let content = "Line 1\nLine 2\nLine 3";
/// let index = LineIndex::new(content);
///
/// let pos = SourcePosition::from_offset_indexed(&index, 7, 6);
/// assert_eq!(pos.line, 2);
/// assert_eq!(pos.column, 1);
/// ```
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets where each line starts (line 1 = index 0)
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build line index in O(n).
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in content.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Get (line, column) for a byte offset via binary search.
    ///
    /// Line numbers start at 1, column numbers start at 1.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line_idx = self.line_starts.partition_point(|&start| start <= offset);
        let line = line_idx.max(1);
        let line_start = self
            .line_starts
            .get(line_idx.saturating_sub(1))
            .copied()
            .unwrap_or(0);
        (line, offset - line_start + 1)
    }

    /// Get total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Syntax an image reference was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSyntax {
    /// `![alt](path)`
    Markdown,
    /// `<img src="path">`
    Html,
}

/// An image path found in a note body.
///
/// `position` covers exactly the path text (without angle brackets or
/// quotes), so a rewrite only has to splice that span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    /// Path as written in the note
    pub original: String,
    /// Percent-decoded path used for resolution
    pub decoded: String,
    pub syntax: ImageSyntax,
    /// Span of `original` within the body
    pub position: SourcePosition,
}

impl ImageReference {
    /// Whether the target lives outside the filesystem (http, data URI, ...)
    pub fn is_remote(&self) -> bool {
        let target = self.decoded.trim();
        let lower = target.to_ascii_lowercase();
        lower.starts_with("http://")
            || lower.starts_with("https://")
            || lower.starts_with("data:")
            || target.starts_with("//")
    }
}

/// A source note as read from disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub path: PathBuf,
    pub content: String,
    /// Last-modified date in local time
    pub modified: NaiveDate,
}

/// Front-matter fields of a generated post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFrontMatter {
    pub title: String,
    pub date: NaiveDate,
    pub permalink: String,
    pub tags: Vec<String>,
}

/// One image copied (or reused) for a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRelocation {
    /// Reference text as written in the note
    pub original: String,
    /// File the reference resolved to
    pub source: PathBuf,
    /// Destination file in the images directory
    pub destination: PathBuf,
    /// Path written into the post body
    pub url: String,
    /// Destination already held identical bytes, nothing was copied
    pub reused: bool,
}

/// The output artefact of migrating one note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub front_matter: PostFrontMatter,
    /// Rewritten body, without front matter
    pub body: String,
    /// Destination file in the posts directory
    pub path: PathBuf,
    pub images: Vec<ImageRelocation>,
    /// References left untouched because they did not resolve
    pub unresolved: Vec<ImageReference>,
}

/// Result of migrating one note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationOutcome {
    pub source: PathBuf,
    pub post_path: PathBuf,
    pub title: String,
    pub date: NaiveDate,
    pub permalink: String,
    pub tags: Vec<String>,
    pub images_copied: usize,
    pub images_reused: usize,
    /// Unresolved image references, as written
    pub warnings: Vec<String>,
    /// Nothing was written to disk
    pub dry_run: bool,
}
