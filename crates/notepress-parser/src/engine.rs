//! Unified analysis engine - single pass over a note body.
//!
//! This module:
//! - Uses pulldown-cmark for the block structure (leading heading, code blocks, plain text)
//! - Tracks code block/inline code ranges to exclude from the image regex pass
//! - Uses regex only for image syntax, where exact byte spans of the path are needed
//! - Builds LineIndex once and reuses it for all position calculations

use notepress_core::{ImageReference, ImageSyntax, LineIndex, SourcePosition};
use pulldown_cmark::{Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

/// Markdown image: `![alt](path)`, `![alt](path "title")`, `![alt](<path with spaces>)`
static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        !\[[^\]\n]*\]
        \(\s*
            (?:<(?P<angle>[^>\n]+)>|(?P<url>[^()\s]+))
            (?:\s+(?:"[^"\n]*"|'[^'\n]*'))?
        \s*\)"#,
    )
    .unwrap()
});

/// HTML image: `<img ... src="path" ...>` (single or double quotes). The attribute
/// must start after whitespace so `data-src` and friends don't match.
static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\ssrc\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')[^>]*>"#).unwrap()
});

/// Bare URLs left in prose: `scheme://...` and `www....`
static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[a-z][a-z0-9+.-]*://\S+|\bwww\.\S+").unwrap());

#[inline]
fn has_markdown_image(content: &str) -> bool {
    content.contains("![")
}

#[inline]
fn has_html_image(content: &str) -> bool {
    content.contains('<')
}

#[inline]
fn has_bare_url(content: &str) -> bool {
    content.contains("://") || content.contains("www.")
}

/// Byte ranges to exclude from the image regex pass (code blocks, inline code).
#[derive(Debug, Default, Clone)]
struct ExcludedRanges {
    ranges: Vec<Range<usize>>,
}

impl ExcludedRanges {
    /// Check if a byte offset falls within any excluded range.
    #[inline]
    fn contains(&self, offset: usize) -> bool {
        if self.ranges.is_empty() {
            return false;
        }

        // ranges[idx - 1] is the last range starting at or before offset
        let idx = self.ranges.partition_point(|r| r.start <= offset);
        if idx == 0 {
            return false;
        }
        offset < self.ranges[idx - 1].end
    }

    fn add(&mut self, range: Range<usize>) {
        self.ranges.push(range);
    }

    /// Sort and merge overlapping ranges for efficient lookup.
    fn optimize(&mut self) {
        if self.ranges.is_empty() {
            return;
        }
        self.ranges.sort_by_key(|r| r.start);

        let mut merged = Vec::with_capacity(self.ranges.len());
        let mut current = self.ranges[0].clone();

        for range in self.ranges.iter().skip(1) {
            if range.start <= current.end {
                current.end = current.end.max(range.end);
            } else {
                merged.push(current);
                current = range.clone();
            }
        }
        merged.push(current);
        self.ranges = merged;
    }
}

/// What the engine extracts from a body.
#[derive(Debug, Clone, Default)]
pub struct BodyScan {
    /// Text of the heading, when the body opens with a level-1 heading
    pub leading_title: Option<String>,
    /// Readable prose: no code, no image alt text, no HTML, no URLs
    pub plain_text: String,
    /// Image references in order of appearance
    pub images: Vec<ImageReference>,
}

/// Analysis engine over a note body (front matter already stripped).
///
/// Two phases:
/// 1. pulldown-cmark pass: leading heading, plain text, code ranges
/// 2. Regex pass: image references, skipping code ranges
pub struct ParseEngine<'a> {
    body: &'a str,
    index: LineIndex,
}

impl<'a> ParseEngine<'a> {
    pub fn new(body: &'a str) -> Self {
        Self {
            body,
            index: LineIndex::new(body),
        }
    }

    pub fn scan(&self) -> BodyScan {
        let mut scan = BodyScan::default();
        let excluded = self.pulldown_pass(&mut scan);
        self.image_pass(&excluded, &mut scan);
        scan
    }

    /// Phase 1: block structure, prose and excluded ranges.
    fn pulldown_pass(&self, scan: &mut BodyScan) -> ExcludedRanges {
        let mut excluded = ExcludedRanges::default();

        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_TABLES);
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(self.body, opts);

        let mut seen_block = false;
        let mut in_leading_heading = false;
        let mut heading_text = String::new();
        let mut code_block_start: Option<usize> = None;
        let mut image_depth = 0usize;
        // links don't nest, so a flag is enough
        let mut in_autolink = false;

        for (event, range) in parser.into_offset_iter() {
            match event {
                Event::Start(Tag::CodeBlock(_)) => {
                    seen_block = true;
                    code_block_start = Some(range.start);
                }
                Event::End(TagEnd::CodeBlock) => {
                    let start = code_block_start.take().unwrap_or(range.start);
                    excluded.add(start..range.end);
                }
                Event::Code(code) => {
                    excluded.add(range.clone());
                    if in_leading_heading {
                        heading_text.push_str(&code);
                    }
                }

                Event::Start(Tag::Heading { level, .. }) => {
                    if !seen_block && level == HeadingLevel::H1 {
                        in_leading_heading = true;
                        heading_text.clear();
                    }
                    seen_block = true;
                }
                Event::End(TagEnd::Heading(_)) => {
                    if in_leading_heading {
                        in_leading_heading = false;
                        let title = heading_text.trim();
                        if !title.is_empty() {
                            scan.leading_title = Some(title.to_string());
                        }
                    }
                    scan.plain_text.push('\n');
                }

                Event::Start(Tag::Image { .. }) => {
                    image_depth += 1;
                }
                Event::End(TagEnd::Image) => {
                    image_depth = image_depth.saturating_sub(1);
                }

                Event::Start(Tag::Link { link_type, .. }) => {
                    seen_block = true;
                    in_autolink = matches!(link_type, LinkType::Autolink | LinkType::Email);
                }
                Event::End(TagEnd::Link) => {
                    in_autolink = false;
                }

                Event::Text(text) => {
                    if in_leading_heading {
                        heading_text.push_str(&text);
                    }
                    if code_block_start.is_none() && image_depth == 0 && !in_autolink {
                        scan.plain_text.push_str(&text);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if in_leading_heading {
                        heading_text.push(' ');
                    }
                    scan.plain_text.push(' ');
                }

                Event::Start(_) => {
                    seen_block = true;
                }
                Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough) => {}
                Event::End(_) => {
                    scan.plain_text.push('\n');
                }

                Event::Html(_) | Event::InlineHtml(_) | Event::Rule => {
                    seen_block = true;
                }
                _ => {}
            }
        }

        if has_bare_url(&scan.plain_text) {
            scan.plain_text = BARE_URL.replace_all(&scan.plain_text, " ").into_owned();
        }

        excluded.optimize();
        excluded
    }

    /// Phase 2: image references with exact path spans.
    fn image_pass(&self, excluded: &ExcludedRanges, scan: &mut BodyScan) {
        if has_markdown_image(self.body) {
            for caps in MARKDOWN_IMAGE.captures_iter(self.body) {
                if let Some(reference) = self.capture_reference(
                    &caps,
                    &["angle", "url"],
                    ImageSyntax::Markdown,
                    excluded,
                ) {
                    scan.images.push(reference);
                }
            }
        }

        if has_html_image(self.body) {
            for caps in HTML_IMAGE.captures_iter(self.body) {
                if let Some(reference) =
                    self.capture_reference(&caps, &["dq", "sq"], ImageSyntax::Html, excluded)
                {
                    scan.images.push(reference);
                }
            }
        }

        scan.images.sort_by_key(|r| r.position.offset);
    }

    fn capture_reference(
        &self,
        caps: &Captures<'_>,
        groups: &[&str],
        syntax: ImageSyntax,
        excluded: &ExcludedRanges,
    ) -> Option<ImageReference> {
        let whole = caps.get(0)?;
        if excluded.contains(whole.start()) {
            return None;
        }

        let path = groups.iter().find_map(|g| caps.name(g))?;
        let original = path.as_str();
        if original.trim().is_empty() {
            return None;
        }

        let decoded = urlencoding::decode(original)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| original.to_string());

        Some(ImageReference {
            original: original.to_string(),
            decoded,
            syntax,
            position: SourcePosition::from_offset_indexed(&self.index, path.start(), path.len()),
        })
    }
}
