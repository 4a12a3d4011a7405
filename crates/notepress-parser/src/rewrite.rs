//! Body rewriting: splice new paths into the spans of resolved image references.

use notepress_core::SourcePosition;

/// One span to replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub position: SourcePosition,
    pub text: String,
}

impl Replacement {
    pub fn new(position: SourcePosition, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

/// Produce a copy of `body` with every replacement span swapped for its text.
///
/// Spans that overlap an earlier one, run past the end of the body or do not
/// fall on character boundaries are skipped; everything outside the spans is
/// copied through byte for byte.
///
/// ```
/// use notepress_core::SourcePosition;
/// use notepress_parser::{Replacement, rewrite_body};
///
/// let body = "![d](./img/d.png)";
/// let span = SourcePosition::new(1, 6, 5, 11);
/// let out = rewrite_body(body, &[Replacement::new(span, "/images/1a2b3c4d.png")]);
/// assert_eq!(out, "![d](/images/1a2b3c4d.png)");
/// ```
pub fn rewrite_body(body: &str, replacements: &[Replacement]) -> String {
    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    ordered.sort_by_key(|r| r.position.offset);

    let mut out = String::with_capacity(body.len());
    let mut cursor = 0;

    for replacement in ordered {
        let start = replacement.position.offset;
        let end = replacement.position.end();
        if start < cursor
            || end > body.len()
            || !body.is_char_boundary(start)
            || !body.is_char_boundary(end)
        {
            log::debug!("Skipping invalid rewrite span {}..{}", start, end);
            continue;
        }

        out.push_str(&body[cursor..start]);
        out.push_str(&replacement.text);
        cursor = end;
    }

    out.push_str(&body[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(offset: usize, length: usize) -> SourcePosition {
        SourcePosition::new(1, offset + 1, offset, length)
    }

    #[test]
    fn test_no_replacements_is_identity() {
        let body = "# Title\n\nUnchanged 数据 text\n";
        assert_eq!(rewrite_body(body, &[]), body);
    }

    #[test]
    fn test_multiple_replacements_out_of_order() {
        let body = "a ![](x.png) b <img src=\"y.png\"> c";
        let x = body.find("x.png").unwrap();
        let y = body.find("y.png").unwrap();
        let out = rewrite_body(
            body,
            &[
                Replacement::new(span(y, 5), "/images/bbbb.png"),
                Replacement::new(span(x, 5), "/images/aaaa.png"),
            ],
        );
        assert_eq!(out, "a ![](/images/aaaa.png) b <img src=\"/images/bbbb.png\"> c");
    }

    #[test]
    fn test_invalid_spans_are_skipped() {
        let body = "héllo";
        // offset 2 is inside the two-byte 'é'
        let replacements = [
            Replacement::new(span(2, 1), "X"),
            Replacement::new(span(4, 99), "Y"),
        ];
        let out = rewrite_body(body, &replacements);
        assert_eq!(out, body);
    }

    #[test]
    fn test_overlapping_spans_keep_first() {
        let body = "abcdef";
        let out = rewrite_body(
            body,
            &[Replacement::new(span(1, 3), "X"), Replacement::new(span(2, 2), "Y")],
        );
        assert_eq!(out, "aXef");
    }
}
