//! Individual analyzers used by [`analyze`](crate::analyze).

pub mod frontmatter_parser;
pub mod keywords;
pub mod stopwords;
pub mod title;

pub use self::frontmatter_parser::{SourceFrontMatter, render_front_matter, split_front_matter};
pub use self::keywords::KeywordExtractor;
pub use self::title::{slugify, title_from_filename};
