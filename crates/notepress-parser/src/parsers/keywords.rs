//! Keyword extraction for post tags.
//!
//! Text is segmented with jieba (dictionary + HMM), which splits Chinese into
//! words and Latin text at whitespace and punctuation. Surviving tokens are
//! ranked by frequency; ties go to the token seen first, so the result is a
//! pure function of the input text.

use jieba_rs::Jieba;
use std::collections::{HashMap, HashSet};

use super::stopwords;

/// Tokens shorter than this (in characters) are never tags.
pub const MIN_KEYWORD_CHARS: usize = 2;

/// Frequency-ranked keyword extractor.
///
/// Building one loads the segmentation dictionary, so create it once and
/// reuse it for every note.
pub struct KeywordExtractor {
    jieba: Jieba,
    stopwords: HashSet<String>,
}

impl KeywordExtractor {
    /// Extractor with the built-in stopword lists only
    pub fn new() -> Self {
        Self::with_stopwords(std::iter::empty::<String>())
    }

    /// Extractor with additional stopwords
    pub fn with_stopwords<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = stopwords::ENGLISH
            .iter()
            .chain(stopwords::CHINESE)
            .chain(stopwords::MARKUP)
            .map(|w| w.to_string())
            .chain(extra.into_iter().map(|w| w.as_ref().trim().to_lowercase()))
            .collect();

        Self {
            jieba: Jieba::new(),
            stopwords,
        }
    }

    /// Whether a (lower-cased) word is filtered out as a stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Whether a term would survive the keyword filters: long enough, made of
    /// letters and digits with at least one letter, and not a stopword.
    pub fn accepts(&self, term: &str) -> bool {
        self.normalize(term).is_some()
    }

    /// Candidate terms in order of appearance, normalized and filtered.
    pub fn candidates(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, true)
            .into_iter()
            .filter_map(|token| self.normalize(token))
            .collect()
    }

    /// Top `max` terms by frequency, ties broken by first occurrence.
    pub fn extract(&self, text: &str, max: usize) -> Vec<String> {
        if max == 0 {
            return Vec::new();
        }

        // term -> (count, first occurrence)
        let mut stats: HashMap<String, (usize, usize)> = HashMap::new();
        for (position, term) in self.candidates(text).into_iter().enumerate() {
            stats
                .entry(term)
                .and_modify(|(count, _)| *count += 1)
                .or_insert((1, position));
        }

        let mut ranked: Vec<(String, usize, usize)> = stats
            .into_iter()
            .map(|(term, (count, first))| (term, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked.into_iter().take(max).map(|(term, _, _)| term).collect()
    }

    fn normalize(&self, token: &str) -> Option<String> {
        let token = token.trim();
        if token.chars().count() < MIN_KEYWORD_CHARS {
            return None;
        }
        // punctuation, symbols and version strings are out, and so are pure numbers
        if !token.chars().all(char::is_alphanumeric) || !token.chars().any(char::is_alphabetic) {
            return None;
        }

        let term = token.to_lowercase();
        if self.is_stopword(&term) {
            return None;
        }
        Some(term)
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    static EXTRACTOR: LazyLock<KeywordExtractor> = LazyLock::new(KeywordExtractor::new);

    #[test]
    fn test_frequency_ranking() {
        let text = "Rust ownership. Rust borrowing. Rust lifetimes and ownership rules.";
        let tags = EXTRACTOR.extract(text, 3);
        assert_eq!(tags, vec!["rust", "ownership", "borrowing"]);
    }

    #[test]
    fn test_ties_follow_first_occurrence() {
        let tags = EXTRACTOR.extract("zebra apple mango", 5);
        assert_eq!(tags, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_stopwords_and_noise_removed() {
        let tags = EXTRACTOR.extract("The and of is 2024 42 -- !! x y the the the", 5);
        assert!(tags.is_empty(), "unexpected tags: {:?}", tags);
    }

    #[test]
    fn test_contractions_do_not_leak() {
        let tags = EXTRACTOR.extract("don't don't don't panic", 5);
        assert_eq!(tags, vec!["panic"]);
    }

    #[test]
    fn test_chinese_segmentation() {
        let text = "数据库索引可以提高查询速度。数据库的索引需要维护。";
        let candidates = EXTRACTOR.candidates(text);
        // words, not single characters, and no stopwords
        assert!(candidates.iter().any(|t| t == "数据库"));
        assert!(candidates.iter().any(|t| t == "索引"));
        assert!(candidates.iter().all(|t| t.chars().count() >= MIN_KEYWORD_CHARS));
        assert!(!candidates.iter().any(|t| t == "可以" || t == "需要"));

        let tags = EXTRACTOR.extract(text, 2);
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&"数据库".to_string()));
        assert!(tags.contains(&"索引".to_string()));
    }

    #[test]
    fn test_mixed_language() {
        let text = "Python 教程: Python 变量 and Python 函数";
        let tags = EXTRACTOR.extract(text, 5);
        assert_eq!(tags.first().map(String::as_str), Some("python"));
        assert!(tags.len() <= 5);
    }

    #[test]
    fn test_extra_stopwords() {
        let extractor = KeywordExtractor::with_stopwords(["Rust"]);
        let tags = extractor.extract("rust rust rust cargo", 5);
        assert_eq!(tags, vec!["cargo"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "alpha beta gamma beta alpha delta epsilon zeta";
        let first = EXTRACTOR.extract(text, 4);
        for _ in 0..5 {
            assert_eq!(EXTRACTOR.extract(text, 4), first);
        }
        assert_eq!(first, vec!["alpha", "beta", "gamma", "delta"]);
    }

    #[test]
    fn test_accepts() {
        assert!(EXTRACTOR.accepts("Rust"));
        assert!(EXTRACTOR.accepts("数据库"));
        assert!(!EXTRACTOR.accepts("The"));
        assert!(!EXTRACTOR.accepts("的"));
        assert!(!EXTRACTOR.accepts("x"));
        assert!(!EXTRACTOR.accepts("2024"));
        assert!(!EXTRACTOR.accepts("c++"));
    }

    #[test]
    fn test_zero_max() {
        assert!(EXTRACTOR.extract("plenty of words here", 0).is_empty());
    }
}
