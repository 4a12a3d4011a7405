//! Shared utilities for operations across notepress crates.

use crate::{Error, Result};

/// Generic JSON serialization with consistent error handling
pub fn to_json_string<T: serde::Serialize + ?Sized>(data: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(data).map_err(|e| {
        Error::config_error(format!("Failed to serialize {} as JSON: {}", context, e))
    })
}

/// Title-case a phrase the way filenames are turned into titles:
/// first character of each word upper-cased, the rest lower-cased.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
