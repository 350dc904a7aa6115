//! Text normalization for keyword matching.
//!
//! Lowercases, collapses whitespace, and strips decorative punctuation
//! while keeping digits, quote marks, dots, slashes, and hyphens, which
//! size tokens and model numbers rely on.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MULTI_SPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Anything that is not a word character, whitespace, or one of the
    /// characters size/model tokens need.
    static ref DECORATION: Regex = Regex::new(r#"[^\w\s"./-]"#).unwrap();
}

/// Normalize text for pattern matching.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = DECORATION.replace_all(&lowered, " ");
    MULTI_SPACE.replace_all(stripped.trim(), " ").into_owned()
}

/// Split normalized text into searchable tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(|t| t.trim_matches(|c| c == '.' || c == '-' || c == '/').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
