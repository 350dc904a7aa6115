//! Compiled keyword sets with audit-friendly reporting.
//!
//! Keywords are normalized at compile time and match case-insensitively as
//! substrings of the (normalized) product text, so stems like "conferenc"
//! cover both "conference" and "conferencing". Multi-word keywords
//! tolerate any whitespace between words.

use crate::normalizer::normalize;
use regex::{escape, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A pre-compiled, case-insensitive keyword list.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    words: Vec<String>,
    patterns: Vec<Regex>,
}

impl KeywordSet {
    /// Compile a keyword list. Entries are normalized first; blank entries
    /// are skipped.
    pub fn compile<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = KeywordSet::default();
        for word in words {
            let word = normalize(word.as_ref());
            if word.is_empty() {
                continue;
            }
            let escaped = word
                .split_whitespace()
                .map(escape)
                .collect::<Vec<_>>()
                .join(r"\s+");
            let pattern = RegexBuilder::new(&escaped)
                .case_insensitive(true)
                .build()
                .expect("escaped keyword is a valid pattern");
            set.words.push(word);
            set.patterns.push(pattern);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// First keyword found in `text`, if any.
    pub fn first_hit(&self, text: &str) -> Option<&str> {
        self.words
            .iter()
            .zip(self.patterns.iter())
            .find(|(_, p)| p.is_match(text))
            .map(|(w, _)| w.as_str())
    }

    /// True when at least one keyword appears in `text`.
    ///
    /// An empty set never matches; callers decide what empty means.
    pub fn matches_any(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// All keywords appearing in `text`, in declaration order.
    pub fn hits(&self, text: &str) -> Vec<&str> {
        self.words
            .iter()
            .zip(self.patterns.iter())
            .filter(|(_, p)| p.is_match(text))
            .map(|(w, _)| w.as_str())
            .collect()
    }

    /// Hit/miss summary for the audit trail.
    pub fn report(&self, text: &str) -> MatchReport {
        let mut report = MatchReport::default();
        for (word, pattern) in self.words.iter().zip(self.patterns.iter()) {
            if pattern.is_match(text) {
                report.hits.push(word.clone());
            } else {
                report.misses.push(word.clone());
            }
        }
        report
    }
}

/// Which keywords of a set hit or missed one text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchReport {
    pub hits: Vec<String>,
    pub misses: Vec<String>,
}

impl MatchReport {
    pub fn any_hit(&self) -> bool {
        !self.hits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_and_case_insensitive() {
        let set = KeywordSet::compile(["display", "conferenc"]);

        assert!(set.matches_any("4K Commercial DISPLAY"));
        assert!(set.matches_any("video conferencing bar"));
        assert!(!set.matches_any("wireless microphone"));
    }

    #[test]
    fn test_multi_word_keyword() {
        let set = KeywordSet::compile(["room kit"]);

        assert!(set.matches_any("Cisco Room  Kit EQ"));
        assert!(!set.matches_any("room audio kit"));
    }

    #[test]
    fn test_first_hit_and_hits() {
        let set = KeywordSet::compile(["mount", "bracket", "stand"]);
        let text = "tilting wall mount with floor stand option";

        assert_eq!(set.first_hit(text), Some("mount"));
        assert_eq!(set.hits(text), vec!["mount", "stand"]);
    }

    #[test]
    fn test_report() {
        let set = KeywordSet::compile(["camera", "mic"]);
        let report = set.report("ptz camera wall mount");

        assert!(report.any_hit());
        assert_eq!(report.hits, vec!["camera"]);
        assert_eq!(report.misses, vec!["mic"]);
    }

    #[test]
    fn test_blank_entries_skipped() {
        let set = KeywordSet::compile(["", "  ", "display"]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_keywords_are_normalized_before_compiling() {
        // "(Pro)" loses its decoration, leaving the two-token "a/v pro"
        let set = KeywordSet::compile(["A/V (Pro)"]);
        assert!(set.matches_any("integrated a/v pro rack"));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let set = KeywordSet::compile(["x1.5"]);
        assert!(set.matches_any("cable x1.5 spec"));
        assert!(!set.matches_any("cable x165 spec"));
    }
}
