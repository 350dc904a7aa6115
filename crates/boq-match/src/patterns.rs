//! Static domain pattern tables.
//!
//! Shared by the pipeline's heuristic stages: non-product detection,
//! size token extraction, mount capacity statements, and mounting-type
//! keywords. All patterns are case-insensitive.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Phrases that mark a catalog row as a service/warranty line item
    /// rather than shippable hardware.
    static ref NON_PRODUCT: Vec<Regex> = [
        r"(?i)\bextended\s+warranty\b",
        r"(?i)\bwarrant(?:y|ies)\b",
        r"(?i)\bservice\s+(?:contract|plan|agreement)\b",
        r"(?i)\bsupport\s+(?:contract|plan|agreement)\b",
        r"(?i)\bmaintenance\s+(?:contract|plan|agreement)\b",
        r"(?i)\bcare\s*pack\b",
        r"(?i)\bsubscription\s+renewal\b",
        r"(?i)\binstallation\s+labor\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    /// Size tokens: 65", 65'', 65 in, 65-inch, 65 inches.
    static ref SIZE_TOKEN: Regex =
        Regex::new(r#"(?i)(\d{2,3})\s*(?:"|''|-?\s*in(?:ch(?:es)?)?\b)"#).unwrap();

    /// Capacity ceilings stated on mounts: "up to 75\"", "max 70 inch".
    static ref MAX_CAPACITY: Regex = Regex::new(
        r#"(?i)(?:up\s+to|max(?:imum)?\.?)\s*(\d{2,3})\s*(?:"|''|-?\s*in(?:ch(?:es)?)?\b)?"#
    )
    .unwrap();

    /// Words a display-mount candidate must carry.
    static ref MOUNT_WORDS: Regex =
        Regex::new(r"(?i)\b(?:mount|mounts|bracket|stand|cart|trolley)\b").unwrap();

    /// Words that disqualify a display-mount candidate. Camera rigs, touch
    /// panels, and audio hardware share mounting vocabulary.
    static ref MOUNT_CONTAMINATION: Regex =
        Regex::new(r"(?i)\b(?:camera|webcam|touch\s*panel|touchscreen|microphone|mic|speaker)\b")
            .unwrap();
}

/// The service/warranty phrase found in `text`, if any.
pub fn is_non_product(text: &str) -> Option<String> {
    NON_PRODUCT
        .iter()
        .find_map(|re| re.find(text).map(|m| m.as_str().to_string()))
}

/// First size token in `text`, in diagonal units.
pub fn extract_size(text: &str) -> Option<u32> {
    SIZE_TOKEN
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The maximum size capacity a record explicitly states, if any.
pub fn extract_max_capacity(text: &str) -> Option<u32> {
    MAX_CAPACITY
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// True when `text` carries the given mounting-type keyword
/// ("wall", "ceiling", "floor", "desk").
pub fn mentions_mounting(text: &str, keyword: &str) -> bool {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
    Regex::new(&pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// True when `text` carries mount/stand-type vocabulary.
pub fn is_mount_like(text: &str) -> bool {
    MOUNT_WORDS.is_match(text)
}

/// True when `text` carries vocabulary that disqualifies a display mount.
pub fn has_mount_contamination(text: &str) -> bool {
    MOUNT_CONTAMINATION.is_match(text)
}
