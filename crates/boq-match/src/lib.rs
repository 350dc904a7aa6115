//! BOQ Match: text normalization and compiled keyword matching.
//!
//! Stateless utilities used by the selection pipeline: inclusion/exclusion
//! keyword sets compiled to case-insensitive patterns, plus the static
//! domain tables (service/warranty phrases, size tokens, mount capacity
//! statements, mounting-type keywords) that the heuristic filters rely on.
//!
//! Everything here is unit-testable without catalog data.

pub mod keywords;
pub mod normalizer;
pub mod patterns;

pub use keywords::{KeywordSet, MatchReport};
pub use normalizer::{normalize, tokenize};
pub use patterns::{
    extract_max_capacity, extract_size, has_mount_contamination, is_mount_like, is_non_product,
    mentions_mounting,
};
