//! Unified Error Model
//!
//! Hard errors are reserved for malformed configuration or catalog input.
//! An expected "no matching product" outcome is never an error; it surfaces
//! as an unmatched `SelectionResult` carrying warnings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("CATALOG/{0}")]
    Catalog(String),

    #[error("CONFIG/{0}")]
    Config(String),

    /// A product category with no validator entry. Indicates a
    /// development-time omission in the rule tables, not a data condition.
    #[error("RULES/unknown category: {0}")]
    UnknownCategory(String),
}
