//! BOQ Brands: brand substitution and ecosystem consistency.
//!
//! Client brand preferences are hard preferences, not soft scores: when an
//! exact match exists it always wins, and any deviation (equivalent-tier
//! substitute, last-resort best-available pick) is surfaced as a warning
//! in the audit trail.

pub mod ecosystem;
pub mod resolver;
pub mod substitution;

pub use ecosystem::{quality_score, EcosystemMap};
pub use resolver::{BrandEcosystemResolver, BrandResolution};
pub use substitution::SubstitutionTable;
