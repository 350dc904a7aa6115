//! BOQ Core: data model, catalog store, and run context
//!
//! Shared types for the product-selection engine: the immutable catalog
//! snapshot, requirement specs, validation warnings, and the per-run
//! audit context that every pipeline stage writes into.

pub mod catalog;
pub mod context;
pub mod error;
pub mod product;
pub mod requirement;
pub mod warning;

pub use catalog::{CatalogEntry, CatalogStore};
pub use context::{RunContext, RunStats, TraceEntry};
pub use error::EngineError;
pub use product::{BudgetTier, ProductRecord};
pub use requirement::{MountingType, RequirementSpec};
pub use warning::{SelectionResult, Severity, ValidationWarning};

/// Engine version
pub const BOQ_VERSION: &str = "1.0.0";
