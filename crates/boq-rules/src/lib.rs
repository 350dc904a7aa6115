//! BOQ Rules: strict category validation.
//!
//! The rule layer preventing a product from an unrelated
//! category/sub-category from satisfying a requirement through
//! coincidental keyword overlap.
//!
//! # Evaluation order
//!
//! ```text
//! candidate → category match → parent must-contain → parent must-not-contain
//!                                 (sub may override)    (never overridable)
//!           → sub must-contain / must-not-contain → price sanity → RuleEvaluation
//! ```
//!
//! # Example
//!
//! ```
//! use boq_core::{ProductRecord, RequirementSpec};
//! use boq_rules::CategoryValidator;
//! use rust_decimal::Decimal;
//!
//! let validator = CategoryValidator::with_defaults();
//!
//! let mount = ProductRecord::new(
//!     "m1", "Chief", "Mounts", "PTZ camera wall mount", Decimal::from(120),
//! ).with_sub_category("Display Mount / Cart");
//!
//! let requirement = RequirementSpec::new("Mounts")
//!     .with_sub_category("Display Mount / Cart");
//!
//! let eval = validator.validate(&mount, &requirement).unwrap();
//! assert!(!eval.ok()); // camera gear cannot satisfy a display mount
//! ```

pub mod rule;
pub mod validator;
pub mod violation;

pub use rule::{CategoryRuleSet, ValidationRule};
pub use validator::{CategoryValidator, RuleEvaluation};
pub use violation::{RuleCheck, RuleViolation};

use boq_core::{EngineError, ProductRecord, RequirementSpec};

/// Quick validation against the built-in rule tables.
///
/// Builds a fresh validator per call; for per-run use, construct one
/// `CategoryValidator` and reuse it.
pub fn validate_product(
    product: &ProductRecord,
    requirement: &RequirementSpec,
) -> Result<RuleEvaluation, EngineError> {
    CategoryValidator::with_defaults().validate(product, requirement)
}
