//! Rule violations
//!
//! One violation per failed check, naming the specific rule so the audit
//! trail can explain every rejected candidate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which check a violation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCheck {
    CategoryMismatch,
    MustContain,
    MustNotContain,
    SubMustContain,
    SubMustNotContain,
    PriceRange,
}

impl fmt::Display for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCheck::CategoryMismatch => write!(f, "category_mismatch"),
            RuleCheck::MustContain => write!(f, "must_contain"),
            RuleCheck::MustNotContain => write!(f, "must_not_contain"),
            RuleCheck::SubMustContain => write!(f, "sub_must_contain"),
            RuleCheck::SubMustNotContain => write!(f, "sub_must_not_contain"),
            RuleCheck::PriceRange => write!(f, "price_range"),
        }
    }
}

/// A specific rule violation for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    /// Rule key, e.g. "displays.must_contain"
    pub rule_id: String,
    pub check: RuleCheck,
    /// Names the offending word or bound
    pub description: String,
}

impl RuleViolation {
    pub fn new(
        rule_id: impl Into<String>,
        check: RuleCheck,
        description: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            check,
            description: description.into(),
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule_id, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let v = RuleViolation::new(
            "mounts.must_not_contain",
            RuleCheck::MustNotContain,
            "forbidden word \"camera\" present",
        );

        let rendered = format!("{}", v);
        assert!(rendered.contains("mounts.must_not_contain"));
        assert!(rendered.contains("camera"));
    }
}
