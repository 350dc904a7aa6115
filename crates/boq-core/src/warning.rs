//! Validation warnings and selection results
//!
//! Warnings are append-only and chronological; their order is part of the
//! observable audit contract. A CRITICAL warning always belongs to a
//! requirement that resolved without a product.

use crate::product::ProductRecord;
use crate::requirement::RequirementSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validation warning.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low = 0,
    Medium = 1,
    High = 2,
    /// Reserved for requirements that resolve unmatched
    Critical = 3,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A single audit-trail warning. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Engine component that raised the warning
    pub component: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Human-readable description of the issue
    pub issue: String,

    pub severity: Severity,
}

impl ValidationWarning {
    pub fn new(
        component: impl Into<String>,
        issue: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            component: component.into(),
            product_name: None,
            issue: issue.into(),
            severity,
        }
    }

    pub fn with_product(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.component, self.issue)?;
        if let Some(name) = &self.product_name {
            write!(f, " ({})", name)?;
        }
        Ok(())
    }
}

/// Outcome of resolving one requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResult {
    pub requirement: RequirementSpec,
    pub product: Option<ProductRecord>,
    pub warnings: Vec<ValidationWarning>,
}

impl SelectionResult {
    pub fn matched(requirement: RequirementSpec, product: ProductRecord) -> Self {
        Self {
            requirement,
            product: Some(product),
            warnings: Vec::new(),
        }
    }

    pub fn unmatched(requirement: RequirementSpec) -> Self {
        Self {
            requirement,
            product: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: ValidationWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<ValidationWarning>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn is_matched(&self) -> bool {
        self.product.is_some()
    }

    /// Worst severity among this result's warnings, if any.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.warnings.iter().map(|w| w.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_warning_display() {
        let w = ValidationWarning::new("SelectionPipeline", "no candidates", Severity::Critical)
            .with_product("QM85R");

        let rendered = format!("{}", w);
        assert!(rendered.contains("CRITICAL"));
        assert!(rendered.contains("no candidates"));
        assert!(rendered.contains("QM85R"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_result_worst_severity() {
        let req = RequirementSpec::new("Displays");
        let product = ProductRecord::new("p1", "LG", "Displays", "UH5F", Decimal::from(1500));

        let result = SelectionResult::matched(req, product)
            .with_warning(ValidationWarning::new("a", "x", Severity::Low))
            .with_warning(ValidationWarning::new("b", "y", Severity::High));

        assert!(result.is_matched());
        assert_eq!(result.worst_severity(), Some(Severity::High));
    }

    #[test]
    fn test_unmatched_result() {
        let result = SelectionResult::unmatched(RequirementSpec::new("Audio"));
        assert!(!result.is_matched());
        assert_eq!(result.worst_severity(), None);
    }
}
