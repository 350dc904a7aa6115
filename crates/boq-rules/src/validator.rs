//! Strict category validation.
//!
//! Evaluation order per candidate:
//! (a) exact category match when the requirement demands it,
//! (b) parent must-contain unless a sub-category rule overrides it,
//! (c) parent must-not-contain (never overridable),
//! (d) sub-category must-contain / must-not-contain,
//! (e) price-range sanity check.
//!
//! All violations are collected exhaustively; rejection only needs the
//! first, but the full list makes rejected candidates debuggable.

use crate::rule::{CategoryRuleSet, ValidationRule};
use crate::violation::{RuleCheck, RuleViolation};
use boq_core::{EngineError, ProductRecord, RequirementSpec};
use boq_match::KeywordSet;
use std::collections::HashMap;

/// Outcome of validating one candidate.
#[derive(Debug, Clone)]
pub struct RuleEvaluation {
    pub violations: Vec<RuleViolation>,
}

impl RuleEvaluation {
    pub fn ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn first_violation(&self) -> Option<&RuleViolation> {
        self.violations.first()
    }
}

struct CompiledRule {
    must_contain: KeywordSet,
    must_not_contain: KeywordSet,
    price_range: Option<(rust_decimal::Decimal, rust_decimal::Decimal)>,
    override_parent: bool,
}

impl CompiledRule {
    fn compile(rule: &ValidationRule) -> Self {
        Self {
            must_contain: KeywordSet::compile(&rule.must_contain),
            must_not_contain: KeywordSet::compile(&rule.must_not_contain),
            price_range: rule.price_range,
            override_parent: rule.override_parent,
        }
    }
}

/// The registry of compiled rules, built once and reused per run.
pub struct CategoryValidator {
    parents: HashMap<String, CompiledRule>,
    subs: HashMap<(String, String), CompiledRule>,
}

impl CategoryValidator {
    pub fn new(rules: &CategoryRuleSet) -> Self {
        let parents = rules
            .categories
            .iter()
            .map(|(k, v)| (k.clone(), CompiledRule::compile(v)))
            .collect();

        let subs = rules
            .sub_categories
            .iter()
            .flat_map(|(category, subs)| {
                subs.iter().map(move |(sub, rule)| {
                    ((category.clone(), sub.clone()), CompiledRule::compile(rule))
                })
            })
            .collect();

        Self { parents, subs }
    }

    pub fn with_defaults() -> Self {
        Self::new(&CategoryRuleSet::default_rules())
    }

    /// Validate a candidate against the rules for its category and
    /// sub-category.
    ///
    /// The sub-category rule is resolved from the candidate's own label,
    /// falling back to the requirement's (catalog rows frequently omit
    /// sub-category labels). A product category with no validator entry is
    /// a hard error: it means the rule tables were never taught about a
    /// category the catalog contains.
    pub fn validate(
        &self,
        product: &ProductRecord,
        requirement: &RequirementSpec,
    ) -> Result<RuleEvaluation, EngineError> {
        let category_key = product.category.to_lowercase();
        let parent = self
            .parents
            .get(&category_key)
            .ok_or_else(|| EngineError::UnknownCategory(product.category.clone()))?;

        let sub_label = product
            .sub_category
            .as_deref()
            .or(requirement.sub_category.as_deref());
        let sub = sub_label
            .and_then(|s| self.subs.get(&(category_key.clone(), s.to_lowercase())));

        let text = boq_match::normalize(&product.text());
        let mut violations = Vec::new();

        // (a) exact category match
        if requirement.strict_category_match
            && !product.category.eq_ignore_ascii_case(&requirement.category)
        {
            violations.push(RuleViolation::new(
                format!("{category_key}.category"),
                RuleCheck::CategoryMismatch,
                format!(
                    "category \"{}\" does not match required \"{}\"",
                    product.category, requirement.category
                ),
            ));
        }

        // (b) parent must-contain, unless the sub rule overrides it
        let overridden = sub.map(|s| s.override_parent).unwrap_or(false);
        if !overridden && !parent.must_contain.is_empty() && !parent.must_contain.matches_any(&text)
        {
            violations.push(RuleViolation::new(
                format!("{category_key}.must_contain"),
                RuleCheck::MustContain,
                format!(
                    "text contains none of {:?}",
                    parent.must_contain.words()
                ),
            ));
        }

        // (c) parent must-not-contain, always enforced
        if let Some(word) = parent.must_not_contain.first_hit(&text) {
            violations.push(RuleViolation::new(
                format!("{category_key}.must_not_contain"),
                RuleCheck::MustNotContain,
                format!("forbidden word \"{word}\" present"),
            ));
        }

        // (d) sub-category checks
        if let Some(sub_rule) = sub {
            let sub_key = sub_label.map(|s| s.to_lowercase()).unwrap_or_default();

            if !sub_rule.must_contain.is_empty() && !sub_rule.must_contain.matches_any(&text) {
                violations.push(RuleViolation::new(
                    format!("{category_key}.{sub_key}.must_contain"),
                    RuleCheck::SubMustContain,
                    format!("text contains none of {:?}", sub_rule.must_contain.words()),
                ));
            }

            if let Some(word) = sub_rule.must_not_contain.first_hit(&text) {
                violations.push(RuleViolation::new(
                    format!("{category_key}.{sub_key}.must_not_contain"),
                    RuleCheck::SubMustNotContain,
                    format!("forbidden word \"{word}\" present"),
                ));
            }

            if let Some((min, max)) = sub_rule.price_range {
                if product.price < min || product.price > max {
                    violations.push(RuleViolation::new(
                        format!("{category_key}.{sub_key}.price_range"),
                        RuleCheck::PriceRange,
                        format!(
                            "price {} outside sane range {}..={}",
                            product.price, min, max
                        ),
                    ));
                }
            }
        }

        // (e) category price-range sanity check
        if let Some((min, max)) = parent.price_range {
            if product.price < min || product.price > max {
                violations.push(RuleViolation::new(
                    format!("{category_key}.price_range"),
                    RuleCheck::PriceRange,
                    format!(
                        "price {} outside sane range {}..={}",
                        product.price, min, max
                    ),
                ));
            }
        }

        Ok(RuleEvaluation { violations })
    }
}
