//! The staged selection pipeline.
//!
//! `select` runs the shrinking-candidate stages against one requirement
//! and returns either the single best-fit product or a structured
//! failure. Expected "no match" conditions are first-class return values,
//! never errors: an unmatched requirement is a normal business outcome
//! the caller has to show the user. Hard errors are reserved for
//! malformed configuration.

use crate::fallback::{self, FallbackStrategy};
use crate::stages::{self, SIZE_TOLERANCE};
use crate::tier::BudgetTierSelector;
use boq_brands::BrandEcosystemResolver;
use boq_core::{
    CatalogEntry, CatalogStore, EngineError, RequirementSpec, RunContext, SelectionResult,
    Severity, ValidationWarning,
};
use boq_match::extract_size;
use boq_rules::CategoryValidator;
use tracing::{debug, warn};

const COMPONENT: &str = "SelectionPipeline";

/// The orchestrator: one instance per rule/brand configuration, reused
/// across runs.
pub struct SelectionPipeline {
    validator: CategoryValidator,
    brands: BrandEcosystemResolver,
}

impl SelectionPipeline {
    pub fn new(validator: CategoryValidator, brands: BrandEcosystemResolver) -> Self {
        Self { validator, brands }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            CategoryValidator::with_defaults(),
            BrandEcosystemResolver::with_defaults(),
        )
    }

    /// Run the staged selection for one requirement.
    ///
    /// Does not record into the context; `select_with_fallback` owns
    /// recording so retries never double-count.
    pub fn select(
        &self,
        requirement: &RequirementSpec,
        catalog: &CatalogStore,
        ctx: &mut RunContext,
    ) -> Result<SelectionResult, EngineError> {
        if requirement.category.trim().is_empty() {
            ctx.trace("select", "rejecting requirement with empty category");
            return Ok(SelectionResult::unmatched(requirement.clone()).with_warning(
                ValidationWarning::new(
                    COMPONENT,
                    "requirement has an empty category",
                    Severity::Critical,
                ),
            ));
        }

        ctx.trace("select", format!("resolving \"{}\"", requirement.label()));
        if !requirement.compatibility_requirements.is_empty() {
            ctx.trace(
                "select",
                format!(
                    "compatibility notes: {}",
                    requirement.compatibility_requirements.join(", ")
                ),
            );
        }
        let (mut survivors, mut warnings) = self.filter_stages(requirement, catalog, ctx)?;

        if survivors.is_empty() {
            // Bounded fallback search for known hard-to-source sub-categories
            for alternate in fallback::hard_to_source_alternates(requirement) {
                ctx.trace(
                    "fallback_search",
                    format!("retrying as \"{}\"", alternate.label()),
                );
                let (alt_survivors, alt_warnings) =
                    self.filter_stages(&alternate, catalog, ctx)?;

                if !alt_survivors.is_empty() {
                    warnings.extend(alt_warnings);
                    warnings.push(ValidationWarning::new(
                        COMPONENT,
                        format!(
                            "hard-to-source \"{}\" satisfied from broader \"{}\"",
                            requirement.label(),
                            alternate.label()
                        ),
                        Severity::Medium,
                    ));
                    survivors = alt_survivors;
                    break;
                }
            }
        }

        if survivors.is_empty() {
            warn!(requirement = %requirement.label(), "no candidates survived the pipeline");
            warnings.push(ValidationWarning::new(
                COMPONENT,
                format!(
                    "no catalog product satisfies \"{}\"",
                    requirement.label()
                ),
                Severity::Critical,
            ));
            return Ok(SelectionResult::unmatched(requirement.clone()).with_warnings(warnings));
        }

        // Stage 8: budget-tier selection
        let pick = match BudgetTierSelector::pick(&survivors, requirement.budget_tier) {
            Some(entry) => entry,
            None => {
                // Unreachable with a non-empty survivor list; treated as
                // NoCandidates rather than a panic path.
                warnings.push(ValidationWarning::new(
                    COMPONENT,
                    format!("tier selection produced no pick for \"{}\"", requirement.label()),
                    Severity::Critical,
                ));
                return Ok(
                    SelectionResult::unmatched(requirement.clone()).with_warnings(warnings)
                );
            }
        };
        ctx.trace(
            "budget_tier",
            format!(
                "{} tier pick: {} (${})",
                requirement.budget_tier, pick.product.name, pick.product.price
            ),
        );

        // Stage 9: re-validate the final pick. A failure here indicates an
        // upstream filter gap; the requirement resolves to failure, never
        // to a silently substituted candidate.
        let evaluation = self.validator.validate(pick.product, requirement)?;
        if !evaluation.ok() {
            let detail = evaluation
                .first_violation()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown violation".to_string());
            warn!(product = %pick.product.name, %detail, "post-selection validation failed");
            warnings.push(
                ValidationWarning::new(
                    COMPONENT,
                    format!("post-selection validation failed: {detail}"),
                    Severity::Critical,
                )
                .with_product(&pick.product.name),
            );
            return Ok(SelectionResult::unmatched(requirement.clone()).with_warnings(warnings));
        }

        // Advisory only: a size deviation is a downstream compliance note,
        // never a blocker.
        if let (Some(target), Some(actual)) =
            (requirement.size_requirement, extract_size(pick.text))
        {
            if actual.abs_diff(target) > SIZE_TOLERANCE {
                warnings.push(
                    ValidationWarning::new(
                        "CrossValidation",
                        format!(
                            "selected size {actual}in deviates from the {target}in sizing target"
                        ),
                        Severity::High,
                    )
                    .with_product(&pick.product.name),
                );
            }
        }

        ctx.trace(
            "select",
            format!("matched \"{}\" -> {}", requirement.label(), pick.product),
        );
        Ok(SelectionResult::matched(requirement.clone(), pick.product.clone())
            .with_warnings(warnings))
    }

    /// `select`, then the ordered fallback strategy chain, recording the
    /// final outcome into the context.
    pub fn select_with_fallback(
        &self,
        requirement: &RequirementSpec,
        catalog: &CatalogStore,
        ctx: &mut RunContext,
    ) -> Result<SelectionResult, EngineError> {
        let first = self.select(requirement, catalog, ctx)?;
        if first.is_matched() {
            ctx.record(first.clone());
            return Ok(first);
        }

        let mut accumulated = first.warnings;
        let mut current = requirement.clone();

        for strategy in fallback::default_strategies() {
            if !strategy.applies(&current) {
                continue;
            }
            current = strategy.adjust(&current);
            ctx.trace(
                "fallback",
                format!("strategy \"{}\" retrying as \"{}\"", strategy.name(), current.label()),
            );
            debug!(strategy = strategy.name(), "fallback retry");

            let retry = self.select(&current, catalog, ctx)?;
            if let Some(product) = retry.product {
                // The requirement resolved after relaxation, so earlier
                // attempts' criticals no longer describe a failure.
                let mut warnings = downgrade_criticals(accumulated);
                let placeholder =
                    SelectionResult::matched(current.clone(), product.clone());
                warnings.push(strategy.note(requirement, &placeholder));
                warnings.extend(retry.warnings);

                let result = SelectionResult::matched(requirement.clone(), product)
                    .with_warnings(warnings);
                ctx.record(result.clone());
                return Ok(result);
            }
            accumulated.extend(retry.warnings);
        }

        let result =
            SelectionResult::unmatched(requirement.clone()).with_warnings(accumulated);
        ctx.record(result.clone());
        Ok(result)
    }

    /// Stages 1 through 7. Short-circuits on an empty candidate list;
    /// collects the warnings the brand stage produces.
    fn filter_stages<'a>(
        &self,
        requirement: &RequirementSpec,
        catalog: &'a CatalogStore,
        ctx: &mut RunContext,
    ) -> Result<(Vec<CatalogEntry<'a>>, Vec<ValidationWarning>), EngineError> {
        let mut warnings = Vec::new();

        let candidates = stages::category_filter(requirement, catalog, ctx);
        if candidates.is_empty() {
            return Ok((candidates, warnings));
        }

        let candidates = stages::non_product_exclusion(requirement, candidates, ctx);
        if candidates.is_empty() {
            return Ok((candidates, warnings));
        }

        let candidates = stages::keyword_filter(requirement, candidates, ctx);
        if candidates.is_empty() {
            return Ok((candidates, warnings));
        }

        let candidates = stages::specification_match(requirement, candidates, ctx);
        if candidates.is_empty() {
            return Ok((candidates, warnings));
        }

        let candidates =
            stages::strict_validation(&self.validator, requirement, candidates, ctx)?;
        if candidates.is_empty() {
            return Ok((candidates, warnings));
        }

        // Stage 6: brand preference
        let candidates = match &requirement.preferred_brand {
            Some(brand) if requirement.client_preference_weight >= 1.0 => {
                // A hard preference admits no substitution inside select;
                // the fallback chain relaxes the weight if this empties.
                let exact: Vec<CatalogEntry<'a>> = candidates
                    .iter()
                    .copied()
                    .filter(|e| e.product.brand.eq_ignore_ascii_case(brand))
                    .collect();
                ctx.trace(
                    "brand_preference",
                    format!("hard preference \"{brand}\": {} candidates", exact.len()),
                );
                exact
            }
            Some(brand) if requirement.client_preference_weight > 0.0 => {
                let resolution =
                    self.brands
                        .resolve(&requirement.category, Some(brand.as_str()), candidates);
                if let Some(substitute) = &resolution.substituted_brand {
                    ctx.trace(
                        "brand_preference",
                        format!("\"{brand}\" unavailable; substituted \"{substitute}\""),
                    );
                }
                warnings.extend(resolution.warnings);
                resolution.candidates
            }
            _ => candidates,
        };
        if candidates.is_empty() {
            return Ok((candidates, warnings));
        }

        // Stage 7: ecosystem consistency
        let candidates =
            stages::ecosystem_consistency(&self.brands, requirement, candidates, ctx);

        Ok((candidates, warnings))
    }
}

/// Criticals from attempts that a later fallback resolved no longer
/// describe a failure; keep them in the trail one step down.
fn downgrade_criticals(warnings: Vec<ValidationWarning>) -> Vec<ValidationWarning> {
    warnings
        .into_iter()
        .map(|mut w| {
            if w.severity == Severity::Critical {
                w.severity = Severity::High;
            }
            w
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use boq_core::{BudgetTier, ProductRecord};
    use rust_decimal::Decimal;

    fn pipeline() -> SelectionPipeline {
        SelectionPipeline::with_defaults()
    }

    fn display_catalog() -> CatalogStore {
        CatalogStore::new(vec![
            ProductRecord::new(
                "d1",
                "Samsung",
                "Displays",
                "QB65B 65\" commercial display",
                Decimal::from(1500),
            ),
            ProductRecord::new(
                "d2",
                "LG",
                "Displays",
                "UH5F 65\" commercial display",
                Decimal::from(1800),
            ),
        ])
    }

    #[test]
    fn test_select_empty_category_fails_immediately() {
        let catalog = display_catalog();
        let mut ctx = RunContext::new();

        let result = pipeline()
            .select(&RequirementSpec::new("  "), &catalog, &mut ctx)
            .unwrap();

        assert!(!result.is_matched());
        assert_eq!(result.worst_severity(), Some(Severity::Critical));
    }

    #[test]
    fn test_select_is_deterministic() {
        let catalog = display_catalog();
        let req = RequirementSpec::new("Displays").require_keywords(["display"]);

        let mut first: Option<String> = None;
        for _ in 0..5 {
            let mut ctx = RunContext::new();
            let result = pipeline().select(&req, &catalog, &mut ctx).unwrap();
            let id = result.product.unwrap().id;
            match &first {
                Some(expected) => assert_eq!(&id, expected),
                None => first = Some(id),
            }
        }
    }

    #[test]
    fn test_unmatched_requirement_gets_critical_warning() {
        let catalog = display_catalog();
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Audio");

        let result = pipeline()
            .select_with_fallback(&req, &catalog, &mut ctx)
            .unwrap();

        assert!(!result.is_matched());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.severity == Severity::Critical));
        assert_eq!(ctx.stats().unmatched, 1);
    }

    #[test]
    fn test_category_price_sanity_rejects_even_within_requirement_bounds() {
        // The requirement's own price bounds admit the $20 candidate, but
        // the Displays category sanity range does not: strict validation
        // rejects it and the requirement resolves unmatched.
        let catalog = CatalogStore::new(vec![ProductRecord::new(
            "d1",
            "NoName",
            "Displays",
            "Budget display",
            Decimal::from(20),
        )]);
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Displays").with_max_price(Decimal::from(100));

        let result = pipeline()
            .select_with_fallback(&req, &catalog, &mut ctx)
            .unwrap();

        assert!(!result.is_matched());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.severity == Severity::Critical));
    }

    #[test]
    fn test_relaxed_brand_fallback_names_substitute() {
        let catalog = CatalogStore::new(vec![ProductRecord::new(
            "e1",
            "Extron",
            "Control Systems",
            "IPCP Pro 350 control processor",
            Decimal::from(2400),
        )]);
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Control Systems").prefer_brand("Crestron", 1.0);

        let result = pipeline()
            .select_with_fallback(&req, &catalog, &mut ctx)
            .unwrap();

        assert!(result.is_matched());
        assert_eq!(result.product.as_ref().unwrap().brand, "Extron");

        // The MEDIUM strategy note names the substituted brand, the HIGH
        // resolver warning names both; no CRITICAL survives on success.
        assert!(result
            .warnings
            .iter()
            .any(|w| w.severity == Severity::Medium && w.issue.contains("Extron")));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.severity == Severity::High && w.issue.contains("Crestron")));
        assert!(result
            .warnings
            .iter()
            .all(|w| w.severity != Severity::Critical));
    }

    #[test]
    fn test_budget_tier_flows_through_select() {
        let catalog = CatalogStore::new(vec![
            ProductRecord::new("d1", "LG", "Displays", "Basic display", Decimal::from(800)),
            ProductRecord::new("d2", "LG", "Displays", "Mid display", Decimal::from(1500)),
            ProductRecord::new("d3", "LG", "Displays", "Flagship display", Decimal::from(3000)),
        ]);
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Displays")
            .require_keywords(["display"])
            .with_tier(BudgetTier::Standard);

        let result = pipeline().select(&req, &catalog, &mut ctx).unwrap();
        assert_eq!(result.product.unwrap().price, Decimal::from(1500));
    }

    #[test]
    fn test_downgrade_criticals() {
        let warnings = vec![
            ValidationWarning::new("x", "critical thing", Severity::Critical),
            ValidationWarning::new("x", "low thing", Severity::Low),
        ];

        let downgraded = downgrade_criticals(warnings);
        assert_eq!(downgraded[0].severity, Severity::High);
        assert_eq!(downgraded[1].severity, Severity::Low);
    }
}
