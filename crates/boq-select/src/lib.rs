//! BOQ Select: the staged product-selection pipeline.
//!
//! Given an ordered blueprint of requirements and an in-memory catalog,
//! the pipeline deterministically selects exactly one best-fit product
//! per requirement, or fails loudly with a structured, audited reason.
//!
//! # Pipeline Flow
//!
//! ```text
//! Requirement → Category → Non-product → Keywords → Spec match
//!                  ↓            ↓            ↓          ↓
//!             Validation → Brand pref → Ecosystem → Budget tier → Re-validate
//!                                                        ↓
//!                                             SelectionResult + warnings
//! ```
//!
//! Requirements are processed strictly in ascending priority order: later
//! requirements' ecosystem checks depend on the brands selected earlier in
//! the same run, so resolution is a sequential fold over the context.

pub mod fallback;
pub mod pipeline;
pub mod stages;
pub mod tier;

pub use fallback::{default_strategies, BroadenSubCategory, FallbackStrategy, RelaxBrandPreference};
pub use pipeline::SelectionPipeline;
pub use tier::BudgetTierSelector;

use boq_core::{
    CatalogStore, EngineError, RequirementSpec, RunContext, RunStats, SelectionResult, Severity,
    ValidationWarning,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

/// Caller-facing bundle for one blueprint resolution.
#[derive(Debug, Clone, Serialize)]
pub struct BlueprintResolution {
    /// One result per requirement, in processed (priority) order
    pub results: Vec<SelectionResult>,
    /// Run-wide warnings in chronological order
    pub warnings: Vec<ValidationWarning>,
    pub stats: RunStats,
    /// Plain-text audit log for humans, not for machine parsing
    pub trace_log: String,
    /// Σ price × quantity over matched requirements
    pub equipment_subtotal: Decimal,
}

impl BlueprintResolution {
    fn from_context(ctx: &RunContext) -> Self {
        let equipment_subtotal = ctx
            .results()
            .iter()
            .filter_map(|r| {
                r.product
                    .as_ref()
                    .map(|p| p.price * Decimal::from(r.requirement.quantity))
            })
            .sum();

        Self {
            results: ctx.results().to_vec(),
            warnings: ctx.warnings().to_vec(),
            stats: ctx.stats(),
            trace_log: ctx.trace_log(),
            equipment_subtotal,
        }
    }

    /// Warnings of one severity, in chronological order.
    pub fn warnings_with_severity(&self, severity: Severity) -> Vec<&ValidationWarning> {
        self.warnings
            .iter()
            .filter(|w| w.severity == severity)
            .collect()
    }
}

impl SelectionPipeline {
    /// Resolve a whole blueprint: sort by ascending priority, fold every
    /// requirement through `select_with_fallback` against a fresh context,
    /// and bundle the outcome.
    pub fn resolve_blueprint(
        &self,
        requirements: Vec<RequirementSpec>,
        catalog: &CatalogStore,
    ) -> Result<BlueprintResolution, EngineError> {
        let mut ordered = requirements;
        ordered.sort_by_key(|r| r.priority);

        let mut ctx = RunContext::new();
        info!(
            requirements = ordered.len(),
            catalog = catalog.len(),
            "resolving blueprint"
        );

        for requirement in &ordered {
            self.select_with_fallback(requirement, catalog, &mut ctx)?;
        }

        let resolution = BlueprintResolution::from_context(&ctx);
        info!(
            matched = resolution.stats.matched,
            unmatched = resolution.stats.unmatched,
            "blueprint resolved"
        );
        Ok(resolution)
    }
}
