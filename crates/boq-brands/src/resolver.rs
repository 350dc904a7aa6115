//! Brand preference resolution.
//!
//! Brand mismatches must always be visible in the audit trail: the
//! resolver never silently returns an arbitrary brand. Every substitution
//! or last-resort pick carries a warning naming what was asked for and
//! what was returned.

use crate::ecosystem::{quality_score, EcosystemMap};
use crate::substitution::SubstitutionTable;
use boq_core::{CatalogEntry, Severity, ValidationWarning};

const COMPONENT: &str = "BrandEcosystemResolver";

/// Outcome of resolving a brand preference over a candidate list.
#[derive(Debug)]
pub struct BrandResolution<'a> {
    pub candidates: Vec<CatalogEntry<'a>>,
    pub warnings: Vec<ValidationWarning>,
    /// Set when a substitute brand was taken instead of the preferred one
    pub substituted_brand: Option<String>,
}

/// Substitution table plus ecosystem map, built once per run.
pub struct BrandEcosystemResolver {
    table: SubstitutionTable,
    ecosystem: EcosystemMap,
}

impl BrandEcosystemResolver {
    pub fn new(table: SubstitutionTable, ecosystem: EcosystemMap) -> Self {
        Self { table, ecosystem }
    }

    pub fn with_defaults() -> Self {
        Self::new(SubstitutionTable::defaults(), EcosystemMap::defaults())
    }

    pub fn ecosystem(&self) -> &EcosystemMap {
        &self.ecosystem
    }

    /// Narrow `candidates` to the preferred brand, or the best available
    /// substitute when the preferred brand has no catalog presence.
    ///
    /// - No preference: candidates returned unchanged.
    /// - Exact brand present: only those candidates (hard preference).
    /// - Substitute found: that brand's candidates, HIGH warning naming
    ///   both brands.
    /// - Nothing equivalent: the single highest-quality-scored candidate,
    ///   HIGH warning. Escalation to CRITICAL is the pipeline's call and
    ///   happens only when the requirement ends up unmatched.
    pub fn resolve<'a>(
        &self,
        category: &str,
        preferred_brand: Option<&str>,
        candidates: Vec<CatalogEntry<'a>>,
    ) -> BrandResolution<'a> {
        let preferred = match preferred_brand {
            Some(brand) if !brand.trim().is_empty() => brand,
            _ => {
                return BrandResolution {
                    candidates,
                    warnings: Vec::new(),
                    substituted_brand: None,
                }
            }
        };

        let exact: Vec<CatalogEntry<'a>> = candidates
            .iter()
            .copied()
            .filter(|e| e.product.brand.eq_ignore_ascii_case(preferred))
            .collect();
        if !exact.is_empty() {
            return BrandResolution {
                candidates: exact,
                warnings: Vec::new(),
                substituted_brand: None,
            };
        }

        for substitute in self.table.substitutes(category, preferred) {
            let of_substitute: Vec<CatalogEntry<'a>> = candidates
                .iter()
                .copied()
                .filter(|e| e.product.brand.eq_ignore_ascii_case(substitute))
                .collect();

            if !of_substitute.is_empty() {
                let warning = ValidationWarning::new(
                    COMPONENT,
                    format!(
                        "preferred brand \"{preferred}\" unavailable for {category}; \
                         substituting equivalent-tier \"{substitute}\""
                    ),
                    Severity::High,
                );
                return BrandResolution {
                    candidates: of_substitute,
                    warnings: vec![warning],
                    substituted_brand: Some(substitute.clone()),
                };
            }
        }

        // Last resort: best-quality candidate across all brands. Strict
        // score comparison keeps catalog order for ties.
        let mut best: Option<CatalogEntry<'a>> = None;
        let mut best_score = 0;
        for entry in &candidates {
            let score = quality_score(entry);
            if best.is_none() || score > best_score {
                best = Some(*entry);
                best_score = score;
            }
        }

        match best {
            Some(entry) => {
                let warning = ValidationWarning::new(
                    COMPONENT,
                    format!(
                        "requested brand \"{preferred}\" has no catalog presence and no \
                         equivalent substitute in {category}; returning best available \
                         \"{}\"",
                        entry.product.brand
                    ),
                    Severity::High,
                )
                .with_product(&entry.product.name);

                BrandResolution {
                    candidates: vec![entry],
                    warnings: vec![warning],
                    substituted_brand: Some(entry.product.brand.clone()),
                }
            }
            None => BrandResolution {
                candidates: Vec::new(),
                warnings: Vec::new(),
                substituted_brand: None,
            },
        }
    }
}
