//! The shrinking-candidate filter stages.
//!
//! Each stage takes the surviving candidate list and returns a smaller
//! one, writing a trace line with the remaining count. The pipeline
//! short-circuits as soon as a stage empties the list.

use boq_brands::BrandEcosystemResolver;
use boq_core::{CatalogEntry, CatalogStore, EngineError, RequirementSpec, RunContext};
use boq_match::{
    extract_max_capacity, extract_size, has_mount_contamination, is_mount_like, is_non_product,
    mentions_mounting, KeywordSet,
};
use boq_rules::CategoryValidator;
use tracing::debug;

/// Size tolerance in diagonal units for the specification-match stage.
pub const SIZE_TOLERANCE: u32 = 3;

/// Display size at and above which mount capacity statements are checked.
const LARGE_MOUNT_THRESHOLD: u32 = 85;

/// Stage 1: restrict to the requirement's category (and sub-category when
/// given) and apply the requirement's own price bounds.
///
/// Catalog rows frequently omit sub-category labels, so a row with no
/// label stays in and is vetted by the keyword and rule stages instead.
pub fn category_filter<'a>(
    requirement: &RequirementSpec,
    catalog: &'a CatalogStore,
    ctx: &mut RunContext,
) -> Vec<CatalogEntry<'a>> {
    let mut candidates = catalog.in_category(&requirement.category);

    if let Some(sub) = &requirement.sub_category {
        candidates.retain(|e| match &e.product.sub_category {
            Some(label) => label.eq_ignore_ascii_case(sub),
            None => true,
        });
    }

    if let Some(min) = requirement.min_price {
        candidates.retain(|e| e.product.price >= min);
    }
    if let Some(max) = requirement.max_price {
        candidates.retain(|e| e.product.price <= max);
    }

    debug!(remaining = candidates.len(), "category_filter");
    ctx.trace(
        "category_filter",
        format!("{} candidates in \"{}\"", candidates.len(), requirement.label()),
    );
    candidates
}

/// Stage 2: drop service/warranty/support-contract rows, unless the
/// requirement itself asks for services.
pub fn non_product_exclusion<'a>(
    requirement: &RequirementSpec,
    mut candidates: Vec<CatalogEntry<'a>>,
    ctx: &mut RunContext,
) -> Vec<CatalogEntry<'a>> {
    if requirement.category.eq_ignore_ascii_case("services") {
        return candidates;
    }

    candidates.retain(|e| match is_non_product(e.text) {
        Some(phrase) => {
            debug!(product = %e.product.name, %phrase, "non_product_exclusion");
            false
        }
        None => true,
    });

    ctx.trace(
        "non_product_exclusion",
        format!("{} candidates remain", candidates.len()),
    );
    candidates
}

/// Stage 3: require at least one required-keyword hit (when any are
/// given), reject every blacklist hit, and apply the display-mount
/// heuristic sub-filter.
pub fn keyword_filter<'a>(
    requirement: &RequirementSpec,
    mut candidates: Vec<CatalogEntry<'a>>,
    ctx: &mut RunContext,
) -> Vec<CatalogEntry<'a>> {
    let required = KeywordSet::compile(&requirement.required_keywords);
    if !required.is_empty() {
        candidates.retain(|e| required.matches_any(e.text));
    }

    let blacklist = KeywordSet::compile(&requirement.blacklist_keywords);
    if !blacklist.is_empty() {
        candidates.retain(|e| match blacklist.first_hit(e.text) {
            Some(word) => {
                debug!(product = %e.product.name, word, "blacklist hit");
                false
            }
            None => true,
        });
    }

    if is_display_mount_requirement(requirement) {
        candidates.retain(|e| is_mount_like(e.text) && !has_mount_contamination(e.text));
    }

    debug!(remaining = candidates.len(), "keyword_filter");
    ctx.trace(
        "keyword_filter",
        format!("{} candidates remain", candidates.len()),
    );
    candidates
}

/// Stage 4: prefer candidates whose text encodes a size within tolerance
/// of the target, falling back to the pre-spec-match set when none do.
/// Mounting-type keywords filter strictly; large display mounts must not
/// state a capacity below the target size.
pub fn specification_match<'a>(
    requirement: &RequirementSpec,
    mut candidates: Vec<CatalogEntry<'a>>,
    ctx: &mut RunContext,
) -> Vec<CatalogEntry<'a>> {
    if let Some(target) = requirement.size_requirement {
        let within: Vec<CatalogEntry<'a>> = candidates
            .iter()
            .copied()
            .filter(|e| {
                extract_size(e.text)
                    .map(|size| size.abs_diff(target) <= SIZE_TOLERANCE)
                    .unwrap_or(false)
            })
            .collect();

        if within.is_empty() {
            ctx.trace(
                "specification_match",
                format!("no candidate within {SIZE_TOLERANCE} units of {target}; keeping all"),
            );
        } else {
            candidates = within;
        }
    }

    if let Some(mounting) = requirement.mounting_type {
        candidates.retain(|e| mentions_mounting(e.text, mounting.keyword()));
    }

    if requirement.category.eq_ignore_ascii_case("mounts") {
        if let Some(target) = requirement.size_requirement {
            if target >= LARGE_MOUNT_THRESHOLD {
                // Accept unless the record explicitly states a smaller max
                candidates.retain(|e| {
                    extract_max_capacity(e.text)
                        .map(|cap| cap >= target)
                        .unwrap_or(true)
                });
            }
        }
    }

    debug!(remaining = candidates.len(), "specification_match");
    ctx.trace(
        "specification_match",
        format!("{} candidates remain", candidates.len()),
    );
    candidates
}

/// Stage 5: strict category validation. Failing candidates are rejected
/// individually with the violated rule traced; rejection is never fatal
/// to the requirement while other candidates remain.
pub fn strict_validation<'a>(
    validator: &CategoryValidator,
    requirement: &RequirementSpec,
    candidates: Vec<CatalogEntry<'a>>,
    ctx: &mut RunContext,
) -> Result<Vec<CatalogEntry<'a>>, EngineError> {
    let mut survivors = Vec::with_capacity(candidates.len());

    for entry in candidates {
        let evaluation = validator.validate(entry.product, requirement)?;
        if evaluation.ok() {
            survivors.push(entry);
        } else if let Some(violation) = evaluation.first_violation() {
            debug!(product = %entry.product.name, rule = %violation.rule_id, "validation reject");
            ctx.trace(
                "strict_validation",
                format!("rejected \"{}\": {}", entry.product.name, violation),
            );
        }
    }

    ctx.trace(
        "strict_validation",
        format!("{} candidates remain", survivors.len()),
    );
    Ok(survivors)
}

/// Stage 7: prefer candidates whose brand was already selected in this
/// run for a related category, when any such candidates exist.
pub fn ecosystem_consistency<'a>(
    resolver: &BrandEcosystemResolver,
    requirement: &RequirementSpec,
    candidates: Vec<CatalogEntry<'a>>,
    ctx: &mut RunContext,
) -> Vec<CatalogEntry<'a>> {
    let related = resolver.ecosystem().related(&requirement.category);
    let prior_brands = ctx.selected_brands_for(&related);
    if prior_brands.is_empty() {
        return candidates;
    }

    let preferred: Vec<CatalogEntry<'a>> = candidates
        .iter()
        .copied()
        .filter(|e| {
            prior_brands
                .iter()
                .any(|b| e.product.brand.eq_ignore_ascii_case(b))
        })
        .collect();

    if !preferred.is_empty() && preferred.len() < candidates.len() {
        let brands = preferred
            .iter()
            .map(|e| e.product.brand.as_str())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>()
            .join(", ");
        debug!(%brands, "ecosystem_consistency narrowed candidates");
        ctx.trace(
            "ecosystem_consistency",
            format!("preferring already-selected brand(s): {brands}"),
        );
        return preferred;
    }

    candidates
}

/// Display-mount requirements get the mount/stand vocabulary heuristic.
fn is_display_mount_requirement(requirement: &RequirementSpec) -> bool {
    if !requirement.category.eq_ignore_ascii_case("mounts") {
        return false;
    }
    match &requirement.sub_category {
        Some(sub) => {
            let sub = sub.to_lowercase();
            ["display", "tv", "monitor", "cart"]
                .iter()
                .any(|w| sub.contains(w))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boq_core::{MountingType, ProductRecord};
    use rust_decimal::Decimal;

    fn mount_catalog() -> CatalogStore {
        CatalogStore::new(vec![
            ProductRecord::new(
                "m1",
                "Chief",
                "Mounts",
                "PTZ camera wall mount",
                Decimal::from(120),
            ),
            ProductRecord::new(
                "m2",
                "Chief",
                "Mounts",
                "TV wall mount",
                Decimal::from(150),
            )
            .with_sub_category("Display Mount / Cart"),
            ProductRecord::new(
                "m3",
                "Chief",
                "Mounts",
                "Extended warranty for mounts",
                Decimal::from(60),
            ),
        ])
    }

    #[test]
    fn test_category_filter_keeps_unlabeled_sub_categories() {
        let catalog = mount_catalog();
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Mounts").with_sub_category("Display Mount / Cart");

        let candidates = category_filter(&req, &catalog, &mut ctx);
        // m1/m3 have no sub label and stay; m2 matches exactly
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_category_filter_price_bounds() {
        let catalog = mount_catalog();
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Mounts").with_min_price(Decimal::from(100));

        let candidates = category_filter(&req, &catalog, &mut ctx);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_non_product_exclusion_drops_warranty_rows() {
        let catalog = mount_catalog();
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Mounts");

        let candidates = category_filter(&req, &catalog, &mut ctx);
        let candidates = non_product_exclusion(&req, candidates, &mut ctx);

        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|e| !e.text.contains("warranty")));
    }

    #[test]
    fn test_non_product_exclusion_spares_services_requirements() {
        let catalog = CatalogStore::new(vec![ProductRecord::new(
            "s1",
            "Integrator",
            "Services",
            "On-site installation service plan",
            Decimal::from(900),
        )]);
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Services");

        let candidates = category_filter(&req, &catalog, &mut ctx);
        let candidates = non_product_exclusion(&req, candidates, &mut ctx);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_keyword_filter_blacklist() {
        let catalog = mount_catalog();
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Mounts").blacklist(["camera", "mic"]);

        let candidates = category_filter(&req, &catalog, &mut ctx);
        let candidates = keyword_filter(&req, candidates, &mut ctx);

        assert!(candidates.iter().all(|e| !e.text.contains("camera")));
    }

    #[test]
    fn test_display_mount_heuristic_rejects_camera_gear() {
        let catalog = mount_catalog();
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Mounts").with_sub_category("Display Mount / Cart");

        let candidates = category_filter(&req, &catalog, &mut ctx);
        let candidates = keyword_filter(&req, candidates, &mut ctx);

        assert!(candidates.iter().any(|e| e.product.id == "m2"));
        assert!(candidates.iter().all(|e| e.product.id != "m1"));
    }

    #[test]
    fn test_specification_match_prefers_size_window() {
        let catalog = CatalogStore::new(vec![
            ProductRecord::new("d1", "LG", "Displays", "55\" display", Decimal::from(900)),
            ProductRecord::new("d2", "LG", "Displays", "65\" display", Decimal::from(1400)),
            ProductRecord::new("d3", "LG", "Displays", "67\" display", Decimal::from(1500)),
        ]);
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Displays").with_size(65);

        let candidates = category_filter(&req, &catalog, &mut ctx);
        let candidates = specification_match(&req, candidates, &mut ctx);

        let ids: Vec<_> = candidates.iter().map(|e| e.product.id.as_str()).collect();
        assert_eq!(ids, vec!["d2", "d3"]);
    }

    #[test]
    fn test_specification_match_falls_back_when_no_size_fits() {
        let catalog = CatalogStore::new(vec![ProductRecord::new(
            "d1",
            "LG",
            "Displays",
            "55\" display",
            Decimal::from(900),
        )]);
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Displays").with_size(98);

        let candidates = category_filter(&req, &catalog, &mut ctx);
        let candidates = specification_match(&req, candidates, &mut ctx);

        // The pipeline must not empty out on the size preference alone
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_mounting_type_filters_strictly() {
        let catalog = CatalogStore::new(vec![
            ProductRecord::new("m1", "Chief", "Mounts", "TV wall mount", Decimal::from(150))
                .with_sub_category("Display Mount / Cart"),
            ProductRecord::new(
                "m2",
                "Chief",
                "Mounts",
                "Mobile floor cart",
                Decimal::from(600),
            )
            .with_sub_category("Display Mount / Cart"),
        ]);
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Mounts").with_mounting(MountingType::Wall);

        let candidates = category_filter(&req, &catalog, &mut ctx);
        let candidates = specification_match(&req, candidates, &mut ctx);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].product.id, "m1");
    }

    #[test]
    fn test_large_mount_capacity_check() {
        let catalog = CatalogStore::new(vec![
            ProductRecord::new(
                "m1",
                "Chief",
                "Mounts",
                "Wall mount for displays up to 75\"",
                Decimal::from(200),
            ),
            ProductRecord::new(
                "m2",
                "Chief",
                "Mounts",
                "Heavy duty wall mount, max 98 inch",
                Decimal::from(350),
            ),
            ProductRecord::new(
                "m3",
                "Chief",
                "Mounts",
                "Fixed wall mount",
                Decimal::from(90),
            ),
        ]);
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Mounts")
            .with_size(86)
            .with_mounting(MountingType::Wall);

        let candidates = category_filter(&req, &catalog, &mut ctx);
        let candidates = specification_match(&req, candidates, &mut ctx);

        let ids: Vec<_> = candidates.iter().map(|e| e.product.id.as_str()).collect();
        // m1 states a 75" ceiling and is dropped; m3 states nothing and stays
        assert_eq!(ids, vec!["m2", "m3"]);
    }

    #[test]
    fn test_strict_validation_rejects_individually() {
        let catalog = CatalogStore::new(vec![
            ProductRecord::new(
                "d1",
                "LG",
                "Displays",
                "UH5F 65\" commercial display",
                Decimal::from(1500),
            ),
            // Price far outside the Displays sanity range
            ProductRecord::new("d2", "LG", "Displays", "Display sticker", Decimal::from(2)),
        ]);
        let mut ctx = RunContext::new();
        let req = RequirementSpec::new("Displays");
        let validator = CategoryValidator::with_defaults();

        let candidates = category_filter(&req, &catalog, &mut ctx);
        let survivors = strict_validation(&validator, &req, candidates, &mut ctx).unwrap();

        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].product.id, "d1");
        assert!(ctx.trace_log().contains("rejected"));
    }

    #[test]
    fn test_ecosystem_consistency_prefers_prior_brand() {
        use boq_core::SelectionResult;

        let catalog = CatalogStore::new(vec![
            ProductRecord::new(
                "a1",
                "Shure",
                "Audio",
                "Wireless microphone system",
                Decimal::from(900),
            ),
            ProductRecord::new(
                "a2",
                "Poly",
                "Audio",
                "Wireless expansion microphone",
                Decimal::from(800),
            ),
        ]);
        let mut ctx = RunContext::new();
        ctx.record(SelectionResult::matched(
            RequirementSpec::new("Video Conferencing"),
            ProductRecord::new(
                "v1",
                "Poly",
                "Video Conferencing",
                "Studio X52 video bar",
                Decimal::from(2200),
            ),
        ));

        let resolver = BrandEcosystemResolver::with_defaults();
        let req = RequirementSpec::new("Audio");

        let candidates = category_filter(&req, &catalog, &mut ctx);
        let candidates = ecosystem_consistency(&resolver, &req, candidates, &mut ctx);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].product.brand, "Poly");
    }
}
