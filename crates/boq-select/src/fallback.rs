//! Fallback strategies tried after strict selection fails.
//!
//! The "try strict, then relax brand, then broaden category, then give up"
//! sequence is an explicit ordered strategy list, so adding or testing a
//! new fallback never touches the others. Strategies compound: each
//! applicable strategy adjusts the requirement the previous one produced.

use boq_core::{RequirementSpec, SelectionResult, Severity, ValidationWarning};
use once_cell::sync::Lazy;

const COMPONENT: &str = "SelectionPipeline";

/// A single fallback adjustment.
pub trait FallbackStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this strategy has anything to relax on the requirement.
    fn applies(&self, requirement: &RequirementSpec) -> bool;

    /// The adjusted requirement to retry with.
    fn adjust(&self, requirement: &RequirementSpec) -> RequirementSpec;

    /// Warning attached when the retry succeeds.
    fn note(&self, requirement: &RequirementSpec, result: &SelectionResult) -> ValidationWarning;
}

/// Relax a hard brand requirement (weight 1.0) to a soft preference so
/// the substitution chain may run.
pub struct RelaxBrandPreference;

impl FallbackStrategy for RelaxBrandPreference {
    fn name(&self) -> &'static str {
        "relax_brand_preference"
    }

    fn applies(&self, requirement: &RequirementSpec) -> bool {
        requirement.preferred_brand.is_some() && requirement.client_preference_weight >= 1.0
    }

    fn adjust(&self, requirement: &RequirementSpec) -> RequirementSpec {
        let mut adjusted = requirement.clone();
        adjusted.client_preference_weight = 0.5;
        adjusted
    }

    fn note(&self, requirement: &RequirementSpec, result: &SelectionResult) -> ValidationWarning {
        let requested = requirement.preferred_brand.as_deref().unwrap_or("(none)");
        let substituted = result
            .product
            .as_ref()
            .map(|p| p.brand.as_str())
            .unwrap_or("(none)");

        ValidationWarning::new(
            COMPONENT,
            format!(
                "hard preference for \"{requested}\" could not be met; \
                 relaxed to a soft preference and substituted \"{substituted}\""
            ),
            Severity::Medium,
        )
    }
}

struct Broadening {
    category: &'static str,
    sub_category: &'static str,
    new_sub_category: Option<&'static str>,
    add_keywords: &'static [&'static str],
    description: &'static str,
}

/// Sub-categories that a broader product type can legitimately satisfy.
static BROADENINGS: Lazy<Vec<Broadening>> = Lazy::new(|| {
    vec![Broadening {
        category: "video conferencing",
        sub_category: "ptz camera",
        new_sub_category: None,
        add_keywords: &["camera"],
        description:
            "standalone PTZ camera unavailable; accepting room systems with an integrated camera",
    }]
});

/// Broaden specific hard-to-fill sub-categories to a wider product type.
pub struct BroadenSubCategory;

impl BroadenSubCategory {
    fn lookup(requirement: &RequirementSpec) -> Option<&'static Broadening> {
        let sub = requirement.sub_category.as_deref()?;
        BROADENINGS.iter().find(|b| {
            requirement.category.eq_ignore_ascii_case(b.category)
                && sub.to_lowercase().contains(b.sub_category)
        })
    }
}

impl FallbackStrategy for BroadenSubCategory {
    fn name(&self) -> &'static str {
        "broaden_sub_category"
    }

    fn applies(&self, requirement: &RequirementSpec) -> bool {
        Self::lookup(requirement).is_some()
    }

    fn adjust(&self, requirement: &RequirementSpec) -> RequirementSpec {
        let mut adjusted = requirement.clone();
        if let Some(broadening) = Self::lookup(requirement) {
            adjusted.sub_category = broadening.new_sub_category.map(String::from);
            for keyword in broadening.add_keywords {
                if !adjusted
                    .required_keywords
                    .iter()
                    .any(|k| k.eq_ignore_ascii_case(keyword))
                {
                    adjusted.required_keywords.push((*keyword).to_string());
                }
            }
        }
        adjusted
    }

    fn note(&self, requirement: &RequirementSpec, _result: &SelectionResult) -> ValidationWarning {
        let description = Self::lookup(requirement)
            .map(|b| b.description)
            .unwrap_or("sub-category broadened");

        ValidationWarning::new(COMPONENT, description, Severity::Medium)
    }
}

/// The ordered fallback chain.
pub fn default_strategies() -> Vec<Box<dyn FallbackStrategy>> {
    vec![Box::new(RelaxBrandPreference), Box::new(BroadenSubCategory)]
}

struct HardToSource {
    category: &'static str,
    sub_contains: &'static str,
    alternates: &'static [(&'static str, Option<&'static str>)],
    relaxed_keywords: &'static [&'static str],
}

/// Sub-categories that regularly have no direct catalog rows and a known
/// set of broader categories that can stand in.
static HARD_TO_SOURCE: Lazy<Vec<HardToSource>> = Lazy::new(|| {
    vec![
        HardToSource {
            category: "scheduling",
            sub_contains: "panel",
            alternates: &[
                ("Control Systems", Some("Touch Panel")),
                ("Video Conferencing", Some("Touch Controller")),
            ],
            relaxed_keywords: &["touch", "panel"],
        },
        HardToSource {
            category: "video conferencing",
            sub_contains: "touch controller",
            alternates: &[("Control Systems", Some("Touch Panel"))],
            relaxed_keywords: &["touch", "panel", "controller"],
        },
    ]
});

/// Alternate requirements for the in-pipeline bounded fallback search.
///
/// Strict requirements never cross categories, so they get no alternates.
pub fn hard_to_source_alternates(requirement: &RequirementSpec) -> Vec<RequirementSpec> {
    if requirement.strict_category_match {
        return Vec::new();
    }
    let sub = match &requirement.sub_category {
        Some(sub) => sub.to_lowercase(),
        None => return Vec::new(),
    };

    let Some(entry) = HARD_TO_SOURCE.iter().find(|h| {
        requirement.category.eq_ignore_ascii_case(h.category) && sub.contains(h.sub_contains)
    }) else {
        return Vec::new();
    };

    entry
        .alternates
        .iter()
        .map(|(category, new_sub)| {
            let mut alternate = requirement.clone();
            alternate.category = (*category).to_string();
            alternate.sub_category = new_sub.map(String::from);
            alternate.required_keywords = entry
                .relaxed_keywords
                .iter()
                .map(|k| (*k).to_string())
                .collect();
            alternate
        })
        .collect()
}
