//! Ecosystem groups and quality scoring.
//!
//! Categories whose products interact at runtime (codec + microphone,
//! control processor + touch panel) should stay within one brand family
//! when the catalog allows it.

use boq_core::CatalogEntry;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Groups of categories that form one interacting ecosystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EcosystemMap {
    pub groups: Vec<Vec<String>>,
}

impl EcosystemMap {
    pub fn new(groups: Vec<Vec<String>>) -> Self {
        Self { groups }
    }

    pub fn defaults() -> Self {
        Self::new(vec![
            vec![
                "Video Conferencing".to_string(),
                "Audio".to_string(),
            ],
            vec![
                "Control Systems".to_string(),
                "Scheduling".to_string(),
            ],
        ])
    }

    /// All categories sharing a group with `category`, the category
    /// itself included. Categories outside every group relate only to
    /// themselves.
    pub fn related<'a>(&'a self, category: &'a str) -> Vec<&'a str> {
        let mut related: Vec<&str> = vec![category];
        for group in &self.groups {
            if group.iter().any(|c| c.eq_ignore_ascii_case(category)) {
                for member in group {
                    if !related.iter().any(|r| r.eq_ignore_ascii_case(member)) {
                        related.push(member.as_str());
                    }
                }
            }
        }
        related
    }
}

/// Brands positioned as premium professional lines.
static TIER_ONE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "crestron", "cisco", "shure", "biamp", "qsc", "extron", "sony", "christie", "barco",
    ]
    .into_iter()
    .collect()
});

/// Established mainstream professional brands.
static TIER_TWO: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "poly", "logitech", "samsung", "lg", "nec", "sharp", "sennheiser", "yealink", "neat",
        "amx", "jbl", "bose", "chief", "peerless-av", "epson", "panasonic",
    ]
    .into_iter()
    .collect()
});

/// Deterministic quality score used for the last-resort brand pick.
///
/// Brand tier dominates; professional-grade text cues break brand ties.
/// Candidates with equal scores keep catalog order.
pub fn quality_score(entry: &CatalogEntry<'_>) -> u32 {
    let brand = entry.product.brand.to_lowercase();
    let mut score = if TIER_ONE.contains(brand.as_str()) {
        30
    } else if TIER_TWO.contains(brand.as_str()) {
        20
    } else {
        10
    };

    for cue in ["professional", "commercial", "enterprise", "pro-grade"] {
        if entry.text.contains(cue) {
            score += 1;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use boq_core::ProductRecord;
    use rust_decimal::Decimal;

    #[test]
    fn test_related_includes_group_members() {
        let map = EcosystemMap::defaults();
        let related = map.related("Video Conferencing");

        assert!(related.iter().any(|c| c.eq_ignore_ascii_case("audio")));
        assert!(related
            .iter()
            .any(|c| c.eq_ignore_ascii_case("video conferencing")));
    }

    #[test]
    fn test_ungrouped_category_relates_to_itself() {
        let map = EcosystemMap::defaults();
        assert_eq!(map.related("Mounts"), vec!["Mounts"]);
    }

    #[test]
    fn test_quality_score_prefers_tier_one() {
        let crestron =
            ProductRecord::new("c", "Crestron", "Control Systems", "CP4", Decimal::from(3000));
        let generic =
            ProductRecord::new("g", "Acme", "Control Systems", "CTRL-1", Decimal::from(3000));

        let e1 = CatalogEntry {
            product: &crestron,
            text: "cp4 control processor",
            index: 0,
        };
        let e2 = CatalogEntry {
            product: &generic,
            text: "ctrl-1 control processor",
            index: 1,
        };

        assert!(quality_score(&e1) > quality_score(&e2));
    }

    #[test]
    fn test_professional_cue_breaks_brand_tie() {
        let a = ProductRecord::new("a", "Acme", "Displays", "A1", Decimal::from(900));
        let b = ProductRecord::new("b", "Acme", "Displays", "B1", Decimal::from(900));

        let plain = CatalogEntry {
            product: &a,
            text: "a1 display",
            index: 0,
        };
        let pro = CatalogEntry {
            product: &b,
            text: "b1 commercial display",
            index: 1,
        };

        assert!(quality_score(&pro) > quality_score(&plain));
    }
}
