//! Requirement specs produced by the external room-sizing component
//!
//! A `RequirementSpec` is one abstract slot to fill with exactly one
//! catalog product. The engine consumes these read-only; the numeric
//! targets (display size, counts) are computed upstream.

use crate::product::BudgetTier;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a product must be mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountingType {
    Wall,
    Ceiling,
    Floor,
    Desk,
}

impl MountingType {
    /// Keyword the product text is expected to carry.
    pub fn keyword(&self) -> &'static str {
        match self {
            MountingType::Wall => "wall",
            MountingType::Ceiling => "ceiling",
            MountingType::Floor => "floor",
            MountingType::Desk => "desk",
        }
    }
}

/// One abstract requirement to satisfy with exactly one catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementSpec {
    pub category: String,

    #[serde(default)]
    pub sub_category: Option<String>,

    /// Number of units; re-attached by the caller after selection
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Processing order within a run; lower runs first
    #[serde(default)]
    pub priority: u32,

    /// At least one must appear in the chosen product's text
    #[serde(default)]
    pub required_keywords: Vec<String>,

    /// None may appear in the chosen product's text
    #[serde(default)]
    pub blacklist_keywords: Vec<String>,

    #[serde(default)]
    pub min_price: Option<Decimal>,

    #[serde(default)]
    pub max_price: Option<Decimal>,

    /// Target size in diagonal units (inches for displays/mount capacity)
    #[serde(default)]
    pub size_requirement: Option<u32>,

    #[serde(default)]
    pub mounting_type: Option<MountingType>,

    /// Free-form compatibility notes carried through to the audit trail
    #[serde(default)]
    pub compatibility_requirements: Vec<String>,

    /// Client's preferred brand, if any
    #[serde(default)]
    pub preferred_brand: Option<String>,

    /// 1.0 = hard brand requirement, (0, 1) = soft preference with
    /// ecosystem substitution allowed, 0.0 = no preference
    #[serde(default)]
    pub client_preference_weight: f64,

    /// When set, the chosen product's category must equal this
    /// requirement's category exactly
    #[serde(default)]
    pub strict_category_match: bool,

    #[serde(default)]
    pub budget_tier: BudgetTier,
}

fn default_quantity() -> u32 {
    1
}

impl RequirementSpec {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            sub_category: None,
            quantity: 1,
            priority: 0,
            required_keywords: Vec::new(),
            blacklist_keywords: Vec::new(),
            min_price: None,
            max_price: None,
            size_requirement: None,
            mounting_type: None,
            compatibility_requirements: Vec::new(),
            preferred_brand: None,
            client_preference_weight: 0.0,
            strict_category_match: false,
            budget_tier: BudgetTier::Standard,
        }
    }

    pub fn with_sub_category(mut self, sub: impl Into<String>) -> Self {
        self.sub_category = Some(sub.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn require_keywords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_keywords = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn blacklist<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist_keywords = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_min_price(mut self, min: Decimal) -> Self {
        self.min_price = Some(min);
        self
    }

    pub fn with_max_price(mut self, max: Decimal) -> Self {
        self.max_price = Some(max);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size_requirement = Some(size);
        self
    }

    pub fn with_mounting(mut self, mounting: MountingType) -> Self {
        self.mounting_type = Some(mounting);
        self
    }

    /// Set the preferred brand with its preference weight (clamped to [0, 1]).
    pub fn prefer_brand(mut self, brand: impl Into<String>, weight: f64) -> Self {
        self.preferred_brand = Some(brand.into());
        self.client_preference_weight = weight.clamp(0.0, 1.0);
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_category_match = true;
        self
    }

    pub fn with_tier(mut self, tier: BudgetTier) -> Self {
        self.budget_tier = tier;
        self
    }

    /// A short label for trace lines: "Audio / Wireless Microphone System".
    pub fn label(&self) -> String {
        match &self.sub_category {
            Some(sub) => format!("{} / {}", self.category, sub),
            None => self.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let req = RequirementSpec::new("Displays")
            .with_sub_category("Interactive Display")
            .with_quantity(2)
            .with_priority(5)
            .require_keywords(["display", "touch"])
            .blacklist(["mount"])
            .with_size(75)
            .prefer_brand("Samsung", 1.0)
            .strict()
            .with_tier(BudgetTier::Premium);

        assert_eq!(req.quantity, 2);
        assert_eq!(req.required_keywords.len(), 2);
        assert_eq!(req.preferred_brand.as_deref(), Some("Samsung"));
        assert!(req.strict_category_match);
        assert_eq!(req.label(), "Displays / Interactive Display");
    }

    #[test]
    fn test_preference_weight_clamped() {
        let req = RequirementSpec::new("Audio").prefer_brand("Shure", 3.0);
        assert_eq!(req.client_preference_weight, 1.0);
    }

    #[test]
    fn test_deserialize_defaults() {
        let req: RequirementSpec =
            serde_json::from_str(r#"{"category": "Displays"}"#).unwrap();

        assert_eq!(req.quantity, 1);
        assert_eq!(req.budget_tier, BudgetTier::Standard);
        assert!(!req.strict_category_match);
        assert!(req.required_keywords.is_empty());
    }
}
