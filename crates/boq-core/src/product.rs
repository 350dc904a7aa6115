//! Product records and budget tiers

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single catalog product. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Stable catalog identifier
    pub id: String,
    /// Manufacturer brand (e.g. "Poly", "Crestron")
    pub brand: String,
    /// Normalized top-level category (e.g. "Displays")
    pub category: String,
    /// Optional sub-category (e.g. "Display Mount / Cart")
    #[serde(default)]
    pub sub_category: Option<String>,
    /// Product name
    pub name: String,
    /// Free-text description folded in for keyword matching
    #[serde(default)]
    pub description: String,
    /// Unit price. Non-negative; enforced at catalog load.
    pub price: Decimal,
}

impl ProductRecord {
    pub fn new(
        id: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            category: category.into(),
            sub_category: None,
            name: name.into(),
            description: String::new(),
            price,
        }
    }

    pub fn with_sub_category(mut self, sub: impl Into<String>) -> Self {
        self.sub_category = Some(sub.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Combined name + description text used for keyword matching.
    pub fn text(&self) -> String {
        if self.description.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.description)
        }
    }
}

impl fmt::Display for ProductRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (${})", self.brand, self.name, self.price)
    }
}

/// Coarse cost-positioning label driving percentile-based price selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Economy,
    Standard,
    Premium,
    Enterprise,
    Executive,
}

impl BudgetTier {
    /// Get tier by label; unrecognized labels fall back to Standard.
    pub fn for_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "economy" | "budget" => BudgetTier::Economy,
            "standard" => BudgetTier::Standard,
            "premium" => BudgetTier::Premium,
            "enterprise" => BudgetTier::Enterprise,
            "executive" => BudgetTier::Executive,
            _ => BudgetTier::Standard,
        }
    }
}

impl Default for BudgetTier {
    fn default() -> Self {
        BudgetTier::Standard
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetTier::Economy => write!(f, "Economy"),
            BudgetTier::Standard => write!(f, "Standard"),
            BudgetTier::Premium => write!(f, "Premium"),
            BudgetTier::Enterprise => write!(f, "Enterprise"),
            BudgetTier::Executive => write!(f, "Executive"),
        }
    }
}
