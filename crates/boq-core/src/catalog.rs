//! In-memory catalog snapshot
//!
//! Loaded once per run. Pre-computes the normalized match text for every
//! record so keyword filters never re-normalize inside the per-requirement
//! selection loop.

use crate::error::EngineError;
use crate::product::ProductRecord;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Read-only product snapshot for one blueprint resolution.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    products: Vec<ProductRecord>,
    match_text: Vec<String>,
}

/// A borrowed catalog record plus its pre-computed match text.
///
/// `index` is the original catalog position, used as the deterministic
/// tie-break wherever candidates compare equal.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry<'a> {
    pub product: &'a ProductRecord,
    pub text: &'a str,
    pub index: usize,
}

impl CatalogStore {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        let match_text = products
            .iter()
            .map(|p| boq_match::normalize(&p.text()))
            .collect();
        Self {
            products,
            match_text,
        }
    }

    /// Load from a JSON array of product records.
    ///
    /// Rejects negative prices; a zero price is allowed (bundle items).
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let products: Vec<ProductRecord> = serde_json::from_str(json)
            .map_err(|e| EngineError::Catalog(format!("invalid catalog JSON: {e}")))?;

        if let Some(bad) = products.iter().find(|p| p.price < Decimal::ZERO) {
            return Err(EngineError::Catalog(format!(
                "negative price on product {}",
                bad.id
            )));
        }

        Ok(Self::new(products))
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// All records as entries, in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.products
            .iter()
            .zip(self.match_text.iter())
            .enumerate()
            .map(|(index, (product, text))| CatalogEntry {
                product,
                text,
                index,
            })
    }

    /// Records in the given category (case-insensitive), in catalog order.
    pub fn in_category(&self, category: &str) -> Vec<CatalogEntry<'_>> {
        self.entries()
            .filter(|e| e.product.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Distinct brands present in the snapshot, sorted.
    pub fn brands(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.products.iter().map(|p| p.brand.as_str()).collect();
        set.into_iter().collect()
    }

    /// Distinct categories present in the snapshot, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.products.iter().map(|p| p.category.as_str()).collect();
        set.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CatalogStore {
        CatalogStore::new(vec![
            ProductRecord::new("d1", "Samsung", "Displays", "QM65R", Decimal::from(1800))
                .with_description("65\" 4K commercial display"),
            ProductRecord::new("d2", "LG", "Displays", "UH5F-H", Decimal::from(1500)),
            ProductRecord::new("m1", "Chief", "Mounts", "LTM1U TV wall mount", Decimal::from(180)),
        ])
    }

    #[test]
    fn test_match_text_is_normalized() {
        let catalog = sample();
        let entry = catalog.entries().next().unwrap();
        assert_eq!(entry.text, "qm65r 65\" 4k commercial display");
    }

    #[test]
    fn test_in_category_is_case_insensitive() {
        let catalog = sample();
        assert_eq!(catalog.in_category("displays").len(), 2);
        assert_eq!(catalog.in_category("MOUNTS").len(), 1);
        assert!(catalog.in_category("Audio").is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": "d1", "brand": "LG", "category": "Displays", "name": "UH5F 65in", "price": 1500},
            {"id": "m1", "brand": "Chief", "category": "Mounts", "sub_category": "Display Mount / Cart", "name": "TV wall mount", "price": 180}
        ]"#;

        let catalog = CatalogStore::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.products()[1].sub_category.as_deref(),
            Some("Display Mount / Cart")
        );
    }

    #[test]
    fn test_from_json_rejects_negative_price() {
        let json = r#"[
            {"id": "d1", "brand": "LG", "category": "Displays", "name": "UH5F", "price": -5}
        ]"#;

        let err = CatalogStore::from_json(json).unwrap_err();
        assert!(err.to_string().starts_with("CATALOG/"));
    }

    #[test]
    fn test_brand_and_category_listing() {
        let catalog = sample();
        assert_eq!(catalog.brands(), vec!["Chief", "LG", "Samsung"]);
        assert_eq!(catalog.categories(), vec!["Displays", "Mounts"]);
    }
}
