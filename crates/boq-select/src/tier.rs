//! Deterministic percentile-based budget tier selection.
//!
//! The percentile thresholds are preserved verbatim from the legacy
//! heuristic. They are unvalidated; changing them changes every quote, so
//! they stay exactly as shipped until product sign-off says otherwise.

use boq_core::{BudgetTier, CatalogEntry};

/// Percentile window of the price-sorted candidate list, as fractions.
fn percentile_range(tier: BudgetTier) -> (f64, f64) {
    match tier {
        BudgetTier::Economy => (0.0, 0.40),
        BudgetTier::Standard => (0.25, 0.75),
        BudgetTier::Premium | BudgetTier::Enterprise | BudgetTier::Executive => (0.75, 1.0),
    }
}

/// Percentile-based picker over a price-sorted candidate list.
pub struct BudgetTierSelector;

impl BudgetTierSelector {
    /// Pick exactly one candidate for the tier.
    ///
    /// Candidates are stable-sorted by price ascending with catalog order
    /// breaking ties, the tier's percentile window is sliced out (widened
    /// to at least one element), and the slice midpoint is returned. A
    /// degenerate empty slice falls back to the full sorted list. The
    /// result is fully deterministic for a fixed catalog, which quotes
    /// require for reproducibility.
    pub fn pick<'a>(candidates: &[CatalogEntry<'a>], tier: BudgetTier) -> Option<CatalogEntry<'a>> {
        if candidates.is_empty() {
            return None;
        }

        let mut sorted = candidates.to_vec();
        sorted.sort_by(|a, b| {
            a.product
                .price
                .cmp(&b.product.price)
                .then(a.index.cmp(&b.index))
        });

        let n = sorted.len();
        let (lo, hi) = percentile_range(tier);
        let start = ((n as f64) * lo).floor() as usize;
        let end = (((n as f64) * hi).floor() as usize)
            .max(start + 1)
            .min(n);

        let slice = if start < end {
            &sorted[start..end]
        } else {
            &sorted[..]
        };

        Some(slice[slice.len() / 2])
    }
}
