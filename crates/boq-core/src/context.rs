//! Per-run audit context
//!
//! One `RunContext` is owned by a single calling thread for the duration
//! of one blueprint resolution and discarded afterwards. Warning order is
//! chronological and part of the observable contract, so a context must
//! never be shared across concurrent resolutions.

use crate::warning::{SelectionResult, Severity, ValidationWarning};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use uuid::Uuid;

/// One timestamped trace line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub ts: DateTime<Utc>,
    pub stage: String,
    pub message: String,
}

/// Mutable accumulator for a single blueprint resolution.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    results: Vec<SelectionResult>,
    warnings: Vec<ValidationWarning>,
    trace: Vec<TraceEntry>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            results: Vec::new(),
            warnings: Vec::new(),
            trace: Vec::new(),
        }
    }

    /// Record a finished selection result.
    ///
    /// The result's warnings are appended to the run-wide list so the
    /// chronological audit trail stays complete.
    pub fn record(&mut self, result: SelectionResult) {
        self.warnings.extend(result.warnings.iter().cloned());
        self.results.push(result);
    }

    /// Append a human-readable trace line.
    pub fn trace(&mut self, stage: &str, message: impl Into<String>) {
        self.trace.push(TraceEntry {
            ts: Utc::now(),
            stage: stage.to_string(),
            message: message.into(),
        });
    }

    pub fn results(&self) -> &[SelectionResult] {
        &self.results
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn warnings_with_severity(&self, severity: Severity) -> Vec<&ValidationWarning> {
        self.warnings
            .iter()
            .filter(|w| w.severity == severity)
            .collect()
    }

    /// Brand already chosen in this run for `category`, if any.
    pub fn selected_brand_for(&self, category: &str) -> Option<&str> {
        self.results.iter().find_map(|r| {
            r.product
                .as_ref()
                .filter(|p| p.category.eq_ignore_ascii_case(category))
                .map(|p| p.brand.as_str())
        })
    }

    /// Brands of all products already chosen for the given categories,
    /// in selection order, without duplicates.
    pub fn selected_brands_for(&self, categories: &[&str]) -> Vec<&str> {
        let mut brands: Vec<&str> = Vec::new();
        for result in &self.results {
            if let Some(product) = &result.product {
                let related = categories
                    .iter()
                    .any(|c| product.category.eq_ignore_ascii_case(c));
                if related && !brands.contains(&product.brand.as_str()) {
                    brands.push(product.brand.as_str());
                }
            }
        }
        brands
    }

    /// Aggregate counters for the run so far.
    pub fn stats(&self) -> RunStats {
        let requirements = self.results.len();
        let matched = self.results.iter().filter(|r| r.is_matched()).count();
        let critical = self
            .warnings
            .iter()
            .filter(|w| w.severity == Severity::Critical)
            .count();
        let high = self
            .warnings
            .iter()
            .filter(|w| w.severity == Severity::High)
            .count();

        RunStats {
            requirements,
            matched,
            unmatched: requirements - matched,
            warnings: self.warnings.len(),
            critical,
            high,
            match_rate: if requirements > 0 {
                matched as f64 / requirements as f64
            } else {
                0.0
            },
        }
    }

    /// Plain-text audit render: one line per trace entry, for humans.
    ///
    /// Not intended for machine parsing.
    pub fn trace_log(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "run {} started {}", self.run_id, self.started_at);
        for entry in &self.trace {
            let _ = writeln!(
                out,
                "[{}] {}: {}",
                entry.ts.format("%H:%M:%S%.3f"),
                entry.stage,
                entry.message
            );
        }
        out
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub requirements: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub warnings: usize,
    pub critical: usize,
    pub high: usize,
    pub match_rate: f64,
}
