//! Brand substitution table.
//!
//! Ordered equivalent-tier substitutes per (category, preferred brand).
//! Order matters: the resolver walks the list and takes the first brand
//! with catalog presence.

use boq_core::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// category (lowercased) -> preferred brand (lowercased) -> substitutes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubstitutionTable {
    #[serde(default)]
    pub entries: HashMap<String, HashMap<String, Vec<String>>>,
}

impl SubstitutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, category: &str, brand: &str, substitutes: &[&str]) -> Self {
        self.entries
            .entry(category.to_lowercase())
            .or_default()
            .insert(
                brand.to_lowercase(),
                substitutes.iter().map(|s| s.to_string()).collect(),
            );
        self
    }

    /// Ordered substitutes for a (category, brand) pair; empty when the
    /// table has no entry.
    pub fn substitutes(&self, category: &str, brand: &str) -> &[String] {
        self.entries
            .get(&category.to_lowercase())
            .and_then(|brands| brands.get(&brand.to_lowercase()))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Load a substitution table from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, EngineError> {
        let parsed: SubstitutionTable = serde_yaml::from_str(yaml)
            .map_err(|e| EngineError::Config(format!("invalid substitution YAML: {e}")))?;

        let entries = parsed
            .entries
            .into_iter()
            .map(|(category, brands)| {
                (
                    category.to_lowercase(),
                    brands
                        .into_iter()
                        .map(|(brand, subs)| (brand.to_lowercase(), subs))
                        .collect(),
                )
            })
            .collect();

        Ok(Self { entries })
    }

    /// The built-in substitution table for the AV brand landscape.
    pub fn defaults() -> Self {
        SubstitutionTable::new()
            .with_entry("Control Systems", "Crestron", &["Extron", "AMX", "QSC"])
            .with_entry("Control Systems", "Extron", &["Crestron", "AMX"])
            .with_entry("Control Systems", "AMX", &["Crestron", "Extron"])
            .with_entry("Video Conferencing", "Poly", &["Logitech", "Yealink", "Neat"])
            .with_entry("Video Conferencing", "Cisco", &["Poly", "Logitech"])
            .with_entry("Video Conferencing", "Logitech", &["Poly", "Yealink"])
            .with_entry("Video Conferencing", "Neat", &["Poly", "Logitech"])
            .with_entry("Audio", "Shure", &["Sennheiser", "Biamp", "Audio-Technica"])
            .with_entry("Audio", "Sennheiser", &["Shure", "Audio-Technica"])
            .with_entry("Audio", "Biamp", &["QSC", "Shure"])
            .with_entry("Audio", "Bose", &["JBL", "QSC"])
            .with_entry("Displays", "Samsung", &["LG", "NEC", "Sharp"])
            .with_entry("Displays", "LG", &["Samsung", "Philips"])
            .with_entry("Displays", "NEC", &["Samsung", "LG"])
            .with_entry("Scheduling", "Crestron", &["Logitech", "Evoko"])
            .with_entry("Mounts", "Chief", &["Peerless-AV", "Ergotron"])
    }
}
