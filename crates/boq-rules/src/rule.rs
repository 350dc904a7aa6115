//! Per-category validation rules.
//!
//! The registry holds parent rules per category plus optional sub-category
//! rules. Must-contain lists use at-least-one semantics (a display says
//! "display" or "monitor", never both); must-not-contain lists reject on
//! any hit and are never overridable.

use boq_core::EngineError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keyword and price constraints for one (category, optional sub-category).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationRule {
    /// At least one must appear in the product text
    #[serde(default)]
    pub must_contain: Vec<String>,

    /// None may appear in the product text
    #[serde(default)]
    pub must_not_contain: Vec<String>,

    /// Sanity bounds for the category itself, not the requirement budget
    #[serde(default)]
    pub price_range: Option<(Decimal, Decimal)>,

    /// When set on a sub-category rule, the parent's must-contain check is
    /// skipped. Controller/panel sub-categories legitimately omit the
    /// parent category's generic terms. The parent's must-not-contain
    /// check is still enforced.
    #[serde(default)]
    pub override_parent: bool,
}

impl ValidationRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.must_contain = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn forbids<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.must_not_contain = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn priced(mut self, min: impl Into<Decimal>, max: impl Into<Decimal>) -> Self {
        self.price_range = Some((min.into(), max.into()));
        self
    }

    pub fn overrides_parent(mut self) -> Self {
        self.override_parent = true;
        self
    }
}

/// Registry of parent and sub-category rules, keyed lowercased.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRuleSet {
    #[serde(default)]
    pub categories: HashMap<String, ValidationRule>,

    /// category -> sub-category -> rule
    #[serde(default)]
    pub sub_categories: HashMap<String, HashMap<String, ValidationRule>>,
}

impl CategoryRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, category: &str, rule: ValidationRule) -> Self {
        self.categories.insert(category.to_lowercase(), rule);
        self
    }

    pub fn sub_rule(mut self, category: &str, sub: &str, rule: ValidationRule) -> Self {
        self.sub_categories
            .entry(category.to_lowercase())
            .or_default()
            .insert(sub.to_lowercase(), rule);
        self
    }

    pub fn category_rule(&self, category: &str) -> Option<&ValidationRule> {
        self.categories.get(&category.to_lowercase())
    }

    pub fn sub_category_rule(&self, category: &str, sub: &str) -> Option<&ValidationRule> {
        self.sub_categories
            .get(&category.to_lowercase())
            .and_then(|subs| subs.get(&sub.to_lowercase()))
    }

    /// Load a rule set from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, EngineError> {
        let mut parsed: CategoryRuleSet = serde_yaml::from_str(yaml)
            .map_err(|e| EngineError::Config(format!("invalid rule YAML: {e}")))?;

        // Re-key lowercased so lookups stay case-insensitive.
        parsed.categories = parsed
            .categories
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        parsed.sub_categories = parsed
            .sub_categories
            .into_iter()
            .map(|(k, subs)| {
                (
                    k.to_lowercase(),
                    subs.into_iter()
                        .map(|(s, v)| (s.to_lowercase(), v))
                        .collect(),
                )
            })
            .collect();

        Ok(parsed)
    }

    /// The built-in rule table for the AV catalog domain.
    pub fn default_rules() -> Self {
        CategoryRuleSet::new()
            .rule(
                "Displays",
                ValidationRule::new()
                    .contains(["display", "monitor", "screen", "projector", "signage", "video wall"])
                    .forbids(["mount", "bracket", "warranty", "camera", "microphone"])
                    .priced(150, 40_000),
            )
            .sub_rule(
                "Displays",
                "Interactive Display",
                ValidationRule::new().contains(["touch", "interactive"]),
            )
            .sub_rule(
                "Displays",
                "Video Wall",
                ValidationRule::new().contains(["video wall", "videowall"]),
            )
            .rule(
                "Mounts",
                ValidationRule::new()
                    .contains(["mount", "bracket", "stand", "cart", "trolley"])
                    .forbids(["warranty", "service plan"])
                    .priced(15, 4_000),
            )
            .sub_rule(
                "Mounts",
                "Display Mount / Cart",
                ValidationRule::new()
                    .forbids(["camera", "webcam", "microphone", "mic", "speaker", "touch"]),
            )
            .sub_rule(
                "Mounts",
                "Camera Mount",
                ValidationRule::new().contains(["camera"]),
            )
            .rule(
                "Video Conferencing",
                ValidationRule::new()
                    .contains(["video", "conferenc", "codec", "camera", "bar", "room kit"])
                    .forbids(["warranty"])
                    .priced(100, 60_000),
            )
            .sub_rule(
                "Video Conferencing",
                "Video Bar",
                ValidationRule::new().contains(["bar", "all-in-one"]),
            )
            .sub_rule(
                "Video Conferencing",
                "PTZ Camera",
                ValidationRule::new().contains(["ptz"]),
            )
            .sub_rule(
                "Video Conferencing",
                "Room Kit",
                ValidationRule::new().contains(["kit", "codec", "room system"]),
            )
            .sub_rule(
                "Video Conferencing",
                "Touch Controller",
                ValidationRule::new()
                    .contains(["touch", "controller"])
                    .overrides_parent(),
            )
            .rule(
                "Audio",
                ValidationRule::new()
                    .contains([
                        "audio",
                        "speaker",
                        "microphone",
                        "mic",
                        "soundbar",
                        "sound bar",
                        "amplifier",
                        "dsp",
                        "mixer",
                    ])
                    .forbids(["warranty"])
                    .priced(30, 30_000),
            )
            .sub_rule(
                "Audio",
                "DSP / Audio Processor / Mixer",
                ValidationRule::new()
                    .contains(["dsp", "processor", "mixer"])
                    .priced(400, 20_000),
            )
            .sub_rule(
                "Audio",
                "Wireless Microphone System",
                ValidationRule::new().contains(["wireless"]),
            )
            .sub_rule(
                "Audio",
                "Loudspeaker",
                ValidationRule::new().contains(["speaker"]),
            )
            .rule(
                "Control Systems",
                ValidationRule::new()
                    .contains(["control", "processor", "keypad", "automation"])
                    .forbids(["warranty"])
                    .priced(100, 30_000),
            )
            .sub_rule(
                "Control Systems",
                "Touch Panel",
                ValidationRule::new()
                    .contains(["touch", "panel"])
                    .overrides_parent(),
            )
            .sub_rule(
                "Control Systems",
                "Control Processor",
                ValidationRule::new().contains(["processor", "controller"]),
            )
            .rule(
                "Scheduling",
                ValidationRule::new()
                    .contains(["schedul", "booking", "calendar"])
                    .priced(150, 5_000),
            )
            .sub_rule(
                "Scheduling",
                "Scheduling Panel",
                ValidationRule::new().contains(["panel", "touch", "display"]),
            )
            .rule(
                "Cables & Connectivity",
                ValidationRule::new()
                    .contains(["cable", "hdmi", "usb", "extender", "adapter", "switcher", "matrix"])
                    .priced(5, 8_000),
            )
            .rule(
                "Accessories",
                ValidationRule::new().forbids(["warranty"]).priced(5, 10_000),
            )
            .rule(
                "Services",
                ValidationRule::new().contains([
                    "service",
                    "installation",
                    "support",
                    "training",
                    "commissioning",
                    "warranty",
                ]),
            )
    }
}
