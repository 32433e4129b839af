//! Declarative triage rule table
//!
//! The rule set is plain data: an ordered list of predicates with a tier
//! and a rationale, serde-loadable from JSON so clinical reviewers can
//! version it independently of the matching engine. The compiled-in
//! default mirrors the deployed flag tables.

use crate::error::{TriageError, TriageResult};
use crate::tier::Tier;
use crate::vitals::Vitals;
use serde::{Deserialize, Serialize};

/// A single predicate over normalized text and numeric vitals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Any of the listed phrases appears in the lowercased text
    KeywordAny { keywords: Vec<String> },
    /// Reported severity is at least `min` (0-10 scale)
    SeverityAtLeast { min: u8 },
    /// Reported severity falls in `min..=max`
    SeverityInRange { min: u8, max: u8 },
    /// Temperature is at least `min_f` degrees Fahrenheit
    TemperatureAtLeast { min_f: f64 },
    /// Temperature falls in `min_f..=max_f`
    TemperatureInRange { min_f: f64, max_f: f64 },
    /// Blood glucose exceeds `above` mg/dL
    GlucoseAbove { above: f64 },
}

impl Predicate {
    pub fn matches(&self, text_lower: &str, vitals: &Vitals) -> bool {
        match self {
            Self::KeywordAny { keywords } => keywords.iter().any(|k| text_lower.contains(k.as_str())),
            Self::SeverityAtLeast { min } => vitals.severity.is_some_and(|s| s >= *min),
            Self::SeverityInRange { min, max } => {
                vitals.severity.is_some_and(|s| (*min..=*max).contains(&s))
            }
            Self::TemperatureAtLeast { min_f } => {
                vitals.temperature_f.is_some_and(|t| t >= *min_f)
            }
            Self::TemperatureInRange { min_f, max_f } => vitals
                .temperature_f
                .is_some_and(|t| t >= *min_f && t <= *max_f),
            Self::GlucoseAbove { above } => vitals.glucose.is_some_and(|g| g > *above),
        }
    }
}

/// One triage rule: predicate, tier, and the rationale attached to any
/// verdict it produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageRule {
    pub id: String,
    pub tier: Tier,
    pub predicate: Predicate,
    pub rationale: String,
}

/// Versioned, ordered rule table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub version: u32,
    pub rules: Vec<TriageRule>,
}

impl RuleSet {
    /// Load a rule set from a JSON document.
    pub fn from_json(json: &str) -> TriageResult<Self> {
        let set: Self = serde_json::from_str(json)?;
        if set.rules.is_empty() {
            return Err(TriageError::Config("rule set contains no rules".into()));
        }
        Ok(set)
    }

    /// Load a rule set from a JSON file on disk.
    pub fn from_file(path: &std::path::Path) -> TriageResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Rules of a given tier, in table order.
    pub fn rules_for(&self, tier: Tier) -> impl Iterator<Item = &TriageRule> {
        self.rules.iter().filter(move |r| r.tier == tier)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        let rule = |id: &str, tier: Tier, predicate: Predicate, rationale: &str| TriageRule {
            id: id.to_string(),
            tier,
            predicate,
            rationale: rationale.to_string(),
        };
        let keywords = |words: &[&str]| Predicate::KeywordAny {
            keywords: words.iter().map(ToString::to_string).collect(),
        };

        Self {
            version: 1,
            rules: vec![
                // RED
                rule(
                    "chest_pain",
                    Tier::Red,
                    keywords(&[
                        "chest pain",
                        "pain in my chest",
                        "chest tightness",
                        "tightness in my chest",
                    ]),
                    "chest pain or tightness reported",
                ),
                rule(
                    "breathing_difficulty",
                    Tier::Red,
                    keywords(&[
                        "shortness of breath",
                        "short of breath",
                        "trouble breathing",
                        "difficulty breathing",
                        "breathless",
                    ]),
                    "breathing difficulty reported",
                ),
                rule(
                    "neuro_deficit",
                    Tier::Red,
                    keywords(&["numbness", "slurred speech", "weakness"]),
                    "possible neurological deficit",
                ),
                rule(
                    "syncope",
                    Tier::Red,
                    keywords(&["fainted", "passed out", "syncope"]),
                    "loss of consciousness reported",
                ),
                rule(
                    "wound_dehiscence",
                    Tier::Red,
                    keywords(&[
                        "incision opening",
                        "wound opening",
                        "dehiscence",
                        "yellow drainage",
                        "green drainage",
                        "greenish fluid",
                        "pus",
                        "ooze",
                    ]),
                    "surgical wound opening or drainage",
                ),
                rule(
                    "severe_pain",
                    Tier::Red,
                    Predicate::SeverityAtLeast { min: 8 },
                    "severity 8 or higher on the 0-10 scale",
                ),
                rule(
                    "fever_high",
                    Tier::Red,
                    Predicate::TemperatureAtLeast { min_f: 101.5 },
                    "temperature at or above 101.5F",
                ),
                // ORANGE
                rule(
                    "moderate_pain",
                    Tier::Orange,
                    Predicate::SeverityInRange { min: 5, max: 7 },
                    "severity between 5 and 7 on the 0-10 scale",
                ),
                rule(
                    "fever_low",
                    Tier::Orange,
                    Predicate::TemperatureInRange {
                        min_f: 99.5,
                        max_f: 101.4,
                    },
                    "low-grade fever between 99.5F and 101.4F",
                ),
                rule(
                    "hyperglycemia",
                    Tier::Orange,
                    Predicate::GlucoseAbove { above: 300.0 },
                    "blood glucose above 300 mg/dL",
                ),
                rule(
                    "dizziness",
                    Tier::Orange,
                    keywords(&["dizzy", "dizziness", "lightheaded"]),
                    "dizziness reported",
                ),
                rule(
                    "wound_redness",
                    Tier::Orange,
                    keywords(&["redness", "swelling", "warm to the touch"]),
                    "mild wound redness or swelling",
                ),
            ],
        }
    }
}
