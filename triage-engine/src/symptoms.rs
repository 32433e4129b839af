//! Symptom codebook for triage normalization
//!
//! Maps free-text symptom phrases to canonical terms and SNOMED CT codes
//! so recurrence checks and caregiver trend reports compare like with
//! like. Phrase patterns are ordered longest-first within each entry so
//! "tightness in my chest" is recognized before the bare word would be.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One codebook entry
pub struct SymptomCode {
    pub canonical: &'static str,
    pub snomed: &'static str,
    pub patterns: &'static [&'static str],
}

/// A symptom phrase resolved against the codebook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSymptom {
    pub canonical: String,
    pub snomed: String,
}

/// A prior symptom report, as returned by the external store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomReport {
    pub symptom: String,
    pub severity: Option<u8>,
    pub reported_at: DateTime<Utc>,
}

/// Standard symptom codebook
pub const CODEBOOK: &[SymptomCode] = &[
    SymptomCode {
        canonical: "chest tightness",
        snomed: "SNOMED:23924001",
        patterns: &["tightness in my chest", "chest tightness"],
    },
    SymptomCode {
        canonical: "chest pain",
        snomed: "SNOMED:29857009",
        patterns: &["pain in my chest", "chest pain"],
    },
    SymptomCode {
        canonical: "breathing difficulty",
        snomed: "SNOMED:267036007",
        patterns: &[
            "shortness of breath",
            "short of breath",
            "trouble breathing",
            "difficulty breathing",
            "breathless",
        ],
    },
    SymptomCode {
        canonical: "wound drainage",
        snomed: "SNOMED:284546000",
        patterns: &[
            "incision opening",
            "wound opening",
            "dehiscence",
            "yellow drainage",
            "green drainage",
            "greenish fluid",
            "pus",
            "ooze",
        ],
    },
    SymptomCode {
        canonical: "slurred speech",
        snomed: "SNOMED:8011004",
        patterns: &["slurred speech", "slurring"],
    },
    SymptomCode {
        canonical: "syncope",
        snomed: "SNOMED:271594007",
        patterns: &["fainted", "passed out", "syncope"],
    },
    SymptomCode {
        canonical: "dizziness",
        snomed: "SNOMED:404640003",
        patterns: &["dizziness", "lightheaded", "dizzy"],
    },
    SymptomCode {
        canonical: "fever",
        snomed: "SNOMED:386661006",
        patterns: &["fever", "febrile"],
    },
    SymptomCode {
        canonical: "numbness",
        snomed: "SNOMED:44077006",
        patterns: &["numbness", "numb"],
    },
    SymptomCode {
        canonical: "weakness",
        snomed: "SNOMED:13791008",
        patterns: &["weakness", "feeling weak"],
    },
    SymptomCode {
        canonical: "headache",
        snomed: "SNOMED:25064002",
        patterns: &["headache"],
    },
    SymptomCode {
        canonical: "nausea",
        snomed: "SNOMED:422587007",
        patterns: &["nauseous", "nausea"],
    },
    SymptomCode {
        canonical: "cough",
        snomed: "SNOMED:49727002",
        patterns: &["coughing", "cough"],
    },
    SymptomCode {
        canonical: "fatigue",
        snomed: "SNOMED:84229001",
        patterns: &["fatigue", "exhausted", "tired"],
    },
    SymptomCode {
        canonical: "swelling",
        snomed: "SNOMED:65124004",
        patterns: &["swelling", "swollen"],
    },
    SymptomCode {
        canonical: "wound redness",
        snomed: "SNOMED:247441003",
        patterns: &["redness", "warm to the touch"],
    },
    SymptomCode {
        canonical: "pain",
        snomed: "SNOMED:22253000",
        patterns: &["pain", "ache", "hurts", "hurt"],
    },
];

/// Detect and normalize every symptom mentioned in the text.
///
/// A bare "tightness" accompanied by a chest mention resolves to chest
/// tightness, matching how patients actually phrase it.
pub fn detect_symptoms(text: &str) -> Vec<NormalizedSymptom> {
    let lower = text.to_lowercase();
    let mut found: Vec<NormalizedSymptom> = Vec::new();

    if lower.contains("tightness") && lower.contains("chest") {
        push_unique(&mut found, normalize_phrase("chest tightness"));
    }

    for code in CODEBOOK {
        if code.patterns.iter().any(|p| lower.contains(p)) {
            push_unique(
                &mut found,
                NormalizedSymptom {
                    canonical: code.canonical.to_string(),
                    snomed: code.snomed.to_string(),
                },
            );
        }
    }

    found
}

/// Resolve a single phrase to its canonical form, defaulting to
/// `other`/`NA` when the codebook has no entry for it.
pub fn normalize_phrase(phrase: &str) -> NormalizedSymptom {
    let lower = phrase.to_lowercase();
    for code in CODEBOOK {
        if code.patterns.iter().any(|p| lower.contains(p)) || lower == code.canonical {
            return NormalizedSymptom {
                canonical: code.canonical.to_string(),
                snomed: code.snomed.to_string(),
            };
        }
    }
    NormalizedSymptom {
        canonical: "other".to_string(),
        snomed: "NA".to_string(),
    }
}

fn push_unique(found: &mut Vec<NormalizedSymptom>, symptom: NormalizedSymptom) {
    if !found.iter().any(|s| s.canonical == symptom.canonical) {
        found.push(symptom);
    }
}
