use crate::intent::Intent;

/// Symptom and vital-sign phrases. Checked first: a clinical signal in
/// the same utterance as a scheduling request routes to followup.
const SYMPTOM_KEYWORDS: &[&str] = &[
    "shortness of breath",
    "short of breath",
    "trouble breathing",
    "breathless",
    "chest pain",
    "tightness",
    "dizzy",
    "dizziness",
    "lightheaded",
    "symptom",
    "fever",
    "pain",
    "ache",
    "hurt",
    "nausea",
    "cough",
    "fatigue",
    "numbness",
    "weakness",
    "fainted",
    "syncope",
    "glucose",
    "blood sugar",
];

const SCHEDULING_KEYWORDS: &[&str] = &[
    "appointment",
    "reschedule",
    "schedule",
    "cancel",
    "book",
    "doctor",
    "visit",
    "next week",
    "next tuesday",
];

const MEDICATION_KEYWORDS: &[&str] = &[
    "medication",
    "meds",
    "pill",
    "dose",
    "side effect",
    "missed dose",
    "take with food",
    "prescription",
    "refill",
];

const CAREGIVER_KEYWORDS: &[&str] = &[
    "caregiver",
    "weekly summary",
    "check on them",
    "update for",
    "my mother",
    "my father",
];

/// Rule-based intent classification, the resilience baseline when no
/// completion provider is reachable.
pub fn classify_keywords(text: &str) -> Intent {
    let lower = text.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if contains_any(SYMPTOM_KEYWORDS) {
        Intent::Followup
    } else if contains_any(SCHEDULING_KEYWORDS) {
        Intent::Appointment
    } else if contains_any(MEDICATION_KEYWORDS) {
        Intent::Medication
    } else if contains_any(CAREGIVER_KEYWORDS) {
        Intent::Caregiver
    } else {
        Intent::Help
    }
}
