use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PATIENT_ID_REGEX: Regex = Regex::new(r"\b(\d{8})\b").unwrap();
}

/// Scan for an 8-digit patient identifier anywhere in the text.
///
/// Runs on every turn, independent of intent classification.
pub fn extract_patient_id(text: &str) -> Option<String> {
    PATIENT_ID_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
