use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // "8/10", "8 / 10", "8 out of 10"
    static ref SEVERITY_REGEX: Regex =
        Regex::new(r"(?i)\b(10|\d)\s*(?:/\s*10|out\s+of\s+10)\b").unwrap();
    // number following a fever/temperature mention: "fever of 101", "temp 99.8"
    static ref TEMP_CONTEXT_REGEX: Regex =
        Regex::new(r"(?i)\b(?:fever|temperature|temp)\b[^0-9]{0,16}(\d{2,3}(?:\.\d+)?)").unwrap();
    // explicit unit: "101.5°F", "101.5 F"
    static ref TEMP_UNIT_REGEX: Regex =
        Regex::new(r"(?i)\b(\d{2,3}(?:\.\d+)?)\s*°?\s*f\b").unwrap();
    // "glucose 320", "blood sugar was 310"
    static ref GLUCOSE_REGEX: Regex =
        Regex::new(r"(?i)\b(?:glucose|blood\s+sugar|sugar)\b[^0-9]{0,16}(\d{2,4})").unwrap();
}

const TEMP_PLAUSIBLE_MIN_F: f64 = 90.0;
const TEMP_PLAUSIBLE_MAX_F: f64 = 110.0;

/// Numeric vital inputs used by a triage evaluation
///
/// Any field may be absent; the engine fills missing fields from free
/// text, while structured values supplied by the caller take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Self-reported pain/symptom severity on a 0-10 scale
    pub severity: Option<u8>,
    /// Body temperature in degrees Fahrenheit
    pub temperature_f: Option<f64>,
    /// Blood glucose in mg/dL
    pub glucose: Option<f64>,
}

impl Vitals {
    /// Extract vitals from free text.
    ///
    /// Severity accepts both "N out of 10" and "N/10" and normalizes them
    /// to the same 0-10 integer. Temperature accepts bare values near a
    /// fever mention ("fever of 101") as well as unit-suffixed values
    /// ("101.5°F"); readings outside a plausible body-temperature range
    /// are discarded.
    pub fn parse(text: &str) -> Self {
        Self {
            severity: parse_severity(text),
            temperature_f: parse_temperature_f(text),
            glucose: parse_glucose(text),
        }
    }

    /// Overlay structured values on top of text-derived ones.
    pub fn merged_with(self, structured: &Vitals) -> Self {
        Self {
            severity: structured.severity.or(self.severity),
            temperature_f: structured.temperature_f.or(self.temperature_f),
            glucose: structured.glucose.or(self.glucose),
        }
    }
}

pub fn parse_severity(text: &str) -> Option<u8> {
    let caps = SEVERITY_REGEX.captures(text)?;
    let value: u8 = caps.get(1)?.as_str().parse().ok()?;
    (value <= 10).then_some(value)
}

pub fn parse_temperature_f(text: &str) -> Option<f64> {
    let raw = TEMP_CONTEXT_REGEX
        .captures(text)
        .or_else(|| TEMP_UNIT_REGEX.captures(text))?;
    let value: f64 = raw.get(1)?.as_str().parse().ok()?;
    (TEMP_PLAUSIBLE_MIN_F..=TEMP_PLAUSIBLE_MAX_F)
        .contains(&value)
        .then_some(value)
}

pub fn parse_glucose(text: &str) -> Option<f64> {
    let caps = GLUCOSE_REGEX.captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_slash_and_out_of_forms_agree() {
        assert_eq!(parse_severity("I feel dizzy 7/10"), Some(7));
        assert_eq!(parse_severity("I feel dizzy 7 out of 10"), Some(7));
        assert_eq!(parse_severity("pain is 10/10"), Some(10));
    }

    #[test]
    fn test_severity_requires_scale_suffix() {
        // A bare number is not a severity report
        assert_eq!(parse_severity("I am patient 10004235"), None);
        assert_eq!(parse_severity("call me in 5 minutes"), None);
    }

    #[test]
    fn test_temperature_bare_and_unit_forms() {
        assert_eq!(parse_temperature_f("I have a fever of 101"), Some(101.0));
        assert_eq!(parse_temperature_f("my temperature is 101.5°F"), Some(101.5));
        assert_eq!(parse_temperature_f("temp 99.8 F this morning"), Some(99.8));
    }

    #[test]
    fn test_temperature_discards_implausible_readings() {
        assert_eq!(parse_temperature_f("fever for 3 days"), None);
        assert_eq!(parse_temperature_f("temperature of 500"), None);
    }

    #[test]
    fn test_glucose_near_keyword() {
        assert_eq!(parse_glucose("my blood sugar was 320 today"), Some(320.0));
        assert_eq!(parse_glucose("glucose reading of 145"), Some(145.0));
        assert_eq!(parse_glucose("no readings today"), None);
    }

    #[test]
    fn test_structured_values_win_over_text() {
        let from_text = Vitals::parse("pain 6/10 and fever of 100");
        let structured = Vitals {
            severity: Some(9),
            temperature_f: None,
            glucose: None,
        };
        let merged = from_text.merged_with(&structured);
        assert_eq!(merged.severity, Some(9));
        assert_eq!(merged.temperature_f, Some(100.0));
    }
}
