use crate::rules::RuleSet;
use crate::symptoms::{detect_symptoms, NormalizedSymptom, SymptomReport};
use crate::tier::Tier;
use crate::vitals::Vitals;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trailing window for recurrence escalation, in days
pub const REPEAT_WINDOW_DAYS: i64 = 7;
/// Total reports of the same symptom (including the current one) that
/// trigger escalation
pub const REPEAT_THRESHOLD: usize = 2;

/// Outcome of one triage evaluation
///
/// Immutable once produced. The matched-rule id and rationale are always
/// populated; downstream explanation text is derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageVerdict {
    pub tier: Tier,
    pub rule_id: String,
    pub rationale: String,
    /// Numeric inputs the evaluation actually used
    pub inputs: Vitals,
    /// Symptoms detected and normalized from the text
    pub symptoms: Vec<NormalizedSymptom>,
    /// True when recurrence escalation raised the base tier
    pub escalated: bool,
}

/// Deterministic triage classifier over a declarative rule table
pub struct TriageEngine {
    rules: RuleSet,
}

impl TriageEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate free text plus optional structured vitals against the
    /// rule table, applying recurrence escalation over the supplied
    /// history.
    pub fn evaluate(
        &self,
        text: &str,
        structured: Option<&Vitals>,
        history: &[SymptomReport],
    ) -> TriageVerdict {
        self.evaluate_at(text, structured, history, Utc::now())
    }

    /// Same as [`evaluate`](Self::evaluate) with an explicit evaluation
    /// time, so the recurrence window is testable.
    pub fn evaluate_at(
        &self,
        text: &str,
        structured: Option<&Vitals>,
        history: &[SymptomReport],
        asof: DateTime<Utc>,
    ) -> TriageVerdict {
        let text_lower = text.to_lowercase();
        let mut vitals = Vitals::parse(&text_lower);
        if let Some(s) = structured {
            vitals = vitals.merged_with(s);
        }
        let symptoms = detect_symptoms(&text_lower);

        // RED predicates first: any match short-circuits to RED and no
        // later rule can downgrade it.
        let base = self
            .rules
            .rules_for(Tier::Red)
            .chain(self.rules.rules_for(Tier::Orange))
            .find(|rule| rule.predicate.matches(&text_lower, &vitals));

        let (mut tier, rule_id, mut rationale) = match base {
            Some(rule) => (rule.tier, rule.id.clone(), rule.rationale.clone()),
            None => (
                Tier::Green,
                "routine".to_string(),
                "no red or orange indicators matched".to_string(),
            ),
        };

        let mut escalated = false;
        if tier < Tier::Red {
            if let Some((symptom, count)) = self.recurring_symptom(&symptoms, history, asof) {
                tier = tier.escalate();
                escalated = true;
                rationale = format!(
                    "{rationale}; escalated one tier: {symptom} reported {count} times in the last {REPEAT_WINDOW_DAYS} days"
                );
            }
        }

        debug!(
            tier = %tier,
            rule_id = %rule_id,
            escalated = escalated,
            "Triage evaluation complete"
        );

        TriageVerdict {
            tier,
            rule_id,
            rationale,
            inputs: vitals,
            symptoms,
            escalated,
        }
    }

    /// Find a currently-reported symptom whose total count within the
    /// trailing window (history plus the current report) reaches the
    /// repeat threshold.
    fn recurring_symptom(
        &self,
        current: &[NormalizedSymptom],
        history: &[SymptomReport],
        asof: DateTime<Utc>,
    ) -> Option<(String, usize)> {
        let cutoff = asof - Duration::days(REPEAT_WINDOW_DAYS);
        for symptom in current {
            let prior = history
                .iter()
                .filter(|r| r.reported_at >= cutoff && r.reported_at <= asof)
                .filter(|r| r.symptom.eq_ignore_ascii_case(&symptom.canonical))
                .count();
            let total = prior + 1;
            if total >= REPEAT_THRESHOLD {
                return Some((symptom.canonical.clone(), total));
            }
        }
        None
    }
}

impl Default for TriageEngine {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TriageEngine {
        TriageEngine::default()
    }

    fn report(symptom: &str, days_ago: i64, asof: DateTime<Utc>) -> SymptomReport {
        SymptomReport {
            symptom: symptom.to_string(),
            severity: None,
            reported_at: asof - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_emergency_keyword_is_red() {
        for text in [
            "I have chest pain",
            "some tightness in my chest",
            "I'm short of breath",
            "I have slurred speech",
            "I fainted this morning",
        ] {
            let verdict = engine().evaluate(text, None, &[]);
            assert_eq!(verdict.tier, Tier::Red, "expected RED for {text:?}");
            assert!(!verdict.rule_id.is_empty());
            assert!(!verdict.rationale.is_empty());
        }
    }

    #[test]
    fn test_red_wins_over_cooccurring_orange() {
        // Dizziness alone is ORANGE; chest pain in the same utterance
        // must still resolve RED.
        let verdict = engine().evaluate("I feel dizzy and have chest pain", None, &[]);
        assert_eq!(verdict.tier, Tier::Red);
        assert_eq!(verdict.rule_id, "chest_pain");
    }

    #[test]
    fn test_severity_boundaries() {
        let cases = [
            ("my knee aches 4/10", Tier::Green),
            ("my knee aches 5/10", Tier::Orange),
            ("my knee aches 7/10", Tier::Orange),
            ("my knee aches 8/10", Tier::Red),
        ];
        for (text, expected) in cases {
            let verdict = engine().evaluate(text, None, &[]);
            assert_eq!(verdict.tier, expected, "boundary case {text:?}");
        }
    }

    #[test]
    fn test_temperature_thresholds() {
        let high = engine().evaluate("I have a fever of 102", None, &[]);
        assert_eq!(high.tier, Tier::Red);
        assert_eq!(high.rule_id, "fever_high");

        let low = engine().evaluate("temperature is 100.2F", None, &[]);
        assert_eq!(low.tier, Tier::Orange);
        assert_eq!(low.rule_id, "fever_low");
    }

    #[test]
    fn test_glucose_threshold() {
        let verdict = engine().evaluate("my blood sugar was 320", None, &[]);
        assert_eq!(verdict.tier, Tier::Orange);
        assert_eq!(verdict.rule_id, "hyperglycemia");
    }

    #[test]
    fn test_green_when_nothing_matches() {
        let verdict = engine().evaluate("I slept well and feel fine", None, &[]);
        assert_eq!(verdict.tier, Tier::Green);
        assert_eq!(verdict.rule_id, "routine");
        assert!(!verdict.escalated);
    }

    #[test]
    fn test_recurrence_escalates_green_to_orange() {
        let asof = Utc::now();
        let history = vec![report("cough", 2, asof)];
        let verdict = engine().evaluate_at("I still have a cough", None, &history, asof);
        assert_eq!(verdict.tier, Tier::Orange);
        assert!(verdict.escalated);
    }

    #[test]
    fn test_recurrence_escalates_orange_to_red() {
        // Dizziness at severity 7 is ORANGE; a prior dizziness report
        // three days ago escalates it exactly one step.
        let asof = Utc::now();
        let history = vec![report("dizziness", 3, asof)];
        let verdict = engine().evaluate_at("I feel dizzy 7/10", None, &history, asof);
        assert_eq!(verdict.tier, Tier::Red);
        assert!(verdict.escalated);
        assert_eq!(verdict.inputs.severity, Some(7));
    }

    #[test]
    fn test_recurrence_leaves_red_unchanged() {
        let asof = Utc::now();
        let history = vec![report("chest pain", 1, asof)];
        let verdict = engine().evaluate_at("chest pain again", None, &history, asof);
        assert_eq!(verdict.tier, Tier::Red);
        assert!(!verdict.escalated);
    }

    #[test]
    fn test_reports_outside_window_do_not_escalate() {
        let asof = Utc::now();
        let history = vec![report("cough", 9, asof)];
        let verdict = engine().evaluate_at("I have a cough", None, &history, asof);
        assert_eq!(verdict.tier, Tier::Green);
        assert!(!verdict.escalated);
    }

    #[test]
    fn test_structured_vitals_take_precedence() {
        let structured = Vitals {
            severity: Some(9),
            ..Vitals::default()
        };
        let verdict = engine().evaluate("mild ache 3/10", Some(&structured), &[]);
        assert_eq!(verdict.tier, Tier::Red);
        assert_eq!(verdict.inputs.severity, Some(9));
    }
}
