//! Follow-up domain handler
//!
//! Symptom extraction, triage with recurrence escalation over the
//! store's 7-day history, symptom recording, and tier-specific
//! responses.

use super::{store_err, HandlerContext};
use crate::turn::{HandlerOutput, Turn};
use error_common::Result;
use tracing::debug;
use triage_engine::{detect_symptoms, SymptomReport, Tier, REPEAT_WINDOW_DAYS};

pub(crate) async fn handle(ctx: &HandlerContext, turn: &Turn) -> Result<HandlerOutput> {
    let symptoms = detect_symptoms(&turn.text);

    let history: Vec<SymptomReport> = match turn.patient_id.as_deref() {
        Some(patient_id) => ctx
            .directory
            .get_recent_symptoms(patient_id, REPEAT_WINDOW_DAYS)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(|entry| SymptomReport {
                symptom: entry.symptom,
                severity: entry.severity,
                reported_at: entry.recorded_at,
            })
            .collect(),
        None => Vec::new(),
    };

    let verdict = ctx.triage.evaluate(&turn.text, None, &history);
    debug!(
        tier = %verdict.tier,
        rule_id = %verdict.rule_id,
        symptom_count = symptoms.len(),
        "Follow-up triage complete"
    );

    if symptoms.is_empty() && verdict.tier == Tier::Green {
        return Ok(HandlerOutput::text(
            "I'd like to help you with your symptoms. Could you tell me more specifically \
             what you're experiencing? For example, are you feeling pain, dizziness, \
             shortness of breath, or something else?",
        ));
    }

    // Evaluation counts the current report itself; record only after.
    if let Some(patient_id) = turn.patient_id.as_deref() {
        if !symptoms.is_empty() {
            let names: Vec<String> = symptoms.iter().map(|s| s.canonical.clone()).collect();
            ctx.directory
                .record_symptoms(patient_id, &names, verdict.inputs.severity)
                .await
                .map_err(store_err)?;
        }
    }

    let described = if symptoms.is_empty() {
        "what you've described".to_string()
    } else {
        symptoms
            .iter()
            .map(|s| s.canonical.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let severity_clause = verdict
        .inputs
        .severity
        .map(|s| format!(" With a severity of {s} out of 10,"))
        .unwrap_or_default();
    let prior_mention = prior_symptom_mention(&history, &symptoms);

    let response = match verdict.tier {
        Tier::Red => {
            let concern = match verdict.inputs.severity {
                Some(s) => {
                    format!("With a severity of {s} out of 10, this could be a serious symptom.")
                }
                None => "This could be a serious symptom.".to_string(),
            };
            let mut response = format!(
                "I understand you're experiencing {described}. {concern} Please go to the \
                 nearest emergency department immediately or call 911 if this is an \
                 emergency. I'm also alerting your healthcare provider right away."
            );
            if verdict.escalated {
                response.push_str(
                    " You've reported this more than once in the past week, so I'm treating \
                     it with extra urgency.",
                );
            }
            response
        }
        Tier::Orange => {
            let mut response = format!(
                "I've noted that you're experiencing {described}.{severity_clause} I'm going \
                 to have a nurse call you today to review your symptoms and discuss next \
                 steps. They can help determine if you need to be seen sooner."
            );
            if turn.patient_id.is_none() {
                response.push_str(
                    " Could you share your 8-digit patient ID so I can arrange the callback?",
                );
            }
            response.push_str(&prior_mention);
            response
        }
        Tier::Green => {
            if turn.patient_id.is_none() {
                format!(
                    "I'd like to record that you're experiencing {described}. Please share \
                     your 8-digit patient ID so I can add it to your chart."
                )
            } else {
                let severity_suffix = verdict
                    .inputs
                    .severity
                    .map(|s| format!(" with a severity of {s} out of 10"))
                    .unwrap_or_default();
                format!(
                    "I've logged that you're experiencing {described}{severity_suffix}.\
                     {prior_mention} I've added this to your medical record, and your \
                     provider will review it during your next appointment."
                )
            }
        }
    };

    Ok(HandlerOutput::text(response).with_verdict(verdict))
}

/// A mention of other symptoms reported earlier in the window, when any
/// exist beyond the ones in the current report.
fn prior_symptom_mention(
    history: &[SymptomReport],
    current: &[triage_engine::NormalizedSymptom],
) -> String {
    let mut earlier: Vec<&str> = history
        .iter()
        .map(|r| r.symptom.as_str())
        .filter(|name| {
            !current
                .iter()
                .any(|s| s.canonical.eq_ignore_ascii_case(name))
        })
        .collect();
    earlier.sort_unstable();
    earlier.dedup();
    if earlier.is_empty() {
        String::new()
    } else {
        format!(
            " I also notice you reported {} earlier this week.",
            earlier.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_prior_mention_excludes_current_symptoms() {
        let history = vec![
            SymptomReport {
                symptom: "cough".to_string(),
                severity: None,
                reported_at: Utc::now() - Duration::days(2),
            },
            SymptomReport {
                symptom: "dizziness".to_string(),
                severity: Some(5),
                reported_at: Utc::now() - Duration::days(1),
            },
        ];
        let current = detect_symptoms("i feel dizzy again");
        let mention = prior_symptom_mention(&history, &current);
        assert!(mention.contains("cough"));
        assert!(!mention.contains("dizziness"));
    }

    #[test]
    fn test_no_mention_without_other_history() {
        let current = detect_symptoms("i feel dizzy");
        assert!(prior_symptom_mention(&[], &current).is_empty());
    }
}
