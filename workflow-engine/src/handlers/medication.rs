//! Medication education domain handler
//!
//! Parses the question intent, scores risk, and answers from the drug
//! knowledge table -- over the patient's prescriptions when an id is
//! known, over drugs named in the text otherwise.

use super::{store_err, HandlerContext};
use crate::turn::{HandlerOutput, Turn};
use completion_gateway::CompletionRequest;
use error_common::Result;
use serde::Deserialize;
use tracing::debug;
use triage_engine::Tier;

const QUESTION_INSTRUCTION: &str = "\
Classify the patient's medication question into exactly one of: \
missed_dose | double_dose | side_effect | interaction_check | instruction | \
contraindication | general.\n\
Reply ONLY with JSON like {\"intent\": \"side_effect\"}.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Question {
    MissedDose,
    DoubleDose,
    SideEffect,
    InteractionCheck,
    Instruction,
    Contraindication,
    General,
}

#[derive(Deserialize)]
struct QuestionReply {
    intent: String,
}

impl Question {
    fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "missed_dose" => Self::MissedDose,
            "double_dose" => Self::DoubleDose,
            "side_effect" => Self::SideEffect,
            "interaction_check" => Self::InteractionCheck,
            "instruction" => Self::Instruction,
            "contraindication" => Self::Contraindication,
            _ => Self::General,
        }
    }

    fn from_keywords(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("miss") || lower.contains("forgot") {
            Self::MissedDose
        } else if lower.contains("double") || lower.contains("two doses") {
            Self::DoubleDose
        } else if lower.contains("side effect") || lower.contains("feel") {
            Self::SideEffect
        } else if lower.contains("interact") || lower.contains("together") || lower.contains("combine")
        {
            Self::InteractionCheck
        } else if lower.contains("how") || lower.contains("take") || lower.contains("food")
            || lower.contains("meal")
        {
            Self::Instruction
        } else if lower.contains("pregnan") || lower.contains("kidney") || lower.contains("liver") {
            Self::Contraindication
        } else {
            Self::General
        }
    }

    /// Education-level risk for the question itself.
    fn risk(self) -> Tier {
        match self {
            Self::DoubleDose => Tier::Red,
            Self::InteractionCheck | Self::MissedDose => Tier::Orange,
            _ => Tier::Green,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::MissedDose => "missed_dose",
            Self::DoubleDose => "double_dose",
            Self::SideEffect => "side_effect",
            Self::InteractionCheck => "interaction_check",
            Self::Instruction => "instruction",
            Self::Contraindication => "contraindication",
            Self::General => "general",
        }
    }
}

struct DrugInfo {
    name: &'static str,
    class: &'static str,
    common_side_effects: &'static str,
    missed_dose_advice: &'static str,
    serious_interactions: &'static str,
    food_advice: &'static str,
    contraindications: &'static str,
}

const DRUG_KNOWLEDGE: &[DrugInfo] = &[
    DrugInfo {
        name: "metformin",
        class: "biguanide",
        common_side_effects: "nausea, upset stomach, and diarrhea",
        missed_dose_advice: "Take it as soon as you remember unless it is almost time for \
                             your next dose; never take two doses at once",
        serious_interactions: "Avoid heavy alcohol use, and tell your care team before any \
                               imaging that uses contrast dye",
        food_advice: "Take with meals to reduce stomach upset",
        contraindications: "severe kidney impairment",
    },
    DrugInfo {
        name: "metoprolol",
        class: "beta blocker",
        common_side_effects: "tiredness, dizziness, and a slow heart rate",
        missed_dose_advice: "Take it as soon as you remember unless your next dose is within \
                             8 hours; do not double up",
        serious_interactions: "Use caution with other blood-pressure medicines and certain \
                               antidepressants",
        food_advice: "Take with or immediately after food, at the same time each day",
        contraindications: "severe asthma and certain heart rhythm disorders",
    },
    DrugInfo {
        name: "lisinopril",
        class: "ACE inhibitor",
        common_side_effects: "a dry cough, dizziness, and headache",
        missed_dose_advice: "Take it when you remember that same day; skip it if it is \
                             nearly time for the next dose",
        serious_interactions: "Avoid potassium supplements and NSAID pain relievers without \
                               provider guidance",
        food_advice: "Can be taken with or without food",
        contraindications: "pregnancy and a history of angioedema",
    },
    DrugInfo {
        name: "atorvastatin",
        class: "statin",
        common_side_effects: "muscle aches and mild digestive upset",
        missed_dose_advice: "Skip the missed dose if more than 12 hours have passed; do not \
                             double up",
        serious_interactions: "Grapefruit juice and certain antibiotics can raise statin \
                               levels",
        food_advice: "Can be taken with or without food, at the same time daily",
        contraindications: "active liver disease and pregnancy",
    },
];

fn drug_info(name: &str) -> Option<&'static DrugInfo> {
    DRUG_KNOWLEDGE
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(name))
}

/// Drugs the question names directly, for turns without patient context.
fn drugs_in_text(text: &str) -> Vec<&'static DrugInfo> {
    let lower = text.to_lowercase();
    DRUG_KNOWLEDGE
        .iter()
        .filter(|d| lower.contains(d.name))
        .collect()
}

pub(crate) async fn handle(ctx: &HandlerContext, turn: &Turn) -> Result<HandlerOutput> {
    let question = parse_question(ctx, &turn.text).await;
    let risk = question.risk();
    debug!(question = question.as_str(), risk = %risk, "Medication question parsed");

    // With an id the answer covers the patient's prescriptions; without
    // one it covers the drugs named in the text. (condition, info)
    let mut drugs: Vec<(Option<String>, &'static DrugInfo)> = Vec::new();
    if let Some(patient_id) = turn.patient_id.as_deref() {
        for prescription in ctx
            .directory
            .get_prescriptions(patient_id)
            .await
            .map_err(store_err)?
        {
            if let Some(info) = drug_info(&prescription.drug_name) {
                drugs.push((Some(prescription.condition.clone()), info));
            }
        }
    }
    if drugs.is_empty() {
        drugs = drugs_in_text(&turn.text)
            .into_iter()
            .map(|info| (None, info))
            .collect();
    }

    if drugs.is_empty() {
        let response = if turn.patient_id.is_none() {
            "I can answer questions about your medications. Could you tell me the name of \
             the medication, or share your 8-digit patient ID so I can look up your \
             prescriptions?"
        } else {
            "I don't see any prescriptions on file that I have education material for. \
             Could you tell me the name of the medication you're asking about?"
        };
        return Ok(HandlerOutput::text(response));
    }

    let mut parts: Vec<String> = drugs
        .iter()
        .map(|(condition, info)| answer_for(question, condition.as_deref(), info))
        .collect();
    if question == Question::InteractionCheck && parts.len() > 1 {
        parts.insert(
            0,
            "You're taking multiple medications. Here are the interaction warnings:".to_string(),
        );
    }

    let mut response = parts.join(" ");
    match risk {
        Tier::Red => {
            response = format!("[HIGH RISK] Please seek immediate medical care. {response}");
        }
        Tier::Orange => {
            response = format!("[ALERT] Please contact your clinician soon. {response}");
        }
        Tier::Green => {}
    }

    let mut output = HandlerOutput::text(response);
    if risk > Tier::Green {
        output = output.with_tier(risk);
    }
    Ok(output)
}

async fn parse_question(ctx: &HandlerContext, text: &str) -> Question {
    if let Some(gateway) = &ctx.gateway {
        let request = CompletionRequest::new(text).with_system(QUESTION_INSTRUCTION);
        if let Ok(raw) = gateway.complete(&request).await {
            if let Ok(reply) = serde_json::from_str::<QuestionReply>(raw.trim()) {
                return Question::from_label(&reply.intent);
            }
        }
    }
    Question::from_keywords(text)
}

fn answer_for(question: Question, condition: Option<&str>, info: &DrugInfo) -> String {
    match question {
        Question::SideEffect => format!(
            "{}: Common side effects include {}.",
            info.name, info.common_side_effects
        ),
        Question::MissedDose | Question::DoubleDose => {
            format!("{}: {}.", info.name, info.missed_dose_advice)
        }
        Question::InteractionCheck => format!("{}: {}.", info.name, info.serious_interactions),
        Question::Instruction => format!("{}: {}.", info.name, info.food_advice),
        Question::Contraindication => {
            format!("{}: Contraindicated in {}.", info.name, info.contraindications)
        }
        Question::General => match condition {
            Some(condition) => format!(
                "{} is used for {} ({} class).",
                info.name, condition, info.class
            ),
            None => format!("{} is a {} medication.", info.name, info.class),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_keyword_fallback() {
        assert_eq!(
            Question::from_keywords("I forgot my morning dose"),
            Question::MissedDose
        );
        assert_eq!(
            Question::from_keywords("I accidentally took a double dose"),
            Question::DoubleDose
        );
        assert_eq!(
            Question::from_keywords("what are the side effects of metformin?"),
            Question::SideEffect
        );
        assert_eq!(
            Question::from_keywords("can I combine these medications?"),
            Question::InteractionCheck
        );
        assert_eq!(
            Question::from_keywords("is it safe during pregnancy?"),
            Question::Contraindication
        );
    }

    #[test]
    fn test_risk_mapping() {
        assert_eq!(Question::DoubleDose.risk(), Tier::Red);
        assert_eq!(Question::MissedDose.risk(), Tier::Orange);
        assert_eq!(Question::InteractionCheck.risk(), Tier::Orange);
        assert_eq!(Question::SideEffect.risk(), Tier::Green);
    }

    #[test]
    fn test_drugs_detected_in_text() {
        let found = drugs_in_text("What are the side effects of Metformin?");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "metformin");
        assert!(drugs_in_text("what can you do?").is_empty());
    }

    #[test]
    fn test_answers_follow_question_kind() {
        let info = drug_info("metformin").unwrap();
        let side = answer_for(Question::SideEffect, None, info);
        assert!(side.contains("side effects"));
        let general = answer_for(Question::General, Some("Type 2 Diabetes"), info);
        assert!(general.contains("Type 2 Diabetes"));
        let general_no_ctx = answer_for(Question::General, None, info);
        assert!(general_no_ctx.contains("biguanide"));
    }
}
